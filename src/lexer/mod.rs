/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * License:
 * This file is part of the NUA programming language project.
 *
 * NUA is dual-licensed under the terms of:
 *   - The MIT License
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

/// Character scanner producing the token list.
pub mod lexer;

/// Token kinds and the `Token` record.
pub mod token;

/// Reserved word table.
pub mod keywords;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

use crate::error::LexError;

/// Turns source text into a finite, ordered token list ending in `Eof`.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::new(source).scan_tokens()?;
    tracing::debug!(count = tokens.len(), "lexed source");
    Ok(tokens)
}
