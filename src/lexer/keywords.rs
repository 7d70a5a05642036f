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

use crate::lexer::token::TokenKind;

/// Looks up a fully-read identifier in the **reserved keyword table**.
///
/// The lexer always reads the whole identifier first and only then asks
/// this function, so `iffy` or `format` are identifiers, never `if` or
/// `for` followed by a tail.
///
/// # Returns
/// - `Some(kind)` if the word is reserved
/// - `None` if it should be treated as a normal identifier
pub fn keyword(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "if" => TokenKind::If,
        "elif" => TokenKind::Elif,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "of" => TokenKind::Of,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "return" => TokenKind::Return,
        "global" => TokenKind::Global,
        "fn" => TokenKind::Fn,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "import" => TokenKind::Import,
        _ => return None,
    };

    Some(kind)
}

/// Whether `word` is reserved.
pub fn is_keyword(word: &str) -> bool {
    keyword(word).is_some()
}
