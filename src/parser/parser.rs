/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * Core Recursive-Descent Parser Entry Point
 *
 * This file defines the primary `Parser` structure and the public `parse()`
 * driver used to turn a token list into one AST root.
 *
 * The grammar itself is split across:
 * - `statements.rs`   → Statement-level grammar (`if`, `while`, `for`, ...)
 * - `expressions.rs`  → The precedence ladder and value forms
 * - `helpers.rs`      → Token matching, consumption, and error construction
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

use crate::ast::{Stmt, StmtKind};
use crate::error::ParseError;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

pub(crate) type PResult<T> = Result<T, ParseError>;

/// The NUA recursive-descent parser.
///
/// This structure maintains:
/// - The token list produced by the lexer
/// - The cursor into that list
/// - How many loops enclose the current position, so `break` and
///   `continue` can be rejected where no loop would catch them
///
/// Grammar logic lives in additional `impl Parser` blocks in the sibling
/// modules.
pub struct Parser<'a> {
    /// Complete list of tokens to be parsed.
    pub(crate) tokens: &'a [Token],

    /// Current cursor position within the token list.
    pub(crate) current: usize,

    /// Loops enclosing the cursor within the current function body.
    pub(crate) loop_depth: usize,
}

/// Public entry point for the NUA parsing phase.
///
/// Returns the whole program as one `Sequence` statement.
///
/// # Errors
/// A [`ParseError`] whose `recoverable` flag is set when the tokens ran
/// out in the middle of a construct; appending more input and parsing
/// again may succeed. Any other error is final.
///
/// # Pipeline
/// ```text
/// Source → lex → Tokens → parse → Stmt → Engine
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Stmt, ParseError> {
    let mut parser = Parser::new(tokens);
    let program = parser.program()?;
    tracing::debug!(statements = program.statements().len(), "parsed program");
    Ok(program)
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            current: 0,
            loop_depth: 0,
        }
    }

    /// Parses statements until `Eof`.
    pub fn program(&mut self) -> PResult<Stmt> {
        let start = self.peek_span();
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if self.match_kind(TokenKind::Semicolon) {
                continue;
            }
            statements.push(self.statement()?);
        }

        let span = match statements.last() {
            Some(last) => start.to(last.span),
            None => Span::new(start.start, start.start, start.line, start.column),
        };

        Ok(Stmt::new(StmtKind::Sequence(statements), span))
    }
}
