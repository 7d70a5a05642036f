/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * Parser Helpers
 * --------------
 * Token navigation and the two kinds of failure the grammar reports:
 *
 *  - running into `Eof` where a token is still required is *incomplete*
 *    (recoverable: the caller may append input and retry)
 *  - any other wrong token is *fatal*
 *
 * None of these helpers panic, including past the end of the list.
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

use crate::ast::Expr;
use crate::error::ParseError;
use crate::lexer::token::{Token, TokenKind};
use crate::parser::parser::{PResult, Parser};
use crate::span::Span;

impl<'a> Parser<'a> {
    /// Kind of the current token; `Eof` past the end.
    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.tokens.get(self.current).map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Kind of the token after the current one.
    pub(crate) fn peek_next_kind(&self) -> TokenKind {
        self.tokens.get(self.current + 1).map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Span of the current token, or an empty span at the end of input.
    pub(crate) fn peek_span(&self) -> Span {
        match self.tokens.get(self.current).or_else(|| self.tokens.last()) {
            Some(token) => token.span,
            None => Span::default(),
        }
    }

    /// Returns true if the parser is at EOF.
    pub(crate) fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consumes the current token and returns it.
    ///
    /// Never moves past `Eof`.
    pub(crate) fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.current)?;
        if token.kind != TokenKind::Eof {
            self.current += 1;
        }
        Some(token)
    }

    /// Consumes the current token if it is `kind`.
    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `kind` and returns its span, or `None` without consuming.
    pub(crate) fn match_span(&mut self, kind: TokenKind) -> Option<Span> {
        if self.check(kind) {
            self.advance().map(|t| t.span)
        } else {
            None
        }
    }

    /// Consumes a required token.
    ///
    /// `what` completes the sentence "expected ...".
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Span> {
        match self.match_span(kind) {
            Some(span) => Ok(span),
            None => Err(self.missing(what)),
        }
    }

    /// Consumes a required identifier and returns its name.
    pub(crate) fn expect_identifier(&mut self, what: &str) -> PResult<(String, Span)> {
        if !self.check(TokenKind::Identifier) {
            return Err(self.missing(what));
        }

        match self.advance() {
            Some(token) => Ok((token.text().to_string(), token.span)),
            None => Err(self.missing(what)),
        }
    }

    /// Runs a matcher that must produce something.
    pub(crate) fn require(
        &mut self,
        matcher: fn(&mut Self) -> PResult<Option<Expr>>,
        what: &str,
    ) -> PResult<Expr> {
        match matcher(self)? {
            Some(expr) => Ok(expr),
            None => Err(self.missing(what)),
        }
    }

    /// Error for a required construct that is not at the cursor.
    pub(crate) fn missing(&self, what: &str) -> ParseError {
        match self.tokens.get(self.current) {
            Some(token) if token.kind != TokenKind::Eof => ParseError::fatal(
                format!("expected {}, found {}", what, describe(token)),
                token.span,
            ),
            _ => ParseError::incomplete(format!("expected {}", what), Some(self.peek_span())),
        }
    }
}

/// How a token reads in error messages.
fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Identifier => format!("identifier '{}'", token.text()),
        TokenKind::Number => format!("number {}", token.text()),
        TokenKind::String => "a string".to_string(),
        kind if kind.is_keyword() => format!("keyword '{}'", kind.describe()),
        kind => format!("'{}'", kind.describe()),
    }
}
