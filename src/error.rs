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

use thiserror::Error;

use crate::span::Span;

/// What went wrong while turning characters into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedString,
    InvalidEscape,
    InvalidNumber,
    UnexpectedCharacter,
}

/// A malformed token. Always aborts the whole `lex` call.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub message: String,
    /// Offending source range.
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }
}

/// A grammar violation.
///
/// `recoverable` distinguishes "ran out of tokens mid-construct" (the caller
/// may append more input and parse again) from "saw a token that cannot
/// start or continue the current construct".
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", self.message.as_deref().unwrap_or("unexpected end of input"))]
pub struct ParseError {
    pub message: Option<String>,
    pub span: Option<Span>,
    pub recoverable: bool,
}

impl ParseError {
    /// Hard error at a token that cannot continue the construct.
    pub fn fatal(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: Some(message.into()),
            span: Some(span),
            recoverable: false,
        }
    }

    /// Input ended before the construct was complete.
    pub fn incomplete(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            message: Some(message.into()),
            span,
            recoverable: true,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.recoverable
    }
}

/// Error raised while evaluating a tree or a compiled closure graph.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct RuntimeError {
    /// Stable error code (E_TYPE, E_INDEX, ...)
    pub code: &'static str,

    /// Human-readable error message
    pub message: String,

    /// Source location, filled in by the nearest node that knows it
    pub span: Option<Span>,

    /// Optional note / help text
    pub help: Option<String>,
}

impl RuntimeError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            span: None,
            help: None,
        }
    }

    /// Generic runtime failure.
    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::new("E_RUNTIME", message)
    }

    /// Operand of the wrong variant for an operator or access.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new("E_TYPE", message)
    }

    /// Dereference of null (member, index or call on an absent value).
    pub fn reference_error(message: impl Into<String>) -> Self {
        Self::new("E_REFERENCE", message)
    }

    /// Index outside a list or string.
    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new("E_INDEX", message)
    }

    /// Invocation of something that is not a function.
    pub fn call_error(message: impl Into<String>) -> Self {
        Self::new("E_CALL", message)
    }

    /// A configured resource limit was hit.
    pub fn limit_error(message: impl Into<String>) -> Self {
        Self::new("E_LIMIT", message)
    }

    /// The host's interrupt hook asked evaluation to stop.
    pub fn interrupted() -> Self {
        Self::new("E_INTERRUPT", "evaluation interrupted by host")
    }

    /// Attach a help message to the error (builder-style).
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Record `span` unless a more precise location is already known.
    pub fn at(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

/// Any failure surfaced by the `lex → parse → evaluate` pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NuaError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl NuaError {
    pub fn code(&self) -> &'static str {
        match self {
            NuaError::Lex(_) => "E_LEX",
            NuaError::Parse(_) => "E_PARSE",
            NuaError::Runtime(err) => err.code,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            NuaError::Lex(err) => Some(err.span),
            NuaError::Parse(err) => err.span,
            NuaError::Runtime(err) => err.span,
        }
    }

    pub fn help(&self) -> Option<&str> {
        match self {
            NuaError::Runtime(err) => err.help.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_keeps_the_innermost_span() {
        let inner = Span::new(3, 4, 1, 4);
        let outer = Span::new(0, 10, 1, 1);

        let err = RuntimeError::type_error("bad").at(inner).at(outer);
        assert_eq!(err.span, Some(inner));
    }

    #[test]
    fn incomplete_parse_errors_are_recoverable() {
        let err = ParseError::incomplete("expected '}'", None);
        assert!(err.is_recoverable());
        assert_eq!(NuaError::from(err).code(), "E_PARSE");
    }
}
