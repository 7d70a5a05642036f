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

use serde::Serialize;
use std::fmt;

use crate::span::Span;

/// Represents the **category of a lexical token** in NUA.
///
/// Keywords and operators each get their own variant so the parser can
/// match on kinds directly instead of comparing lexemes.
///
/// # Compiler Pipeline Role
/// ```text
/// Source Code → Lexer → TokenKind → Parser → AST
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Keywords
    If,
    Elif,
    Else,
    While,
    For,
    In,
    Of,
    Break,
    Continue,
    Return,
    Global,
    Fn,
    True,
    False,
    Null,
    And,
    Or,
    Not,
    Import,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,
    StarStar,
    PlusPlus,
    MinusMinus,
    PlusEqual,
    MinusEqual,
    Equal,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,

    /// A user-defined name.
    Identifier,

    /// A quoted string literal; the token text holds the unescaped contents.
    String,

    /// A numeric literal; the token text is always plain decimal.
    Number,

    /// End-of-file marker, always the final token.
    Eof,
}

impl TokenKind {
    /// Source form of fixed tokens, or a description for the open ones.
    pub fn describe(self) -> &'static str {
        use TokenKind::*;

        match self {
            If => "if",
            Elif => "elif",
            Else => "else",
            While => "while",
            For => "for",
            In => "in",
            Of => "of",
            Break => "break",
            Continue => "continue",
            Return => "return",
            Global => "global",
            Fn => "fn",
            True => "true",
            False => "false",
            Null => "null",
            And => "and",
            Or => "or",
            Not => "not",
            Import => "import",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            SlashSlash => "//",
            Percent => "%",
            StarStar => "**",
            PlusPlus => "++",
            MinusMinus => "--",
            PlusEqual => "+=",
            MinusEqual => "-=",
            Equal => "=",
            EqualEqual => "==",
            BangEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            LeftParen => "(",
            RightParen => ")",
            LeftBracket => "[",
            RightBracket => "]",
            LeftBrace => "{",
            RightBrace => "}",
            Comma => ",",
            Colon => ":",
            Semicolon => ";",
            Dot => ".",
            Identifier => "identifier",
            String => "string",
            Number => "number",
            Eof => "end of input",
        }
    }

    pub fn is_keyword(self) -> bool {
        use TokenKind::*;

        matches!(
            self,
            If | Elif
                | Else
                | While
                | For
                | In
                | Of
                | Break
                | Continue
                | Return
                | Global
                | Fn
                | True
                | False
                | Null
                | And
                | Or
                | Not
                | Import
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::String | TokenKind::Number | TokenKind::True | TokenKind::False | TokenKind::Null
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Represents a **single lexical token** produced by the NUA lexer.
///
/// Tokens are produced once and never mutated; the parser addresses them
/// by cursor index.
///
/// # Example Tokens
/// ```text
/// total  →  { kind: Identifier, text: Some("total"), span: 0..5 }
/// 0x1A   →  { kind: Number,     text: Some("26"),    span: 8..12 }
/// +=     →  { kind: PlusEqual,  text: None,          span: 6..8 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    /// The classified category of the token.
    pub kind: TokenKind,

    /// Literal payload for identifiers, strings and numbers.
    ///
    /// Strings carry their unescaped contents and numbers their
    /// normalized decimal form, so the parser never re-derives either.
    pub text: Option<String>,

    /// Where the token came from.
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: Option<String>, span: Span) -> Self {
        Self { kind, text, span }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_else(|| self.kind.describe())
    }
}

impl fmt::Display for Token {
    /// Formats a token the way a user wrote it, for error messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "{:?}", self.text()),
            TokenKind::Eof => f.write_str("end of input"),
            _ => f.write_str(self.text()),
        }
    }
}
