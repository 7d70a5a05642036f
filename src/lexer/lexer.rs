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

use crate::error::{LexError, LexErrorKind};
use crate::lexer::keywords::keyword;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

pub struct Lexer {
    chars: Vec<char>,

    /// Cursor into `chars`.
    current: usize,

    /// Byte offset, line and column of `current`.
    offset: usize,
    line: usize,
    column: usize,

    /// Position of the first character of the token being scanned.
    start: usize,
    start_offset: usize,
    start_line: usize,
    start_column: usize,

    pub tokens: Vec<Token>,
}

impl Lexer {
    /// Creates a new lexer over raw source code.
    ///
    /// The cursor starts at line `1`, column `1`, with an empty token
    /// buffer.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            current: 0,
            offset: 0,
            line: 1,
            column: 1,
            start: 0,
            start_offset: 0,
            start_line: 1,
            start_column: 1,
            tokens: Vec::new(),
        }
    }

    /// Performs complete lexical analysis over the entire source input.
    ///
    /// # Behavior
    /// - Skips whitespace and `#` comments
    /// - Emits one `Token` per lexeme, in source order
    /// - Guarantees a terminating `TokenKind::Eof` marker
    ///
    /// # Errors
    /// Stops at the first malformed token and reports its range.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>, LexError> {
        while !self.is_at_end() {
            self.begin();
            self.scan_token()?;
        }

        self.begin();
        self.tokens.push(Token::new(TokenKind::Eof, None, self.span()));
        Ok(self.tokens)
    }

    /// Scans and emits a single token from the source stream.
    ///
    /// Two-character operators are tried before their one-character
    /// prefix, so `+=` is never split into `+` and `=`.
    fn scan_token(&mut self) -> Result<(), LexError> {
        let ch = self.advance();

        match ch {
            ' ' | '\r' | '\t' | '\n' => {}

            '#' => {
                while self.peek() != '\n' && !self.is_at_end() {
                    self.advance();
                }
            }

            '(' => self.push(TokenKind::LeftParen),
            ')' => self.push(TokenKind::RightParen),
            '[' => self.push(TokenKind::LeftBracket),
            ']' => self.push(TokenKind::RightBracket),
            '{' => self.push(TokenKind::LeftBrace),
            '}' => self.push(TokenKind::RightBrace),
            ',' => self.push(TokenKind::Comma),
            ':' => self.push(TokenKind::Colon),
            ';' => self.push(TokenKind::Semicolon),
            '.' => self.push(TokenKind::Dot),
            '%' => self.push(TokenKind::Percent),

            '+' => {
                let kind = if self.match_char('+') {
                    TokenKind::PlusPlus
                } else if self.match_char('=') {
                    TokenKind::PlusEqual
                } else {
                    TokenKind::Plus
                };
                self.push(kind);
            }

            '-' => {
                let kind = if self.match_char('-') {
                    TokenKind::MinusMinus
                } else if self.match_char('=') {
                    TokenKind::MinusEqual
                } else {
                    TokenKind::Minus
                };
                self.push(kind);
            }

            '*' => {
                let kind = if self.match_char('*') {
                    TokenKind::StarStar
                } else {
                    TokenKind::Star
                };
                self.push(kind);
            }

            '/' => {
                let kind = if self.match_char('/') {
                    TokenKind::SlashSlash
                } else {
                    TokenKind::Slash
                };
                self.push(kind);
            }

            '=' => {
                let kind = if self.match_char('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.push(kind);
            }

            '<' => {
                let kind = if self.match_char('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.push(kind);
            }

            '>' => {
                let kind = if self.match_char('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.push(kind);
            }

            '!' => {
                if self.match_char('=') {
                    self.push(TokenKind::BangEqual);
                } else {
                    return Err(self.error(
                        LexErrorKind::UnexpectedCharacter,
                        "unexpected character '!' (use 'not' for negation)",
                    ));
                }
            }

            '"' | '\'' => self.string(ch)?,

            '0'..='9' => self.number(ch)?,

            c if c.is_alphabetic() || c == '_' => self.identifier(),

            other => {
                return Err(self.error(
                    LexErrorKind::UnexpectedCharacter,
                    format!("unexpected character {:?}", other),
                ));
            }
        }

        Ok(())
    }

    /// Parses a string literal closed by `delimiter`.
    ///
    /// Escapes are resolved here so the token carries the final text.
    /// Strings may span lines.
    fn string(&mut self, delimiter: char) -> Result<(), LexError> {
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                return Err(self.error(LexErrorKind::UnterminatedString, "unterminated string"));
            }

            let escape_start = (self.offset, self.line, self.column);
            let c = self.advance();

            if c == delimiter {
                break;
            }

            if c != '\\' {
                value.push(c);
                continue;
            }

            if self.is_at_end() {
                return Err(self.error(LexErrorKind::UnterminatedString, "unterminated string"));
            }

            let escaped = self.advance();
            let resolved = match escaped {
                '"' => '"',
                '\\' => '\\',
                '\'' => '\'',
                'r' => '\r',
                'n' => '\n',
                '0' => '\0',
                'b' => '\u{8}',
                't' => '\t',
                'v' => '\u{b}',
                'f' => '\u{c}',
                'a' => '\u{7}',
                'e' => '\u{1b}',
                other => {
                    let (start, line, column) = escape_start;
                    return Err(LexError::new(
                        LexErrorKind::InvalidEscape,
                        format!("invalid escape sequence '\\{}'", other),
                        Span::new(start, self.offset, line, column),
                    ));
                }
            };

            value.push(resolved);
        }

        self.push_text(TokenKind::String, value);
        Ok(())
    }

    /// Reads an identifier in full, then classifies it as a keyword or
    /// a plain name.
    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text: String = self.chars[self.start..self.current].iter().collect();

        match keyword(&text) {
            Some(kind) => self.push(kind),
            None => self.push_text(TokenKind::Identifier, text),
        }
    }

    /// Parses a numeric literal in decimal, hex (`0x`) or binary (`0b`).
    ///
    /// Hex and binary forms are normalized to decimal text here, so the
    /// parser only ever sees plain numbers.
    fn number(&mut self, first: char) -> Result<(), LexError> {
        if first == '0' && matches!(self.peek(), 'x' | 'X') {
            self.advance();
            return self.radix_number(16, "hex");
        }

        if first == '0' && matches!(self.peek(), 'b' | 'B') {
            self.advance();
            return self.radix_number(2, "binary");
        }

        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        if matches!(self.peek(), 'e' | 'E') {
            self.advance();
            if matches!(self.peek(), '+' | '-') {
                self.advance();
            }
            if !self.peek().is_ascii_digit() {
                return Err(self.glued_error("exponent has no digits"));
            }
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        if self.peek().is_alphanumeric() || self.peek() == '_' {
            return Err(self.glued_error("invalid numeric literal"));
        }

        let text: String = self.chars[self.start..self.current].iter().collect();
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                self.push_text(TokenKind::Number, text);
                Ok(())
            }
            _ => Err(self.error(
                LexErrorKind::InvalidNumber,
                format!("numeric literal '{}' is out of range", text),
            )),
        }
    }

    fn radix_number(&mut self, radix: u32, name: &str) -> Result<(), LexError> {
        let digits_start = self.current;

        while self.peek().is_digit(radix) {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            return Err(self.glued_error(&format!("{} literals cannot have a fractional part", name)));
        }

        if self.peek().is_alphanumeric() || self.peek() == '_' {
            return Err(self.glued_error(&format!("invalid digit in {} literal", name)));
        }

        let digits: String = self.chars[digits_start..self.current].iter().collect();
        if digits.is_empty() {
            return Err(self.error(
                LexErrorKind::InvalidNumber,
                format!("{} literal has no digits", name),
            ));
        }

        match u64::from_str_radix(&digits, radix) {
            Ok(value) => {
                self.push_text(TokenKind::Number, value.to_string());
                Ok(())
            }
            Err(_) => Err(self.error(
                LexErrorKind::InvalidNumber,
                format!("{} literal is too large", name),
            )),
        }
    }

    /// Error for a literal with junk attached; the range extends over the
    /// whole glued run so highlighting covers what the user typed.
    fn glued_error(&mut self, message: &str) -> LexError {
        while self.peek().is_alphanumeric() || self.peek() == '_' || self.peek() == '.' {
            self.advance();
        }
        self.error(LexErrorKind::InvalidNumber, message)
    }

    fn begin(&mut self) {
        self.start = self.current;
        self.start_offset = self.offset;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn span(&self) -> Span {
        Span::new(self.start_offset, self.offset, self.start_line, self.start_column)
    }

    fn push(&mut self, kind: TokenKind) {
        let span = self.span();
        self.tokens.push(Token::new(kind, None, span));
    }

    fn push_text(&mut self, kind: TokenKind, text: String) {
        let span = self.span();
        self.tokens.push(Token::new(kind, Some(text), span));
    }

    fn error(&self, kind: LexErrorKind, message: impl Into<String>) -> LexError {
        LexError::new(kind, message, self.span())
    }

    /// Conditionally consumes the next character.
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            return false;
        }
        self.advance();
        true
    }

    /// Advances the cursor by one character, keeping byte offset, line
    /// and column in step.
    fn advance(&mut self) -> char {
        let ch = self.chars[self.current];
        self.current += 1;
        self.offset += ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        ch
    }

    /// Returns the current character, or `'\0'` at end of input.
    fn peek(&self) -> char {
        self.chars.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn single_text(source: &str) -> String {
        let tokens = Lexer::new(source).scan_tokens().unwrap();
        assert_eq!(tokens.len(), 2, "expected one token plus Eof in {:?}", source);
        tokens[0].text().to_string()
    }

    #[test]
    fn two_character_operators_win() {
        use TokenKind::*;

        assert_eq!(
            kinds("++ -- += -= ** // == != <= >= + - * / = < >"),
            vec![
                PlusPlus, MinusMinus, PlusEqual, MinusEqual, StarStar, SlashSlash, EqualEqual,
                BangEqual, LessEqual, GreaterEqual, Plus, Minus, Star, Slash, Equal, Less, Greater,
                Eof
            ]
        );
    }

    #[test]
    fn keywords_are_matched_on_whole_words() {
        use TokenKind::*;

        assert_eq!(kinds("if iffy for format"), vec![If, Identifier, For, Identifier, Eof]);
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        use TokenKind::*;

        assert_eq!(kinds("a # the rest is ignored\n  b"), vec![Identifier, Identifier, Eof]);
    }

    #[test]
    fn numbers_are_normalized_to_decimal() {
        assert_eq!(single_text("0x1A"), "26");
        assert_eq!(single_text("0b11010"), "26");
        assert_eq!(single_text("26"), "26");
        assert_eq!(single_text("2.5e3"), "2.5e3");
        assert_eq!(single_text("0XfF"), "255");
    }

    #[test]
    fn string_escapes_resolve_to_single_characters() {
        let cases = [
            (r#""\"""#, '"'),
            (r#""\\""#, '\\'),
            (r#""\'""#, '\''),
            (r#""\r""#, '\r'),
            (r#""\n""#, '\n'),
            (r#""\0""#, '\0'),
            (r#""\b""#, '\u{8}'),
            (r#""\t""#, '\t'),
            (r#""\v""#, '\u{b}'),
            (r#""\f""#, '\u{c}'),
            (r#""\a""#, '\u{7}'),
            (r#""\e""#, '\u{1b}'),
        ];

        for (source, expected) in cases {
            assert_eq!(single_text(source), expected.to_string(), "escape in {}", source);
        }
    }

    #[test]
    fn single_quoted_strings_work() {
        assert_eq!(single_text("'it\\'s'"), "it's");
    }

    #[test]
    fn spans_track_lines_columns_and_bytes() {
        let tokens = Lexer::new("x\n  éa = 1").scan_tokens().unwrap();

        assert_eq!(tokens[0].span, Span::new(0, 1, 1, 1));
        // 'é' is two bytes wide.
        assert_eq!(tokens[1].span, Span::new(4, 7, 2, 3));
        assert_eq!(tokens[2].kind, TokenKind::Equal);
        assert_eq!(tokens[2].span.column, 6);
    }

    #[test]
    fn token_ranges_are_increasing_and_disjoint() {
        let tokens = Lexer::new("a.b[c](d).e += 0x10 # tail").scan_tokens().unwrap();

        for pair in tokens.windows(2) {
            assert!(pair[0].span.end <= pair[1].span.start, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn unterminated_string_is_reported() {
        let err = Lexer::new("x = \"abc").scan_tokens().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.span.start, 4);
    }

    #[test]
    fn invalid_escape_covers_the_escape() {
        let err = Lexer::new("\"ab\\qc\"").scan_tokens().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidEscape);
        assert_eq!((err.span.start, err.span.end), (3, 5));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        for source in ["0x", "0b102", "0x1.5", "1e", "1e+", "12abc", "0b"] {
            let err = Lexer::new(source).scan_tokens().unwrap_err();
            assert_eq!(err.kind, LexErrorKind::InvalidNumber, "source {:?}", source);
        }
    }

    #[test]
    fn unknown_characters_are_rejected() {
        let err = Lexer::new("a @ b").scan_tokens().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter);
        assert_eq!(err.span, Span::new(2, 3, 1, 3));
    }

    #[test]
    fn dot_after_integer_is_member_access() {
        use TokenKind::*;

        assert_eq!(kinds("1.x"), vec![Number, Dot, Identifier, Eof]);
    }
}
