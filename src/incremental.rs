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

//! Line-by-line input for interactive use.
//!
//! Every pushed line is appended to the buffer and the whole buffer is
//! lexed and parsed again; no partial parse state is kept between lines.

use crate::ast::Stmt;
use crate::error::{LexErrorKind, NuaError};
use crate::lexer::lex;
use crate::parser::parse;

/// Outcome of feeding one more line.
#[derive(Debug)]
pub enum Feed {
    /// The buffer ends in the middle of a construct.
    NeedMore,
    /// The buffer holds a complete program; the buffer has been cleared.
    Ready(Stmt),
    /// The buffer can never become valid; the buffer has been cleared.
    Failed(NuaError),
}

#[derive(Debug, Default)]
pub struct SourceBuffer {
    text: String,
}

impl SourceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text collected so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Appends `line` and tries to parse the accumulated text.
    pub fn push_line(&mut self, line: &str) -> Feed {
        self.text.push_str(line);
        self.text.push('\n');

        let tokens = match lex(&self.text) {
            Ok(tokens) => tokens,
            Err(err) if err.kind == LexErrorKind::UnterminatedString => return Feed::NeedMore,
            Err(err) => {
                self.clear();
                return Feed::Failed(err.into());
            }
        };

        match parse(&tokens) {
            Ok(program) => {
                self.clear();
                Feed::Ready(program)
            }
            Err(err) if err.is_recoverable() => {
                tracing::trace!(message = ?err.message, "waiting for more input");
                Feed::NeedMore
            }
            Err(err) => {
                self.clear();
                Feed::Failed(err.into())
            }
        }
    }

    /// Takes whatever is buffered, e.g. to report it when input ends.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_block_waits_for_its_close() {
        let mut buffer = SourceBuffer::new();

        assert!(matches!(buffer.push_line("if true {"), Feed::NeedMore));
        assert!(matches!(buffer.push_line("1 }"), Feed::Ready(_)));
        assert!(buffer.is_empty());
    }

    #[test]
    fn unterminated_string_waits() {
        let mut buffer = SourceBuffer::new();

        assert!(matches!(buffer.push_line("s = \"first"), Feed::NeedMore));
        assert!(matches!(buffer.push_line("second\""), Feed::Ready(_)));
    }

    #[test]
    fn hard_errors_reset_the_buffer() {
        let mut buffer = SourceBuffer::new();

        assert!(matches!(buffer.push_line("x = )"), Feed::Failed(_)));
        assert!(buffer.is_empty());
        assert!(matches!(buffer.push_line("x = 1"), Feed::Ready(_)));
    }
}
