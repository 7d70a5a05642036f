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

use std::fmt::Write;

use crate::error::NuaError;

/// Responsible for rendering human-friendly, compiler-style diagnostics
/// for NUA errors.
///
/// This printer:
/// - Formats errors with file/line/column information
/// - Displays the offending source line
/// - Underlines the span of the error with carets (`^`)
/// - Optionally shows a helpful follow-up hint
///
/// The output is inspired by `rustc` diagnostics and stays readable
/// without color.
pub struct DiagnosticPrinter {
    /// Full source text the error refers to.
    source: String,

    /// Name shown in the `-->` line (e.g. `main.nua` or `<repl>`).
    file_name: String,
}

impl DiagnosticPrinter {
    pub fn new(file_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            source: source.into(),
        }
    }

    /// Formats `error` as a diagnostic block.
    ///
    /// # Output Example
    /// ```text
    /// error[E_TYPE]: cannot apply '+' to number and boolean
    ///   --> example.nua:12:9
    ///    |
    ///  12 | x = 5 + true
    ///    |     ^^^^^^^^
    /// help: ...
    /// ```
    pub fn render(&self, error: &NuaError) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "error[{}]: {}", error.code(), error);

        let Some(span) = error.span() else {
            let _ = writeln!(out, "  --> {}", self.file_name);
            self.render_help(error, &mut out);
            return out;
        };

        let _ = writeln!(out, "  --> {}:{}:{}", self.file_name, span.line, span.column);

        let src_line = self
            .source
            .lines()
            .nth(span.line.saturating_sub(1))
            .unwrap_or("");

        let indent = span.column.saturating_sub(1);
        let room = src_line.chars().count().saturating_sub(indent).max(1);
        let width = span.len().clamp(1, room);

        let _ = writeln!(out, "   |");
        let _ = writeln!(out, "{:>3} | {}", span.line, src_line);
        let _ = writeln!(out, "   | {}{}", " ".repeat(indent), "^".repeat(width));

        self.render_help(error, &mut out);
        out
    }

    /// Prints the rendered diagnostic to stderr.
    pub fn print(&self, error: &NuaError) {
        eprint!("{}", self.render(error));
    }

    fn render_help(&self, error: &NuaError, out: &mut String) {
        if let Some(help) = error.help() {
            let _ = writeln!(out, "help: {}", help);
        }
    }
}
