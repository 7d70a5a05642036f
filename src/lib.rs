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

//! NUA is a small dynamic scripting language meant to be embedded.
//!
//! ```text
//! source → lex → tokens → parse → Stmt → Engine → value
//! ```
//!
//! Two engines run the same tree: [`TreeWalker`] evaluates nodes directly
//! and [`ClosureEngine`] first compiles them into a closure graph. They
//! agree on every value, control-flow signal and error.
//!
//! ```rust
//! use nua::{Config, Interpreter, Value};
//!
//! let nua = Interpreter::new(Config::default());
//! let result = nua.eval("fn sq(x) { return x * x }\nsq(7)").unwrap();
//! assert_eq!(result, Some(Value::Number(49.0)));
//! ```

pub mod ast;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod globals;
pub mod incremental;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod stack;
pub mod value;

pub use ast::{Expr, Stmt};
pub use config::{Config, EvalMode, LiteralPolicy};
pub use diagnostics::DiagnosticPrinter;
pub use engine::{ClosureEngine, Engine, TreeWalker};
pub use error::{LexError, NuaError, ParseError, RuntimeError};
pub use incremental::{Feed, SourceBuffer};
pub use interpreter::environment::{Env, Environment, Limits};
pub use interpreter::statements::{ExecSignal, Flow};
pub use interpreter::Interpreter;
pub use lexer::{lex, Token, TokenKind};
pub use parser::parse;
pub use span::Span;
pub use value::{Function, Table, Value};

/// Evaluates a parsed program with the tree walker in `env`.
///
/// A top-level `return` ends the program with its value.
pub fn evaluate(program: &Stmt, env: &Env) -> Result<Option<Value>, RuntimeError> {
    Ok(interpreter::statements::exec_stmt(program, env)?.value)
}
