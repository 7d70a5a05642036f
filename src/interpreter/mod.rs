/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * Interpreter Session
 * -------------------
 * Ties the pipeline together for hosts:
 *
 *   source → lex → parse → Engine (tree walker or closure graph)
 *
 * A session owns one root frame. Bindings made by one `eval` call are
 * visible to the next, which is what the REPL relies on.
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

pub mod access;
pub mod calls;
pub mod display;
pub mod environment;
pub mod expressions;
pub mod helpers;
pub mod operators;
pub mod statements;

use crate::ast::Stmt;
use crate::config::Config;
use crate::engine::{self, Engine};
use crate::error::{NuaError, RuntimeError};
use crate::globals::install_globals;
use crate::lexer::lex;
use crate::parser::parse;
use crate::value::Value;

use environment::{Env, Environment, Limits};
use statements::Flow;

pub struct Interpreter {
    config: Config,
    globals: Env,
    engine: Box<dyn Engine>,
}

impl Interpreter {
    pub fn new(config: Config) -> Self {
        Self::with_limits(config.clone(), Limits::new(config.max_call_depth))
    }

    /// Like [`Interpreter::new`], polling `interrupt` at every loop
    /// iteration and call; evaluation aborts once it returns `true`.
    pub fn with_interrupt(config: Config, interrupt: impl Fn() -> bool + 'static) -> Self {
        let limits = Limits::new(config.max_call_depth).with_interrupt(interrupt);
        Self::with_limits(config, limits)
    }

    fn with_limits(config: Config, limits: Limits) -> Self {
        let globals = Environment::with_limits(limits);
        if config.prelude {
            install_globals(&globals);
        }

        let engine = engine::for_mode(config.mode, config.literal_policy);
        tracing::debug!(engine = engine.name(), ?config, "created interpreter");

        Self {
            config,
            globals,
            engine,
        }
    }

    /// Lexes, parses and runs `source` in the session's root frame.
    ///
    /// Returns the value of the last statement, or the value of a
    /// top-level `return`.
    pub fn eval(&self, source: &str) -> Result<Option<Value>, NuaError> {
        let tokens = lex(source)?;
        let program = parse(&tokens)?;
        Ok(self.execute(&program)?.value)
    }

    /// Runs an already parsed program.
    pub fn execute(&self, program: &Stmt) -> Result<Flow, RuntimeError> {
        self.engine.execute(program, &self.globals)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// The root frame.
    pub fn globals(&self) -> &Env {
        &self.globals
    }

    /// Binds `name` in the root frame.
    pub fn define(&self, name: &str, value: Value) {
        self.globals.borrow_mut().declare(name, Some(value));
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.globals.borrow().get(name)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
