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

//! The two interchangeable ways of running a parsed program.

use crate::ast::Stmt;
use crate::compiler::Compiler;
use crate::config::{EvalMode, LiteralPolicy};
use crate::error::RuntimeError;
use crate::interpreter::environment::Env;
use crate::interpreter::statements::{exec_stmt, Flow};

/// Executes a program in a frame and reports its final [`Flow`].
pub trait Engine {
    fn name(&self) -> &'static str;

    fn execute(&self, program: &Stmt, env: &Env) -> Result<Flow, RuntimeError>;
}

/// Evaluates the tree directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeWalker;

impl Engine for TreeWalker {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn execute(&self, program: &Stmt, env: &Env) -> Result<Flow, RuntimeError> {
        exec_stmt(program, env)
    }
}

/// Compiles the tree into closures, then runs them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosureEngine {
    compiler: Compiler,
}

impl ClosureEngine {
    pub fn new(policy: LiteralPolicy) -> Self {
        Self {
            compiler: Compiler::new(policy),
        }
    }
}

impl Engine for ClosureEngine {
    fn name(&self) -> &'static str {
        "compiled"
    }

    fn execute(&self, program: &Stmt, env: &Env) -> Result<Flow, RuntimeError> {
        let graph = self.compiler.compile_stmt(program);
        tracing::debug!(policy = ?self.compiler.policy(), "compiled program");
        graph(env)
    }
}

/// Engine selected by `mode`.
pub fn for_mode(mode: EvalMode, policy: LiteralPolicy) -> Box<dyn Engine> {
    match mode {
        EvalMode::Tree => Box::new(TreeWalker),
        EvalMode::Compiled => Box::new(ClosureEngine::new(policy)),
    }
}
