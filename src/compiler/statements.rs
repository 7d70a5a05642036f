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

use crate::ast::{Expr, Stmt, StmtKind};
use crate::compiler::compiled::{CompiledExpr, CompiledStmt};
use crate::compiler::Compiler;
use crate::error::RuntimeError;
use crate::interpreter::environment::Env;
use crate::interpreter::helpers::{is_truthy, loop_source, LoopMode};
use crate::interpreter::statements::{ExecSignal, Flow};
use crate::span::Span;
use crate::stack::ensure_sufficient_stack;

impl Compiler {
    /// Compiles a statement (usually a whole program or function body).
    pub fn compile_stmt(&self, stmt: &Stmt) -> CompiledStmt {
        ensure_sufficient_stack(|| {
            let inner = self.compile_stmt_node(stmt);
            Box::new(move |env: &Env| ensure_sufficient_stack(|| inner(env))) as CompiledStmt
        })
    }

    fn compile_stmt_node(&self, stmt: &Stmt) -> CompiledStmt {
        match &stmt.kind {
            StmtKind::Expression(expr) => {
                let expr = self.compile_expr(expr);
                Box::new(move |env: &Env| Ok(Flow::normal(expr(env)?)))
            }

            StmtKind::If { branches, otherwise } => {
                let branches: Vec<(CompiledExpr, CompiledStmt)> = branches
                    .iter()
                    .map(|(condition, body)| (self.compile_expr(condition), self.compile_stmt(body)))
                    .collect();
                let otherwise = otherwise.as_ref().map(|body| self.compile_stmt(body));

                Box::new(move |env: &Env| {
                    for (condition, body) in &branches {
                        if is_truthy(&condition(env)?) {
                            return body(env);
                        }
                    }

                    match &otherwise {
                        Some(body) => body(env),
                        None => Ok(Flow::normal(None)),
                    }
                })
            }

            StmtKind::While { condition, body } => {
                let condition = self.compile_expr(condition);
                let body = self.compile_stmt(body);

                Box::new(move |env: &Env| {
                    loop {
                        env.borrow().check_interrupt()?;

                        if !is_truthy(&condition(env)?) {
                            break;
                        }

                        let flow = body(env)?;
                        match flow.signal {
                            ExecSignal::Return => return Ok(flow),
                            ExecSignal::Break => break,
                            ExecSignal::Continue | ExecSignal::None => {}
                        }
                    }

                    Ok(Flow::normal(None))
                })
            }

            StmtKind::ForIn { variable, iterable, body } => {
                self.compile_for(variable, iterable, body, LoopMode::Keys)
            }

            StmtKind::ForOf { variable, iterable, body } => {
                self.compile_for(variable, iterable, body, LoopMode::Values)
            }

            StmtKind::Break => Box::new(|_env: &Env| Ok(Flow::signal(ExecSignal::Break, None))),

            StmtKind::Continue => Box::new(|_env: &Env| Ok(Flow::signal(ExecSignal::Continue, None))),

            StmtKind::Return(expr) => {
                let expr = expr.as_ref().map(|e| self.compile_expr(e));
                Box::new(move |env: &Env| {
                    let value = match &expr {
                        Some(expr) => expr(env)?,
                        None => None,
                    };
                    Ok(Flow::signal(ExecSignal::Return, value))
                })
            }

            StmtKind::Global(names) => {
                let names = names.clone();
                Box::new(move |env: &Env| {
                    let mut frame = env.borrow_mut();
                    for name in &names {
                        frame.pin_global(name.clone());
                    }
                    Ok(Flow::normal(None))
                })
            }

            StmtKind::Sequence(statements) => {
                let statements: Vec<CompiledStmt> = statements.iter().map(|s| self.compile_stmt(s)).collect();
                Box::new(move |env: &Env| run_block(&statements, env))
            }
        }
    }

    fn compile_for(&self, variable: &str, iterable: &Expr, body: &Stmt, mode: LoopMode) -> CompiledStmt {
        let variable = variable.to_string();
        let subject = self.compile_expr(iterable);
        let subject_span: Span = iterable.span;
        let body = self.compile_stmt(body);

        Box::new(move |env: &Env| {
            let items = loop_source(&subject(env)?, mode).map_err(|e| e.at(subject_span))?;

            for item in items {
                env.borrow().check_interrupt()?;
                env.borrow_mut().set(&variable, item);

                let flow = body(env)?;
                match flow.signal {
                    ExecSignal::Return => return Ok(flow),
                    ExecSignal::Break => break,
                    ExecSignal::Continue | ExecSignal::None => {}
                }
            }

            Ok(Flow::normal(None))
        })
    }
}

fn run_block(statements: &[CompiledStmt], env: &Env) -> Result<Flow, RuntimeError> {
    let mut value = None;

    for stmt in statements {
        let flow = stmt(env)?;
        if !flow.is_normal() {
            return Ok(flow);
        }
        value = flow.value;
    }

    Ok(Flow::normal(value))
}
