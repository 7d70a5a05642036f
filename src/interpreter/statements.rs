/*
 * ============================================================================
 * NUA - Embeddable Scripting Language
 * ============================================================================
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
 * ============================================================================
 */

/*!
 * NUA Statement Executor
 * ----------------------
 *
 * Executes statements for the tree-walking engine.
 *
 * It does NOT evaluate expressions (handled by `expressions.rs`).
 * It does NOT invoke functions (handled by `calls.rs`).
 *
 * Every statement reports a [`Flow`]: the signal that tells the enclosing
 * construct how to continue, plus the value of the statement. Sequences
 * stop at the first non-`None` signal and hand it outwards; loops absorb
 * `Break` and `Continue`; function calls absorb `Return`.
 */

use crate::ast::{Expr, Stmt, StmtKind};
use crate::error::RuntimeError;
use crate::interpreter::environment::Env;
use crate::interpreter::expressions::eval_expr;
use crate::interpreter::helpers::{is_truthy, loop_source, LoopMode};
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

/* ============================================================================
 * Execution Control Signals
 * ============================================================================
 */

/// How execution continues after a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecSignal {
    /// Normal fall-through execution.
    None,

    /// Skip to the next loop iteration.
    Continue,

    /// Leave the innermost loop.
    Break,

    /// Leave the current function (or the program, at top level).
    Return,
}

/// Result of executing one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub signal: ExecSignal,
    pub value: Option<Value>,
}

impl Flow {
    /// Fall-through with `value`.
    pub fn normal(value: Option<Value>) -> Self {
        Self {
            signal: ExecSignal::None,
            value,
        }
    }

    pub fn signal(signal: ExecSignal, value: Option<Value>) -> Self {
        Self { signal, value }
    }

    pub fn is_normal(&self) -> bool {
        self.signal == ExecSignal::None
    }
}

/* ============================================================================
 * Statement Execution Entry Point
 * ============================================================================
 */

/// Executes a single statement inside `env`.
pub fn exec_stmt(stmt: &Stmt, env: &Env) -> Result<Flow, RuntimeError> {
    ensure_sufficient_stack(|| exec_node(stmt, env))
}

fn exec_node(stmt: &Stmt, env: &Env) -> Result<Flow, RuntimeError> {
    match &stmt.kind {
        /* ------------------------------------------------------------------
         * Expression Statement
         * ---------------------------------------------------------------- */
        StmtKind::Expression(expr) => Ok(Flow::normal(eval_expr(expr, env)?)),

        /* ------------------------------------------------------------------
         * If / Elif / Else
         * ---------------------------------------------------------------- */
        StmtKind::If {
            branches,
            otherwise,
        } => {
            for (condition, body) in branches {
                if is_truthy(&eval_expr(condition, env)?) {
                    return exec_stmt(body, env);
                }
            }

            match otherwise {
                Some(body) => exec_stmt(body, env),
                None => Ok(Flow::normal(None)),
            }
        }

        /* ------------------------------------------------------------------
         * While Loop
         * ---------------------------------------------------------------- */
        StmtKind::While { condition, body } => {
            loop {
                env.borrow().check_interrupt()?;

                if !is_truthy(&eval_expr(condition, env)?) {
                    break;
                }

                let flow = exec_stmt(body, env)?;
                match flow.signal {
                    ExecSignal::Return => return Ok(flow),
                    ExecSignal::Break => break,
                    ExecSignal::Continue | ExecSignal::None => {}
                }
            }

            Ok(Flow::normal(None))
        }

        /* ------------------------------------------------------------------
         * For Loops
         * ---------------------------------------------------------------- */
        StmtKind::ForIn {
            variable,
            iterable,
            body,
        } => exec_for(variable, iterable, body, LoopMode::Keys, env),

        StmtKind::ForOf {
            variable,
            iterable,
            body,
        } => exec_for(variable, iterable, body, LoopMode::Values, env),

        /* ------------------------------------------------------------------
         * Jumps
         * ---------------------------------------------------------------- */
        StmtKind::Break => Ok(Flow::signal(ExecSignal::Break, None)),

        StmtKind::Continue => Ok(Flow::signal(ExecSignal::Continue, None)),

        StmtKind::Return(expr) => {
            let value = match expr {
                Some(expr) => eval_expr(expr, env)?,
                None => None,
            };

            Ok(Flow::signal(ExecSignal::Return, value))
        }

        /* ------------------------------------------------------------------
         * Global Declaration
         * ---------------------------------------------------------------- */
        StmtKind::Global(names) => {
            let mut frame = env.borrow_mut();
            for name in names {
                frame.pin_global(name.clone());
            }

            Ok(Flow::normal(None))
        }

        /* ------------------------------------------------------------------
         * Sequence
         * ---------------------------------------------------------------- */
        StmtKind::Sequence(statements) => exec_block(statements, env),
    }
}

/// Runs `statements` in order, stopping at the first control signal.
///
/// The value of a sequence that runs to completion is the value of its
/// last statement.
pub fn exec_block(statements: &[Stmt], env: &Env) -> Result<Flow, RuntimeError> {
    let mut value = None;

    for stmt in statements {
        let flow = exec_stmt(stmt, env)?;
        if !flow.is_normal() {
            return Ok(flow);
        }
        value = flow.value;
    }

    Ok(Flow::normal(value))
}

fn exec_for(
    variable: &str,
    iterable: &Expr,
    body: &Stmt,
    mode: LoopMode,
    env: &Env,
) -> Result<Flow, RuntimeError> {
    let subject = eval_expr(iterable, env)?;
    let items = loop_source(&subject, mode).map_err(|e| e.at(iterable.span))?;

    for item in items {
        env.borrow().check_interrupt()?;
        env.borrow_mut().set(variable, item);

        let flow = exec_stmt(body, env)?;
        match flow.signal {
            ExecSignal::Return => return Ok(flow),
            ExecSignal::Break => break,
            ExecSignal::Continue | ExecSignal::None => {}
        }
    }

    Ok(Flow::normal(None))
}
