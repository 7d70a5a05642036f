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
 * NUA Expression Evaluator
 * ------------------------
 *
 * Walks expression nodes directly. The closure compiler in `crate::compiler`
 * produces the same results from the same nodes; both share the operator,
 * access and call layers so there is one definition of each rule.
 */

use std::rc::Rc;

use crate::ast::{AccessKind, AccessTail, AssignOp, Expr, ExprKind, Fixity, LogicalOp, StepOp, Target};
use crate::error::RuntimeError;
use crate::interpreter::access::{self, Place};
use crate::interpreter::calls::call_value;
use crate::interpreter::environment::Env;
use crate::interpreter::helpers::is_truthy;
use crate::interpreter::operators;
use crate::span::Span;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Function, Table, Value};

/// Evaluates `expr` in `env`.
pub fn eval_expr(expr: &Expr, env: &Env) -> Result<Option<Value>, RuntimeError> {
    ensure_sufficient_stack(|| eval_node(expr, env))
}

fn eval_node(expr: &Expr, env: &Env) -> Result<Option<Value>, RuntimeError> {
    match &expr.kind {
        /* ------------------------------------------------------------------
         * Values
         * ---------------------------------------------------------------- */
        ExprKind::Literal(value) => Ok(value.clone()),

        ExprKind::Variable(name) => Ok(env.borrow().get(name)),

        ExprKind::List(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval_expr(item, env)?);
            }
            Ok(Some(Value::list(values)))
        }

        ExprKind::Table(entries) => {
            let mut table = Table::new();
            for (key, value) in entries {
                let k = eval_expr(key, env)?
                    .ok_or_else(|| RuntimeError::type_error("table key cannot be null").at(key.span))?;
                let v = eval_expr(value, env)?;
                table.set(k, v);
            }
            Ok(Some(Value::table(table)))
        }

        ExprKind::Function(literal) => Ok(Some(Value::Function(Rc::new(Function::Interpreted {
            name: literal.name.clone(),
            params: literal.params.clone(),
            body: literal.body.clone(),
        })))),

        /* ------------------------------------------------------------------
         * Operators
         * ---------------------------------------------------------------- */
        ExprKind::Negate(inner) => {
            operators::negate(eval_expr(inner, env)?).map_err(|e| e.at(expr.span))
        }

        ExprKind::Not(inner) => Ok(operators::not(&eval_expr(inner, env)?)),

        ExprKind::Binary { left, tails } => {
            let mut acc = eval_expr(left, env)?;
            for tail in tails {
                let right = eval_expr(&tail.right, env)?;
                acc = operators::apply(tail.op, acc, right).map_err(|e| e.at(tail.span))?;
            }
            Ok(acc)
        }

        ExprKind::Logical { op, left, rest } => {
            let mut acc = eval_expr(left, env)?;
            for operand in rest {
                let settled = match op {
                    LogicalOp::And => !is_truthy(&acc),
                    LogicalOp::Or => is_truthy(&acc),
                };
                if settled {
                    break;
                }
                acc = eval_expr(operand, env)?;
            }
            Ok(acc)
        }

        /* ------------------------------------------------------------------
         * Member / Index / Call chains
         * ---------------------------------------------------------------- */
        ExprKind::Access { base, tails } => {
            let mut value = eval_expr(base, env)?;
            for tail in tails {
                value = eval_tail(value, tail, env)?;
            }
            Ok(value)
        }

        /* ------------------------------------------------------------------
         * Assignment
         * ---------------------------------------------------------------- */
        ExprKind::Assign { target, op, value } => assign(target, *op, value, env, expr.span),

        ExprKind::Step { target, op, fixity } => step(target, *op, *fixity, env, expr.span),
    }
}

fn eval_tail(value: Option<Value>, tail: &AccessTail, env: &Env) -> Result<Option<Value>, RuntimeError> {
    match &tail.kind {
        AccessKind::Member(name) => access::member(&value, name),
        AccessKind::Index(key) => {
            let key = eval_expr(key, env)?;
            access::index(&value, &key)
        }
        AccessKind::Invoke(args) => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_expr(arg, env)?);
            }
            call_value(value, values, env)
        }
    }
    .map_err(|e| e.at(tail.span))
}

/// Evaluates the path of `target` down to the slot it names.
fn resolve_place<'t>(target: &'t Target, env: &Env) -> Result<Place<'t>, RuntimeError> {
    match target {
        Target::Variable(name) => Ok(Place::Variable(name)),

        Target::Access { base, tails } => {
            let Some((last, path)) = tails.split_last() else {
                return Err(RuntimeError::runtime_error("invalid assignment target"));
            };

            let mut container = eval_expr(base, env)?;
            for tail in path {
                container = eval_tail(container, tail, env)?;
            }

            let key = match &last.kind {
                AccessKind::Member(name) => Value::string(name.as_str()),
                AccessKind::Index(key) => {
                    access::slot_key(eval_expr(key, env)?).map_err(|e| e.at(last.span))?
                }
                AccessKind::Invoke(_) => {
                    return Err(RuntimeError::runtime_error("cannot assign to a call").at(last.span));
                }
            };

            Ok(Place::Slot { container, key })
        }
    }
}

/// `target = value`, `target += value`, `target -= value`.
///
/// Yields the stored value.
fn assign(
    target: &Target,
    op: AssignOp,
    value: &Expr,
    env: &Env,
    span: Span,
) -> Result<Option<Value>, RuntimeError> {
    let place = resolve_place(target, env)?;

    let result = match op.binary() {
        None => eval_expr(value, env)?,
        Some(binary) => {
            let current = place.read(env).map_err(|e| e.at(span))?;
            let rhs = eval_expr(value, env)?;
            operators::apply(binary, current, rhs).map_err(|e| e.at(span))?
        }
    };

    place.write(env, result.clone()).map_err(|e| e.at(span))?;
    Ok(result)
}

/// `++x` yields the new value, `x++` the old one.
fn step(
    target: &Target,
    op: StepOp,
    fixity: Fixity,
    env: &Env,
    span: Span,
) -> Result<Option<Value>, RuntimeError> {
    let place = resolve_place(target, env)?;
    let current = place.read(env).map_err(|e| e.at(span))?;
    let old = operators::step_operand(&current, op).map_err(|e| e.at(span))?;
    let new = old + op.delta();

    place.write(env, Some(Value::Number(new))).map_err(|e| e.at(span))?;

    Ok(Some(Value::Number(match fixity {
        Fixity::Prefix => new,
        Fixity::Suffix => old,
    })))
}
