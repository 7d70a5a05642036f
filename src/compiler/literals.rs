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

//! Compile-time evaluation of constant expressions.
//!
//! An expression is constant when it is built only from literals, list and
//! table literals, unary operators, arithmetic/comparison tails and
//! `and`/`or`. Folding runs the same operator code the evaluators use and
//! gives up on the first error, so a constant expression that would fail at
//! runtime is left for the runtime to report.

use crate::ast::{Expr, ExprKind, LogicalOp};
use crate::interpreter::helpers::is_truthy;
use crate::interpreter::operators;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Table, Value};

/// Value of `expr` when it can be computed without an environment.
///
/// The outer `Option` says whether folding succeeded; the inner one is the
/// (possibly null) value.
pub fn fold(expr: &Expr) -> Option<Option<Value>> {
    ensure_sufficient_stack(|| fold_node(expr))
}

fn fold_node(expr: &Expr) -> Option<Option<Value>> {
    match &expr.kind {
        ExprKind::Literal(value) => Some(value.clone()),

        ExprKind::List(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(fold(item)?);
            }
            Some(Some(Value::list(values)))
        }

        ExprKind::Table(entries) => {
            let mut table = Table::new();
            for (key, value) in entries {
                let key = fold(key)??;
                let value = fold(value)?;
                table.set(key, value);
            }
            Some(Some(Value::table(table)))
        }

        ExprKind::Negate(inner) => operators::negate(fold(inner)?).ok(),

        ExprKind::Not(inner) => Some(operators::not(&fold(inner)?)),

        ExprKind::Binary { left, tails } => {
            let mut acc = fold(left)?;
            for tail in tails {
                let right = fold(&tail.right)?;
                acc = operators::apply(tail.op, acc, right).ok()?;
            }
            Some(acc)
        }

        ExprKind::Logical { op, left, rest } => {
            let mut acc = fold(left)?;
            for operand in rest {
                let settled = match op {
                    LogicalOp::And => !is_truthy(&acc),
                    LogicalOp::Or => is_truthy(&acc),
                };
                if settled {
                    break;
                }
                acc = fold(operand)?;
            }
            Some(acc)
        }

        ExprKind::Variable(_)
        | ExprKind::Function(_)
        | ExprKind::Access { .. }
        | ExprKind::Assign { .. }
        | ExprKind::Step { .. } => None,
    }
}

/// Whether a folded value is a mutable container.
pub fn is_container(value: &Option<Value>) -> bool {
    matches!(value, Some(Value::List(_)) | Some(Value::Table(_)))
}

/// Rebuilds a folded template so the result shares nothing with it.
///
/// Templates are acyclic and hold no functions, so plain recursion is
/// enough.
pub fn deep_copy(value: &Value) -> Value {
    ensure_sufficient_stack(|| copy_node(value))
}

fn copy_node(value: &Value) -> Value {
    match value {
        Value::List(items) => Value::list(
            items
                .borrow()
                .iter()
                .map(|item| item.as_ref().map(deep_copy))
                .collect(),
        ),

        Value::Table(table) => {
            let mut copy = Table::new();
            for (key, val) in table.borrow().iter() {
                copy.insert(deep_copy(key), deep_copy(val));
            }
            Value::table(copy)
        }

        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, BinaryTail};
    use crate::span::Span;
    use std::rc::Rc;

    fn lit(n: f64) -> Expr {
        Expr::new(ExprKind::Literal(Some(Value::Number(n))), Span::default())
    }

    fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
        Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                tails: vec![BinaryTail {
                    op,
                    right,
                    span: Span::default(),
                }],
            },
            Span::default(),
        )
    }

    #[test]
    fn arithmetic_on_literals_folds() {
        let expr = binary(lit(2.0), BinaryOp::Mul, lit(21.0));
        assert_eq!(fold(&expr), Some(Some(Value::Number(42.0))));
    }

    #[test]
    fn failing_operations_are_left_for_runtime() {
        let text = Expr::new(ExprKind::Literal(Some(Value::string("a"))), Span::default());
        let expr = binary(lit(1.0), BinaryOp::Add, text);
        assert_eq!(fold(&expr), None);
    }

    #[test]
    fn variables_are_not_constant() {
        let expr = Expr::new(ExprKind::Variable("x".into()), Span::default());
        assert_eq!(fold(&expr), None);
    }

    #[test]
    fn deep_copy_shares_no_containers() {
        let inner = Value::list(vec![Some(Value::Number(1.0))]);
        let outer = Value::list(vec![Some(inner)]);
        let copy = deep_copy(&outer);

        assert_eq!(copy, outer);
        if let (Value::List(a), Value::List(b)) = (&copy, &outer) {
            assert!(!Rc::ptr_eq(a, b));
        }
    }
}
