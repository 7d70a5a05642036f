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

/*!
 * Operator semantics
 * ------------------
 *
 * Every arithmetic, comparison and unary operator lives here exactly once.
 * The tree walker calls `apply`, the closure compiler calls `resolve` once
 * per operator and keeps the returned function pointer; both end up in the
 * same implementation.
 */

use crate::ast::{BinaryOp, StepOp};
use crate::error::RuntimeError;
use crate::interpreter::helpers::is_truthy;
use crate::value::{type_name, values_equal, Value};

pub type OperandResult = Result<Option<Value>, RuntimeError>;

/// Operator implementation picked once per tail.
pub type BinaryFn = fn(Option<Value>, Option<Value>) -> OperandResult;

/// Maps an operator to its implementation.
pub fn resolve(op: BinaryOp) -> BinaryFn {
    match op {
        BinaryOp::Add => add,
        BinaryOp::Sub => sub,
        BinaryOp::Mul => mul,
        BinaryOp::Div => div,
        BinaryOp::FloorDiv => floor_div,
        BinaryOp::Mod => modulo,
        BinaryOp::Pow => pow,
        BinaryOp::Less => less,
        BinaryOp::LessEqual => less_equal,
        BinaryOp::Greater => greater,
        BinaryOp::GreaterEqual => greater_equal,
        BinaryOp::Equal => equal,
        BinaryOp::NotEqual => not_equal,
    }
}

pub fn apply(op: BinaryOp, left: Option<Value>, right: Option<Value>) -> OperandResult {
    resolve(op)(left, right)
}

fn mismatch(op: &str, left: &Option<Value>, right: &Option<Value>) -> RuntimeError {
    RuntimeError::type_error(format!(
        "cannot apply '{}' to {} and {}",
        op,
        type_name(left),
        type_name(right)
    ))
}

fn numbers(op: &str, left: &Option<Value>, right: &Option<Value>) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => Ok((*a, *b)),
        _ => Err(mismatch(op, left, right)),
    }
}

fn number(n: f64) -> OperandResult {
    Ok(Some(Value::Number(n)))
}

fn boolean(b: bool) -> OperandResult {
    Ok(Some(Value::Bool(b)))
}

/// Number + Number, or String + String (concatenation).
fn add(left: Option<Value>, right: Option<Value>) -> OperandResult {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => number(a + b),
        (Some(Value::String(mut a)), Some(Value::String(b))) => {
            a.push_str(&b);
            Ok(Some(Value::String(a)))
        }
        (left, right) => Err(mismatch("+", &left, &right)),
    }
}

/// Number - Number, or String - String, which removes the first
/// occurrence of the right string from the left one.
fn sub(left: Option<Value>, right: Option<Value>) -> OperandResult {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => number(a - b),
        (Some(Value::String(a)), Some(Value::String(b))) => {
            if b.is_empty() {
                return Ok(Some(Value::String(a)));
            }
            Ok(Some(Value::String(a.replacen(&b, "", 1))))
        }
        (left, right) => Err(mismatch("-", &left, &right)),
    }
}

fn mul(left: Option<Value>, right: Option<Value>) -> OperandResult {
    let (a, b) = numbers("*", &left, &right)?;
    number(a * b)
}

/// Host floating-point division; dividing by zero gives inf or NaN.
fn div(left: Option<Value>, right: Option<Value>) -> OperandResult {
    let (a, b) = numbers("/", &left, &right)?;
    number(a / b)
}

fn floor_div(left: Option<Value>, right: Option<Value>) -> OperandResult {
    let (a, b) = numbers("//", &left, &right)?;
    number((a / b).floor())
}

fn modulo(left: Option<Value>, right: Option<Value>) -> OperandResult {
    let (a, b) = numbers("%", &left, &right)?;
    number(a % b)
}

fn pow(left: Option<Value>, right: Option<Value>) -> OperandResult {
    let (a, b) = numbers("**", &left, &right)?;
    number(a.powf(b))
}

fn less(left: Option<Value>, right: Option<Value>) -> OperandResult {
    let (a, b) = numbers("<", &left, &right)?;
    boolean(a < b)
}

fn less_equal(left: Option<Value>, right: Option<Value>) -> OperandResult {
    let (a, b) = numbers("<=", &left, &right)?;
    boolean(a <= b)
}

fn greater(left: Option<Value>, right: Option<Value>) -> OperandResult {
    let (a, b) = numbers(">", &left, &right)?;
    boolean(a > b)
}

fn greater_equal(left: Option<Value>, right: Option<Value>) -> OperandResult {
    let (a, b) = numbers(">=", &left, &right)?;
    boolean(a >= b)
}

fn equal(left: Option<Value>, right: Option<Value>) -> OperandResult {
    boolean(values_equal(&left, &right))
}

fn not_equal(left: Option<Value>, right: Option<Value>) -> OperandResult {
    boolean(!values_equal(&left, &right))
}

/// Unary minus.
pub fn negate(value: Option<Value>) -> OperandResult {
    match value {
        Some(Value::Number(n)) => number(-n),
        other => Err(RuntimeError::type_error(format!(
            "cannot negate {}",
            type_name(&other)
        ))),
    }
}

/// Logical `not`; always a Boolean.
pub fn not(value: &Option<Value>) -> Option<Value> {
    Some(Value::Bool(!is_truthy(value)))
}

/// Current numeric value of an increment/decrement target.
pub fn step_operand(value: &Option<Value>, op: StepOp) -> Result<f64, RuntimeError> {
    match value {
        Some(Value::Number(n)) => Ok(*n),
        other => {
            let verb = match op {
                StepOp::Increment => "increment",
                StepOp::Decrement => "decrement",
            };
            Err(RuntimeError::type_error(format!("cannot {} {}", verb, type_name(other))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Option<Value> {
        Some(Value::Number(n))
    }

    fn text(s: &str) -> Option<Value> {
        Some(Value::string(s))
    }

    #[test]
    fn plus_adds_numbers_and_joins_strings() {
        assert_eq!(apply(BinaryOp::Add, num(1.0), num(2.0)).unwrap(), num(3.0));
        assert_eq!(apply(BinaryOp::Add, text("ab"), text("cd")).unwrap(), text("abcd"));
    }

    #[test]
    fn plus_rejects_mixed_operands() {
        let err = apply(BinaryOp::Add, num(1.0), text("a")).unwrap_err();
        assert_eq!(err.code, "E_TYPE");
        assert_eq!(err.message, "cannot apply '+' to number and string");
    }

    #[test]
    fn string_minus_removes_first_occurrence() {
        assert_eq!(apply(BinaryOp::Sub, text("hello"), text("l")).unwrap(), text("helo"));
        assert_eq!(apply(BinaryOp::Sub, text("abc"), text("x")).unwrap(), text("abc"));
        assert_eq!(apply(BinaryOp::Sub, text("abc"), text("")).unwrap(), text("abc"));
    }

    #[test]
    fn floor_division_floors_real_quotient() {
        assert_eq!(apply(BinaryOp::FloorDiv, num(7.0), num(2.0)).unwrap(), num(3.0));
        assert_eq!(apply(BinaryOp::FloorDiv, num(-7.0), num(2.0)).unwrap(), num(-4.0));
    }

    #[test]
    fn division_by_zero_follows_host_floats() {
        assert_eq!(apply(BinaryOp::Div, num(1.0), num(0.0)).unwrap(), num(f64::INFINITY));
    }

    #[test]
    fn comparisons_need_numbers() {
        assert_eq!(apply(BinaryOp::Less, num(1.0), num(2.0)).unwrap(), Some(Value::Bool(true)));
        assert!(apply(BinaryOp::Less, text("a"), text("b")).is_err());
    }

    #[test]
    fn equality_never_coerces() {
        assert_eq!(apply(BinaryOp::Equal, num(1.0), text("1")).unwrap(), Some(Value::Bool(false)));
        assert_eq!(apply(BinaryOp::Equal, None, None).unwrap(), Some(Value::Bool(true)));
        assert_eq!(apply(BinaryOp::NotEqual, None, num(0.0)).unwrap(), Some(Value::Bool(true)));
    }

    #[test]
    fn negate_and_not() {
        assert_eq!(negate(num(2.0)).unwrap(), num(-2.0));
        assert!(negate(None).is_err());
        assert_eq!(not(&None), Some(Value::Bool(true)));
        assert_eq!(not(&num(0.0)), Some(Value::Bool(false)));
    }
}
