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

use crate::error::RuntimeError;
use crate::value::{type_name, Value};

/// Determines whether a runtime value is considered **truthy**.
///
/// # Truthiness Rules
/// - absent (null) → false
/// - `Value::Bool(b)` → `b`
/// - everything else → true, including `0` and `""`
///
/// Used by `if`, `while`, `not`, and the short-circuit operators.
pub fn is_truthy(value: &Option<Value>) -> bool {
    match value {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => true,
    }
}

/// Which side of a collection a `for` loop walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// `for k in x`
    Keys,
    /// `for v of x`
    Values,
}

/// Items a `for` loop binds, one per iteration.
///
/// Numbers are walked lazily as a range; collections are snapshotted when
/// the loop starts, so mutating them inside the body does not change the
/// iteration.
pub enum LoopSource {
    Range { next: f64, end: f64 },
    Items(std::vec::IntoIter<Option<Value>>),
}

impl Iterator for LoopSource {
    type Item = Option<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            LoopSource::Range { next, end } => {
                if *next >= *end {
                    return None;
                }
                let current = *next;
                *next += 1.0;
                Some(Some(Value::Number(current)))
            }
            LoopSource::Items(items) => items.next(),
        }
    }
}

/// Builds the iteration for a `for` loop over `value`.
///
/// # Errors
/// Booleans, functions and null cannot be iterated.
pub fn loop_source(value: &Option<Value>, mode: LoopMode) -> Result<LoopSource, RuntimeError> {
    let items: Vec<Option<Value>> = match (value, mode) {
        (Some(Value::Number(n)), _) => {
            return Ok(LoopSource::Range {
                next: 0.0,
                end: n.floor(),
            });
        }

        (Some(Value::List(list)), LoopMode::Keys) => (0..list.borrow().len())
            .map(|i| Some(Value::Number(i as f64)))
            .collect(),
        (Some(Value::List(list)), LoopMode::Values) => list.borrow().clone(),

        (Some(Value::Table(table)), LoopMode::Keys) => {
            table.borrow().keys().into_iter().map(Some).collect()
        }
        (Some(Value::Table(table)), LoopMode::Values) => {
            table.borrow().values().into_iter().map(Some).collect()
        }

        (Some(Value::String(s)), LoopMode::Keys) => (0..s.chars().count())
            .map(|i| Some(Value::Number(i as f64)))
            .collect(),
        (Some(Value::String(s)), LoopMode::Values) => {
            s.chars().map(|c| Some(Value::String(c.to_string()))).collect()
        }

        (other, _) => {
            return Err(RuntimeError::type_error(format!(
                "cannot iterate over {}",
                type_name(other)
            )));
        }
    };

    Ok(LoopSource::Items(items.into_iter()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Table;

    #[test]
    fn only_null_and_false_are_falsy() {
        assert!(!is_truthy(&None));
        assert!(!is_truthy(&Some(Value::Bool(false))));
        assert!(is_truthy(&Some(Value::Bool(true))));
        assert!(is_truthy(&Some(Value::Number(0.0))));
        assert!(is_truthy(&Some(Value::string(""))));
        assert!(is_truthy(&Some(Value::list(vec![]))));
    }

    #[test]
    fn numbers_iterate_as_ranges() {
        let items: Vec<_> = loop_source(&Some(Value::Number(3.0)), LoopMode::Values)
            .unwrap()
            .collect();
        assert_eq!(
            items,
            vec![
                Some(Value::Number(0.0)),
                Some(Value::Number(1.0)),
                Some(Value::Number(2.0))
            ]
        );
    }

    #[test]
    fn tables_iterate_keys_or_values() {
        let mut table = Table::new();
        table.insert(Value::string("a"), Value::Number(1.0));
        let table = Some(Value::table(table));

        let keys: Vec<_> = loop_source(&table, LoopMode::Keys).unwrap().collect();
        let values: Vec<_> = loop_source(&table, LoopMode::Values).unwrap().collect();

        assert_eq!(keys, vec![Some(Value::string("a"))]);
        assert_eq!(values, vec![Some(Value::Number(1.0))]);
    }

    #[test]
    fn null_is_not_iterable() {
        assert!(loop_source(&None, LoopMode::Keys).is_err());
    }
}
