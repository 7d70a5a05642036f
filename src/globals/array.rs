/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * List Globals
 * ==========================================================================
 *
 * `push` and `pop` mutate the list they are given in place; every other
 * reference to that list sees the change.
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
use crate::globals::{arg, Natives};
use crate::value::{type_name, Function, ListRef, Value};

pub(crate) fn functions() -> Natives {
    vec![
        Function::native("push", &["list", "value"], list_push),
        Function::native("pop", &["list"], list_pop),
    ]
}

fn expect_list(value: Option<Value>, name: &str) -> Result<ListRef, RuntimeError> {
    match value {
        Some(Value::List(items)) => Ok(items),
        other => Err(RuntimeError::type_error(format!(
            "{}() expects a list, found {}",
            name,
            type_name(&other)
        ))),
    }
}

/// Appends `value` (null included) and returns the list.
///
/// # NUA Example
/// ```nua
/// xs = [1]
/// push(xs, 2)   # [1, 2]
/// ```
fn list_push(args: Vec<Option<Value>>) -> Result<Option<Value>, RuntimeError> {
    let items = expect_list(arg(&args, 0), "push")?;
    items.borrow_mut().push(arg(&args, 1));
    Ok(Some(Value::List(items)))
}

/// Removes and returns the last item; null for an empty list.
fn list_pop(args: Vec<Option<Value>>) -> Result<Option<Value>, RuntimeError> {
    let items = expect_list(arg(&args, 0), "pop")?;
    let last = items.borrow_mut().pop();
    Ok(last.flatten())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop() {
        let list = Some(Value::list(vec![]));
        list_push(vec![list.clone(), Some(Value::Number(1.0))]).unwrap();

        assert_eq!(list_pop(vec![list.clone()]).unwrap(), Some(Value::Number(1.0)));
        assert_eq!(list_pop(vec![list]).unwrap(), None);
    }

    #[test]
    fn push_requires_a_list() {
        let err = list_push(vec![Some(Value::Number(1.0))]).unwrap_err();
        assert_eq!(err.message, "push() expects a list, found number");
    }
}
