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
use crate::globals::{arg, Natives};
use crate::interpreter::display::value_to_string;
use crate::value::{type_name, Function, Value};

pub(crate) fn functions() -> Natives {
    vec![
        Function::native("print", &["..."], print),
        Function::native("len", &["x"], len),
        Function::native("type", &["x"], type_of),
        Function::native("keys", &["x"], keys),
    ]
}

/// `print(a, b, ...)`
///
/// Writes the arguments separated by single spaces, then a newline.
///
/// ```nua
/// print("total:", 3)   # total: 3
/// ```
fn print(args: Vec<Option<Value>>) -> Result<Option<Value>, RuntimeError> {
    let line: Vec<String> = args.iter().map(value_to_string).collect();
    println!("{}", line.join(" "));
    Ok(None)
}

/// `len(x)`: characters of a string, items of a list, entries of a table.
fn len(args: Vec<Option<Value>>) -> Result<Option<Value>, RuntimeError> {
    let n = match arg(&args, 0) {
        Some(Value::String(s)) => s.chars().count(),
        Some(Value::List(items)) => items.borrow().len(),
        Some(Value::Table(table)) => table.borrow().len(),
        other => {
            return Err(RuntimeError::type_error(format!(
                "len() expects a string, list or table, found {}",
                type_name(&other)
            )));
        }
    };

    Ok(Some(Value::Number(n as f64)))
}

fn type_of(args: Vec<Option<Value>>) -> Result<Option<Value>, RuntimeError> {
    Ok(Some(Value::string(type_name(&arg(&args, 0)))))
}

/// `keys(x)`: table keys in insertion order, or list indices.
fn keys(args: Vec<Option<Value>>) -> Result<Option<Value>, RuntimeError> {
    let keys: Vec<Option<Value>> = match arg(&args, 0) {
        Some(Value::Table(table)) => table.borrow().keys().into_iter().map(Some).collect(),
        Some(Value::List(items)) => (0..items.borrow().len())
            .map(|i| Some(Value::Number(i as f64)))
            .collect(),
        other => {
            return Err(RuntimeError::type_error(format!(
                "keys() expects a table or list, found {}",
                type_name(&other)
            )));
        }
    };

    Ok(Some(Value::list(keys)))
}
