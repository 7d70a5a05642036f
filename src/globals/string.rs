/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * String Conversion Globals
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
use crate::value::{Function, Value};

pub(crate) fn functions() -> Natives {
    vec![
        Function::native("str", &["x"], to_str),
        Function::native("num", &["x"], to_num),
    ]
}

/// `str(x)`: the text `print` would show.
fn to_str(args: Vec<Option<Value>>) -> Result<Option<Value>, RuntimeError> {
    Ok(Some(Value::String(value_to_string(&arg(&args, 0)))))
}

/// `num(x)`: numbers pass through, strings are parsed; anything else, or
/// text that is not a number, gives null.
fn to_num(args: Vec<Option<Value>>) -> Result<Option<Value>, RuntimeError> {
    Ok(match arg(&args, 0) {
        Some(Value::Number(n)) => Some(Value::Number(n)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(Value::Number),
        _ => None,
    })
}
