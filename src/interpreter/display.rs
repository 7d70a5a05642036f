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

use std::rc::Rc;

use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

/// ============================================================================
/// value_to_string
/// ============================================================================
/// Converts a runtime value into a **human-readable string**.
/// This is used by:
///   - `print()`
///   - the REPL echo
///   - `Display` / `Debug` for collections
///
/// Examples:
///   - Number(7.0)       → "7"
///   - Number(3.14)      → "3.14"
///   - String("cat")     → "cat"
///   - List([1, "a"])    → "[1, \"a\"]"
///   - Table             → "{\"k\": 1}"
///   - Function          → "<fn add(a, b)>"
///   - null              → "null"
///
/// A collection that contains itself prints the inner occurrence as
/// `[...]` or `{...}` instead of recursing forever.
/// ============================================================================
pub fn value_to_string(value: &Option<Value>) -> String {
    let mut out = String::new();
    write_value(value, &mut out, &mut Vec::new(), false);
    out
}

/// Like `value_to_string`, but strings come back quoted and escaped.
pub fn value_to_repr(value: &Option<Value>) -> String {
    let mut out = String::new();
    write_value(value, &mut out, &mut Vec::new(), true);
    out
}

/// Formats a number without a trailing `.0` when it is integral.
pub fn number_to_string(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{}", n as i64)
    } else if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        n.to_string()
    }
}

fn write_value(value: &Option<Value>, out: &mut String, open: &mut Vec<usize>, quoted: bool) {
    ensure_sufficient_stack(|| write_node(value, out, open, quoted))
}

fn write_node(value: &Option<Value>, out: &mut String, open: &mut Vec<usize>, quoted: bool) {
    let Some(value) = value else {
        out.push_str("null");
        return;
    };

    match value {
        Value::Number(n) => out.push_str(&number_to_string(*n)),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),

        Value::String(s) => {
            if quoted {
                out.push_str(&format!("{:?}", s));
            } else {
                out.push_str(s);
            }
        }

        Value::List(items) => {
            let id = Rc::as_ptr(items) as usize;
            let Ok(items) = items.try_borrow() else {
                out.push_str("[...]");
                return;
            };
            if open.contains(&id) {
                out.push_str("[...]");
                return;
            }

            open.push(id);
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, out, open, true);
            }
            out.push(']');
            open.pop();
        }

        Value::Table(table) => {
            let id = Rc::as_ptr(table) as usize;
            let Ok(table) = table.try_borrow() else {
                out.push_str("{...}");
                return;
            };
            if open.contains(&id) {
                out.push_str("{...}");
                return;
            }

            open.push(id);
            out.push('{');
            for (i, (key, val)) in table.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(&Some(key.clone()), out, open, true);
                out.push_str(": ");
                write_value(&Some(val.clone()), out, open, true);
            }
            out.push('}');
            open.pop();
        }

        Value::Function(func) => {
            out.push_str("<fn");
            if let Some(name) = func.name() {
                out.push(' ');
                out.push_str(name);
            }
            out.push('(');
            out.push_str(&func.params().join(", "));
            out.push_str(")>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Function, Table};
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_drop_integral_fraction() {
        assert_eq!(number_to_string(7.0), "7");
        assert_eq!(number_to_string(-2.0), "-2");
        assert_eq!(number_to_string(2.5), "2.5");
        assert_eq!(number_to_string(f64::INFINITY), "inf");
    }

    #[test]
    fn nested_strings_are_quoted() {
        let list = Value::list(vec![Some(Value::Number(1.0)), Some(Value::string("a")), None]);
        assert_eq!(value_to_string(&Some(list)), "[1, \"a\", null]");
        assert_eq!(value_to_string(&Some(Value::string("a"))), "a");
        assert_eq!(value_to_repr(&Some(Value::string("a"))), "\"a\"");
    }

    #[test]
    fn tables_print_in_insertion_order() {
        let mut table = Table::new();
        table.insert(Value::string("b"), Value::Number(2.0));
        table.insert(Value::string("a"), Value::Bool(true));

        assert_eq!(value_to_string(&Some(Value::table(table))), "{\"b\": 2, \"a\": true}");
    }

    #[test]
    fn self_containing_list_prints_a_marker() {
        let list = Value::list(vec![Some(Value::Number(1.0))]);
        if let Value::List(items) = &list {
            items.borrow_mut().push(Some(list.clone()));
        }

        assert_eq!(value_to_string(&Some(list)), "[1, [...]]");
    }

    #[test]
    fn functions_show_name_and_params() {
        let f = Function::native("add", &["a", "b"], |_| Ok(None));
        assert_eq!(value_to_string(&Some(Value::Function(Rc::new(f)))), "<fn add(a, b)>");
    }
}
