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
use crate::interpreter::environment::Env;
use crate::value::{type_name, Value};

/// `base.name`
pub fn member(base: &Option<Value>, name: &str) -> Result<Option<Value>, RuntimeError> {
    match base {
        Some(Value::Table(table)) => Ok(table.borrow().get(&Value::string(name))),
        None => Err(RuntimeError::reference_error(format!(
            "cannot read member '{}' of null",
            name
        ))),
        Some(other) => Err(RuntimeError::type_error(format!(
            "cannot read member '{}' of {}",
            name,
            other.type_name()
        ))),
    }
}

/// `base[key]`
pub fn index(base: &Option<Value>, key: &Option<Value>) -> Result<Option<Value>, RuntimeError> {
    match base {
        Some(Value::List(items)) => {
            let items = items.borrow();
            let i = position(key, items.len(), "list")?;
            Ok(items[i].clone())
        }

        Some(Value::String(s)) => {
            let count = s.chars().count();
            let i = position(key, count, "string")?;
            Ok(s.chars().nth(i).map(|c| Value::String(c.to_string())))
        }

        Some(Value::Table(table)) => {
            let key = table_key(key)?;
            Ok(table.borrow().get(&key))
        }

        None => Err(RuntimeError::reference_error("cannot index null")),

        Some(other) => Err(RuntimeError::type_error(format!(
            "cannot index {}",
            other.type_name()
        ))),
    }
}

/// `container[key] = value`, in place.
///
/// Null removes a table key but is stored as-is in a list slot.
pub fn store(container: &Option<Value>, key: Value, value: Option<Value>) -> Result<(), RuntimeError> {
    match container {
        Some(Value::Table(table)) => {
            table.borrow_mut().set(key, value);
            Ok(())
        }

        Some(Value::List(items)) => {
            let mut items = items.borrow_mut();
            let i = position(&Some(key), items.len(), "list")?;
            items[i] = value;
            Ok(())
        }

        Some(Value::String(_)) => Err(RuntimeError::type_error("strings are immutable")),

        None => Err(RuntimeError::reference_error("cannot assign into null")),

        Some(other) => Err(RuntimeError::type_error(format!(
            "cannot assign into {}",
            other.type_name()
        ))),
    }
}

fn table_key(key: &Option<Value>) -> Result<Value, RuntimeError> {
    key.clone()
        .ok_or_else(|| RuntimeError::type_error("table key cannot be null"))
}

/// Resolves a (possibly negative) index against a sequence of `len`.
fn position(key: &Option<Value>, len: usize, what: &str) -> Result<usize, RuntimeError> {
    let n = match key {
        Some(Value::Number(n)) if n.fract() == 0.0 => *n,
        other => {
            return Err(RuntimeError::type_error(format!(
                "{} index must be an integer, found {}",
                what,
                type_name(other)
            )));
        }
    };

    let resolved = if n < 0.0 { len as f64 + n } else { n };
    if resolved < 0.0 || resolved >= len as f64 {
        return Err(RuntimeError::index_error(format!(
            "index {} out of range for {} of length {}",
            n, what, len
        )));
    }

    Ok(resolved as usize)
}

/// An assignable location after its path has been evaluated.
///
/// Both the tree walker and compiled closures resolve a target to a
/// `Place` and then read or write through it, so compound assignment and
/// `++`/`--` evaluate the container and key only once.
pub enum Place<'a> {
    Variable(&'a str),
    Slot { container: Option<Value>, key: Value },
}

impl Place<'_> {
    pub fn read(&self, env: &Env) -> Result<Option<Value>, RuntimeError> {
        match self {
            Place::Variable(name) => Ok(env.borrow().get(name)),
            Place::Slot { container, key } => match key {
                Value::String(name) if !matches!(container, Some(Value::List(_)) | Some(Value::String(_))) => {
                    member(container, name)
                }
                _ => index(container, &Some(key.clone())),
            },
        }
    }

    pub fn write(&self, env: &Env, value: Option<Value>) -> Result<(), RuntimeError> {
        match self {
            Place::Variable(name) => {
                env.borrow_mut().set(name, value);
                Ok(())
            }
            Place::Slot { container, key } => store(container, key.clone(), value),
        }
    }
}

/// Key of the final `.name` / `[expr]` tail of an assignment target.
pub fn slot_key(key: Option<Value>) -> Result<Value, RuntimeError> {
    key.ok_or_else(|| RuntimeError::type_error("cannot use null as an index"))
}
