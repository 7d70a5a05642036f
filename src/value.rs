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

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Stmt;
use crate::compiler::{CompiledStmt, Compiler};
use crate::error::RuntimeError;
use crate::interpreter::display::value_to_string;
use crate::stack::ensure_sufficient_stack;

/// NUA runtime value representation.
///
/// Every expression ultimately evaluates to `Option<Value>`; null is the
/// absence of a value, never a variant.
///
/// Lists and tables are shared by reference (`Rc<RefCell<_>>`), so copies
/// of a value alias the same collection.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    String(String),
    Bool(bool),
    List(ListRef),
    Table(TableRef),
    Function(Rc<Function>),
}

pub type ListRef = Rc<RefCell<Vec<Option<Value>>>>;
pub type TableRef = Rc<RefCell<Table>>;

/// Host closure backing a library binding.
pub type NativeFn = Rc<dyn Fn(Vec<Option<Value>>) -> Result<Option<Value>, RuntimeError>>;

impl Value {
    pub fn list(items: Vec<Option<Value>>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn table(table: Table) -> Value {
        Value::Table(Rc::new(RefCell::new(table)))
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::List(_) => "list",
            Value::Table(_) => "table",
            Value::Function(_) => "function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Type name of a possibly-absent value.
pub fn type_name(value: &Option<Value>) -> &'static str {
    value.as_ref().map_or("null", Value::type_name)
}

impl PartialEq for Value {
    /// Structural equality; functions compare by identity.
    fn eq(&self, other: &Self) -> bool {
        equal(self, other, &mut Vec::new())
    }
}

/// `==` on possibly-absent values. Two nulls are equal.
pub fn values_equal(a: &Option<Value>, b: &Option<Value>) -> bool {
    optional_equal(a, b, &mut Vec::new())
}

fn optional_equal(a: &Option<Value>, b: &Option<Value>, seen: &mut Vec<(usize, usize)>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => equal(x, y, seen),
        _ => false,
    }
}

/// Structural comparison that terminates on cyclic lists and tables.
///
/// `seen` holds the collection pairs currently being compared; meeting a
/// pair again means the cycle is consistent so far and counts as equal.
fn equal(a: &Value, b: &Value, seen: &mut Vec<(usize, usize)>) -> bool {
    ensure_sufficient_stack(|| equal_node(a, b, seen))
}

fn equal_node(a: &Value, b: &Value, seen: &mut Vec<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),

        (Value::List(x), Value::List(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let pair = (Rc::as_ptr(x) as usize, Rc::as_ptr(y) as usize);
            if seen.contains(&pair) {
                return true;
            }
            let (Ok(xs), Ok(ys)) = (x.try_borrow(), y.try_borrow()) else {
                return false;
            };

            seen.push(pair);
            let result = xs.len() == ys.len()
                && xs.iter().zip(ys.iter()).all(|(p, q)| optional_equal(p, q, seen));
            seen.pop();
            result
        }

        (Value::Table(x), Value::Table(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let pair = (Rc::as_ptr(x) as usize, Rc::as_ptr(y) as usize);
            if seen.contains(&pair) {
                return true;
            }
            let (Ok(xs), Ok(ys)) = (x.try_borrow(), y.try_borrow()) else {
                return false;
            };

            seen.push(pair);
            let result = xs.len() == ys.len()
                && xs.entries.iter().all(|(key, value)| match ys.position(key) {
                    Some(i) => equal(value, &ys.entries[i].1, seen),
                    None => false,
                });
            seen.pop();
            result
        }

        _ => false,
    }
}

/// Hashable form of a scalar key.
#[derive(Clone, PartialEq, Eq, Hash)]
enum ScalarKey {
    Number(u64),
    String(String),
    Bool(bool),
}

impl ScalarKey {
    /// `None` for keys only structural `==` can match: collections,
    /// functions and NaN.
    fn of(key: &Value) -> Option<Self> {
        match key {
            Value::Number(n) if n.is_nan() => None,
            // -0 == 0
            Value::Number(n) if *n == 0.0 => Some(ScalarKey::Number(0)),
            Value::Number(n) => Some(ScalarKey::Number(n.to_bits())),
            Value::String(s) => Some(ScalarKey::String(s.clone())),
            Value::Bool(b) => Some(ScalarKey::Bool(*b)),
            _ => None,
        }
    }
}

/// Key → value mapping with structurally-compared keys.
///
/// Entries keep insertion order. Number, string and boolean keys are
/// found through a hash index. Any other key is found by a linear scan
/// with deep `==`, so a table keyed by n lists costs O(n) per access and
/// O(n²) to fill.
#[derive(Clone, Default)]
pub struct Table {
    entries: Vec<(Value, Value)>,
    /// Position in `entries` of every scalar key.
    index: HashMap<ScalarKey, usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &Value) -> Option<usize> {
        match ScalarKey::of(key) {
            Some(scalar) => self.index.get(&scalar).copied(),
            None => self.entries.iter().position(|(k, _)| k == key),
        }
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.position(key).map(|i| self.entries[i].1.clone())
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.position(key).is_some()
    }

    pub fn insert(&mut self, key: Value, value: Value) {
        match self.position(&key) {
            Some(i) => self.entries[i].1 = value,
            None => {
                if let Some(scalar) = ScalarKey::of(&key) {
                    self.index.insert(scalar, self.entries.len());
                }
                self.entries.push((key, value));
            }
        }
    }

    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let i = self.position(key)?;
        let (removed, value) = self.entries.remove(i);

        if let Some(scalar) = ScalarKey::of(&removed) {
            self.index.remove(&scalar);
        }
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }

        Some(value)
    }

    /// Stores `value`, or removes the key when it is null.
    pub fn set(&mut self, key: Value, value: Option<Value>) {
        match value {
            Some(value) => self.insert(key, value),
            None => {
                self.remove(&key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<Value> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

/// A callable value.
///
/// Interpreted and compiled functions share the same AST body; the
/// compiled form builds its closure graph on first call and keeps it.
pub enum Function {
    Interpreted {
        name: Option<String>,
        params: Rc<[String]>,
        body: Rc<Stmt>,
    },

    Compiled {
        name: Option<String>,
        params: Rc<[String]>,
        body: Rc<Stmt>,
        /// Shared by every value created from the same literal.
        graph: Rc<OnceCell<CompiledStmt>>,
        compiler: Compiler,
    },

    Native {
        name: String,
        params: Rc<[String]>,
        func: NativeFn,
    },
}

impl Function {
    pub fn native(
        name: impl Into<String>,
        params: &[&str],
        func: impl Fn(Vec<Option<Value>>) -> Result<Option<Value>, RuntimeError> + 'static,
    ) -> Self {
        Function::Native {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Function::Interpreted { name, .. } | Function::Compiled { name, .. } => name.as_deref(),
            Function::Native { name, .. } => Some(name),
        }
    }

    pub fn params(&self) -> &[String] {
        match self {
            Function::Interpreted { params, .. }
            | Function::Compiled { params, .. }
            | Function::Native { params, .. } => params,
        }
    }

    pub fn form(&self) -> &'static str {
        match self {
            Function::Interpreted { .. } => "interpreted",
            Function::Compiled { .. } => "compiled",
            Function::Native { .. } => "native",
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} fn {}({})]",
            self.form(),
            self.name().unwrap_or("<anonymous>"),
            self.params().join(", ")
        )
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::List(_) | Value::Table(_) => write!(f, "{}", value_to_string(&Some(self.clone()))),
            Value::Function(func) => write!(f, "{:?}", func),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&value_to_string(&Some(self.clone())))
    }
}
