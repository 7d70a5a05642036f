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

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

pub type Env = Rc<RefCell<Environment>>;

/// Default cap on nested calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

/// Settings shared by every frame of one root.
pub struct Limits {
    pub max_call_depth: usize,
    interrupt: Option<Box<dyn Fn() -> bool>>,
}

impl Limits {
    pub fn new(max_call_depth: usize) -> Self {
        Self {
            max_call_depth,
            interrupt: None,
        }
    }

    /// Installs a predicate polled at every loop iteration and call
    /// boundary; returning `true` aborts evaluation.
    pub fn with_interrupt(mut self, interrupt: impl Fn() -> bool + 'static) -> Self {
        self.interrupt = Some(Box::new(interrupt));
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CALL_DEPTH)
    }
}

/// One scope frame.
///
/// Only function calls create frames; blocks and loops run in the frame
/// of their enclosing call. A binding whose value is `None` exists only
/// for parameters that were not supplied, so they still shadow outer names.
pub struct Environment {
    values: HashMap<String, Option<Value>>,
    /// Names routed to the root frame by `global`.
    pinned: HashSet<String>,
    parent: Option<Env>,
    depth: usize,
    limits: Rc<Limits>,
}

impl Environment {
    /// Creates a root frame with default limits.
    pub fn new_root() -> Env {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Env {
        Rc::new(RefCell::new(Self {
            values: HashMap::new(),
            pinned: HashSet::new(),
            parent: None,
            depth: 0,
            limits: Rc::new(limits),
        }))
    }

    /// Creates a call frame under `parent`.
    ///
    /// # Errors
    /// Fails when the new frame would exceed the configured call depth.
    pub fn child(parent: &Env) -> Result<Env, RuntimeError> {
        let (depth, limits) = {
            let p = parent.borrow();
            (p.depth + 1, p.limits.clone())
        };

        if depth > limits.max_call_depth {
            return Err(RuntimeError::limit_error(format!(
                "maximum call depth of {} exceeded",
                limits.max_call_depth
            ))
            .with_help("check for unbounded recursion or raise max_call_depth"));
        }

        Ok(Rc::new(RefCell::new(Self {
            values: HashMap::new(),
            pinned: HashSet::new(),
            parent: Some(parent.clone()),
            depth,
            limits,
        })))
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Outermost frame of the chain, or `None` when `self` is the root.
    fn root(&self) -> Option<Env> {
        let mut frame = self.parent.clone()?;
        loop {
            let next = frame.borrow().parent.clone();
            match next {
                Some(parent) => frame = parent,
                None => return Some(frame),
            }
        }
    }

    /// Looks `name` up here, then in the parent chain.
    ///
    /// Pinned names are read from the root frame. An unbound name yields
    /// `None`, same as a binding holding null.
    pub fn get(&self, name: &str) -> Option<Value> {
        if self.pinned.contains(name) {
            if let Some(root) = self.root() {
                return root.borrow().get(name);
            }
        }

        if let Some(value) = self.values.get(name) {
            return value.clone();
        }

        match &self.parent {
            Some(parent) => ensure_sufficient_stack(|| parent.borrow().get(name)),
            None => None,
        }
    }

    /// Whether `name` is bound anywhere this frame can see.
    pub fn resolves(&self, name: &str) -> bool {
        if self.pinned.contains(name) {
            if let Some(root) = self.root() {
                return root.borrow().resolves(name);
            }
        }

        self.values.contains_key(name)
            || self
                .parent
                .as_ref()
                .is_some_and(|p| ensure_sufficient_stack(|| p.borrow().resolves(name)))
    }

    /// Assigns `name`.
    ///
    /// Routing, first match wins:
    /// 1. pinned by `global` → root frame
    /// 2. bound here, or this is the root → this frame
    /// 3. bound in an ancestor → delegated to the parent
    /// 4. otherwise → new binding in this frame
    ///
    /// Assigning `None` deletes the binding in the chosen frame.
    pub fn set(&mut self, name: &str, value: Option<Value>) {
        if self.pinned.contains(name) {
            if let Some(root) = self.root() {
                root.borrow_mut().write_local(name, value);
                return;
            }
        }

        if self.values.contains_key(name) || self.parent.is_none() {
            self.write_local(name, value);
            return;
        }

        if let Some(parent) = self.parent.clone() {
            if parent.borrow().resolves(name) {
                ensure_sufficient_stack(|| parent.borrow_mut().set(name, value));
                return;
            }
        }

        self.write_local(name, value);
    }

    /// Binds `name` in this frame even when `value` is `None`.
    ///
    /// Used for parameters, and by hosts seeding library bindings.
    pub fn declare(&mut self, name: impl Into<String>, value: Option<Value>) {
        self.values.insert(name.into(), value);
    }

    /// Routes later reads and writes of `name` in this frame to the root.
    pub fn pin_global(&mut self, name: impl Into<String>) {
        if self.parent.is_some() {
            self.pinned.insert(name.into());
        }
    }

    pub fn is_pinned(&self, name: &str) -> bool {
        self.pinned.contains(name)
    }

    /// Binding held by this frame only.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned().flatten()
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names bound in this frame, sorted.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.keys().cloned().collect();
        names.sort();
        names
    }

    fn write_local(&mut self, name: &str, value: Option<Value>) {
        match value {
            Some(value) => {
                self.values.insert(name.to_string(), Some(value));
            }
            None => {
                self.values.remove(name);
            }
        }
    }

    /// Polls the host interrupt hook.
    pub fn check_interrupt(&self) -> Result<(), RuntimeError> {
        match &self.limits.interrupt {
            Some(interrupt) if interrupt() => Err(RuntimeError::interrupted()),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.local_names())
            .field("pinned", &self.pinned)
            .field("depth", &self.depth)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
