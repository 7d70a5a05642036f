/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * Core Globals
 * ------------
 * The handful of native functions a fresh session starts with. They are
 * plain `Function::Native` bindings in the root frame; scripts may shadow
 * or reassign them like any other name.
 *
 *   - builtins.rs : print, len, type, keys
 *   - array.rs    : push, pop
 *   - string.rs   : str, num
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

pub mod array;
pub mod builtins;
pub mod string;

use std::rc::Rc;

use crate::interpreter::environment::Env;
use crate::value::{Function, Value};

/// Binds every core global in `env`.
pub fn install_globals(env: &Env) {
    let mut frame = env.borrow_mut();

    for function in builtins::functions()
        .into_iter()
        .chain(array::functions())
        .chain(string::functions())
    {
        let name = function.name().unwrap_or_default().to_string();
        frame.declare(name, Some(Value::Function(Rc::new(function))));
    }

    tracing::debug!(names = ?frame.local_names(), "installed core globals");
}

/// Argument at `index`, or null when it was not supplied.
pub(crate) fn arg(args: &[Option<Value>], index: usize) -> Option<Value> {
    args.get(index).cloned().flatten()
}

pub(crate) type Natives = Vec<Function>;
