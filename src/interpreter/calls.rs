/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * Call Dispatch & Invocation
 * --------------------------
 * Runs a function value against already-evaluated arguments:
 *
 *  - native functions receive the argument list as-is
 *  - interpreted functions walk their body in a fresh call frame
 *  - compiled functions build their closure graph on first use, then run it
 *
 * A call frame's parent is the caller's frame. Parameters are bound
 * positionally; surplus arguments are dropped and missing ones are bound
 * to null so they still shadow outer names.
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

use crate::error::RuntimeError;
use crate::interpreter::environment::{Env, Environment};
use crate::interpreter::statements::{exec_stmt, Flow};
use crate::stack::ensure_sufficient_stack;
use crate::value::{type_name, Function, Value};

/// Calls `callee`, which must hold a function.
pub fn call_value(
    callee: Option<Value>,
    args: Vec<Option<Value>>,
    caller: &Env,
) -> Result<Option<Value>, RuntimeError> {
    match callee {
        Some(Value::Function(func)) => call_function(&func, args, caller),
        None => Err(RuntimeError::reference_error("cannot call null")),
        other => Err(RuntimeError::call_error(format!(
            "cannot call a {}",
            type_name(&other)
        ))),
    }
}

/// Invokes `func` from the frame `caller`.
///
/// The call's value is the `return`ed value, or the value of the last
/// statement of the body when it runs to completion.
pub fn call_function(
    func: &Rc<Function>,
    args: Vec<Option<Value>>,
    caller: &Env,
) -> Result<Option<Value>, RuntimeError> {
    caller.borrow().check_interrupt()?;
    ensure_sufficient_stack(|| invoke(func, args, caller))
}

fn invoke(func: &Function, args: Vec<Option<Value>>, caller: &Env) -> Result<Option<Value>, RuntimeError> {
    match func {
        Function::Native { func: native, .. } => native(args),

        Function::Interpreted { name, params, body } => {
            let frame = bind_frame(params, args, caller)?;
            tracing::trace!(name = name.as_deref().unwrap_or("<anonymous>"), depth = frame.borrow().depth(), "call");

            let flow = exec_stmt(body, &frame)?;
            Ok(finish(flow))
        }

        Function::Compiled {
            name,
            params,
            body,
            graph,
            compiler,
        } => {
            let graph = graph.get_or_init(|| {
                tracing::debug!(name = name.as_deref().unwrap_or("<anonymous>"), "compiling function body");
                compiler.compile_stmt(body)
            });

            let frame = bind_frame(params, args, caller)?;
            tracing::trace!(name = name.as_deref().unwrap_or("<anonymous>"), depth = frame.borrow().depth(), "call");

            let flow = graph(&frame)?;
            Ok(finish(flow))
        }
    }
}

fn bind_frame(params: &[String], args: Vec<Option<Value>>, caller: &Env) -> Result<Env, RuntimeError> {
    let frame = Environment::child(caller)?;

    {
        let mut scope = frame.borrow_mut();
        let mut args = args.into_iter();
        for param in params {
            scope.declare(param.as_str(), args.next().flatten());
        }
    }

    Ok(frame)
}

/// `Return` and fall-through both deliver the flow's value.
fn finish(flow: Flow) -> Option<Value> {
    flow.value
}
