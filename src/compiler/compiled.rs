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

//! Closure types produced by the compiler.

use crate::error::RuntimeError;
use crate::interpreter::environment::Env;
use crate::interpreter::statements::Flow;
use crate::value::Value;

/// An expression compiled into a closure.
///
/// The closure takes the frame to evaluate in and returns the value, with
/// `None` standing for null.
///
/// ```rust,ignore
/// let answer: CompiledExpr = Box::new(|_env| Ok(Some(Value::Number(42.0))));
/// assert_eq!(answer(&env)?, Some(Value::Number(42.0)));
/// ```
pub type CompiledExpr = Box<dyn Fn(&Env) -> Result<Option<Value>, RuntimeError>>;

/// A statement compiled into a closure reporting the same [`Flow`] the tree
/// walker would.
pub type CompiledStmt = Box<dyn Fn(&Env) -> Result<Flow, RuntimeError>>;
