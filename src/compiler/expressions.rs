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

use std::cell::OnceCell;
use std::rc::Rc;

use crate::ast::{AccessKind, AccessTail, AssignOp, Expr, ExprKind, Fixity, LogicalOp, StepOp, Target};
use crate::compiler::compiled::CompiledExpr;
use crate::compiler::literals;
use crate::compiler::Compiler;
use crate::config::LiteralPolicy;
use crate::error::RuntimeError;
use crate::interpreter::access::{self, Place};
use crate::interpreter::calls::call_value;
use crate::interpreter::environment::Env;
use crate::interpreter::helpers::is_truthy;
use crate::interpreter::operators::{self, BinaryFn};
use crate::span::Span;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Function, Table, Value};

/// One compiled `.name`, `[expr]` or `(args)` suffix.
enum CompiledTail {
    Member(String, Span),
    Index(CompiledExpr, Span),
    Invoke(Vec<CompiledExpr>, Span),
}

impl CompiledTail {
    fn run(&self, value: Option<Value>, env: &Env) -> Result<Option<Value>, RuntimeError> {
        let (result, span) = match self {
            CompiledTail::Member(name, span) => (access::member(&value, name), *span),
            CompiledTail::Index(key, span) => {
                let key = key(env)?;
                (access::index(&value, &key), *span)
            }
            CompiledTail::Invoke(args, span) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(arg(env)?);
                }
                (call_value(value, values, env), *span)
            }
        };

        result.map_err(|e| e.at(span))
    }
}

fn run_chain(mut value: Option<Value>, tails: &[CompiledTail], env: &Env) -> Result<Option<Value>, RuntimeError> {
    for tail in tails {
        value = tail.run(value, env)?;
    }
    Ok(value)
}

/// Final key of an assignment target.
enum CompiledKey {
    Member(String),
    Index(CompiledExpr, Span),
    /// Left over from a call tail; always fails.
    Invalid(Span),
}

enum CompiledTarget {
    Variable(String),
    Slot {
        base: CompiledExpr,
        path: Vec<CompiledTail>,
        key: CompiledKey,
    },
    /// Access target without tails; never produced by the parser.
    Empty,
}

impl CompiledTarget {
    fn resolve(&self, env: &Env) -> Result<Place<'_>, RuntimeError> {
        match self {
            CompiledTarget::Variable(name) => Ok(Place::Variable(name)),

            CompiledTarget::Slot { base, path, key } => {
                let container = run_chain(base(env)?, path, env)?;

                let key = match key {
                    CompiledKey::Member(name) => Value::string(name.as_str()),
                    CompiledKey::Index(key, span) => access::slot_key(key(env)?).map_err(|e| e.at(*span))?,
                    CompiledKey::Invalid(span) => {
                        return Err(RuntimeError::runtime_error("cannot assign to a call").at(*span));
                    }
                };

                Ok(Place::Slot { container, key })
            }

            CompiledTarget::Empty => Err(RuntimeError::runtime_error("invalid assignment target")),
        }
    }
}

/// Runs `inner` on a segment with room for its nested operands.
fn guarded(inner: CompiledExpr) -> CompiledExpr {
    Box::new(move |env: &Env| ensure_sufficient_stack(|| inner(env)))
}

impl Compiler {
    /// Compiles an expression into a closure.
    ///
    /// Nodes with operands get a stack check around their closure, since
    /// running them recurses as deep as the source nests.
    pub fn compile_expr(&self, expr: &Expr) -> CompiledExpr {
        ensure_sufficient_stack(|| {
            let compiled = self.compile_node(expr);
            match expr.kind {
                ExprKind::Literal(_) | ExprKind::Variable(_) | ExprKind::Function(_) => compiled,
                _ => guarded(compiled),
            }
        })
    }

    fn compile_node(&self, expr: &Expr) -> CompiledExpr {
        if let Some(constant) = literals::fold(expr) {
            return self.compile_constant(constant);
        }

        match &expr.kind {
            ExprKind::Literal(value) => {
                let value = value.clone();
                Box::new(move |_env: &Env| Ok(value.clone()))
            }

            ExprKind::Variable(name) => {
                let name = name.clone();
                Box::new(move |env: &Env| Ok(env.borrow().get(&name)))
            }

            ExprKind::List(items) => {
                let items: Vec<CompiledExpr> = items.iter().map(|item| self.compile_expr(item)).collect();
                Box::new(move |env: &Env| {
                    let mut values = Vec::with_capacity(items.len());
                    for item in &items {
                        values.push(item(env)?);
                    }
                    Ok(Some(Value::list(values)))
                })
            }

            ExprKind::Table(entries) => {
                let entries: Vec<(CompiledExpr, Span, CompiledExpr)> = entries
                    .iter()
                    .map(|(key, value)| (self.compile_expr(key), key.span, self.compile_expr(value)))
                    .collect();

                Box::new(move |env: &Env| {
                    let mut table = Table::new();
                    for (key, key_span, value) in &entries {
                        let k = key(env)?
                            .ok_or_else(|| RuntimeError::type_error("table key cannot be null").at(*key_span))?;
                        let v = value(env)?;
                        table.set(k, v);
                    }
                    Ok(Some(Value::table(table)))
                })
            }

            ExprKind::Function(literal) => {
                let name = literal.name.clone();
                let params = literal.params.clone();
                let body = literal.body.clone();
                let graph = Rc::new(OnceCell::new());
                let compiler = *self;

                Box::new(move |_env: &Env| {
                    Ok(Some(Value::Function(Rc::new(Function::Compiled {
                        name: name.clone(),
                        params: params.clone(),
                        body: body.clone(),
                        graph: graph.clone(),
                        compiler,
                    }))))
                })
            }

            ExprKind::Negate(inner) => {
                let inner = self.compile_expr(inner);
                let span = expr.span;
                Box::new(move |env: &Env| operators::negate(inner(env)?).map_err(|e| e.at(span)))
            }

            ExprKind::Not(inner) => {
                let inner = self.compile_expr(inner);
                Box::new(move |env: &Env| Ok(operators::not(&inner(env)?)))
            }

            ExprKind::Binary { left, tails } => {
                let left = self.compile_expr(left);
                let tails: Vec<(BinaryFn, CompiledExpr, Span)> = tails
                    .iter()
                    .map(|tail| (operators::resolve(tail.op), self.compile_expr(&tail.right), tail.span))
                    .collect();

                Box::new(move |env: &Env| {
                    let mut acc = left(env)?;
                    for (op, right, span) in &tails {
                        let right = right(env)?;
                        acc = op(acc, right).map_err(|e| e.at(*span))?;
                    }
                    Ok(acc)
                })
            }

            ExprKind::Logical { op, left, rest } => {
                let left = self.compile_expr(left);
                let rest: Vec<CompiledExpr> = rest.iter().map(|e| self.compile_expr(e)).collect();
                let stop_when_truthy = *op == LogicalOp::Or;

                Box::new(move |env: &Env| {
                    let mut acc = left(env)?;
                    for operand in &rest {
                        if is_truthy(&acc) == stop_when_truthy {
                            break;
                        }
                        acc = operand(env)?;
                    }
                    Ok(acc)
                })
            }

            ExprKind::Access { base, tails } => {
                let base = self.compile_expr(base);
                let tails = self.compile_tails(tails);
                Box::new(move |env: &Env| run_chain(base(env)?, &tails, env))
            }

            ExprKind::Assign { target, op, value } => self.compile_assign(target, *op, value, expr.span),

            ExprKind::Step { target, op, fixity } => self.compile_step(target, *op, *fixity, expr.span),
        }
    }

    /// Constant expression under the configured literal policy.
    ///
    /// Scalars are immutable and always shared. Containers are rebuilt from
    /// the template on every evaluation unless the policy caches them.
    fn compile_constant(&self, constant: Option<Value>) -> CompiledExpr {
        if literals::is_container(&constant) && self.policy() == LiteralPolicy::Fresh {
            return Box::new(move |_env: &Env| Ok(constant.as_ref().map(literals::deep_copy)));
        }

        Box::new(move |_env: &Env| Ok(constant.clone()))
    }

    fn compile_tails(&self, tails: &[AccessTail]) -> Vec<CompiledTail> {
        tails
            .iter()
            .map(|tail| match &tail.kind {
                AccessKind::Member(name) => CompiledTail::Member(name.clone(), tail.span),
                AccessKind::Index(key) => CompiledTail::Index(self.compile_expr(key), tail.span),
                AccessKind::Invoke(args) => {
                    CompiledTail::Invoke(args.iter().map(|a| self.compile_expr(a)).collect(), tail.span)
                }
            })
            .collect()
    }

    fn compile_target(&self, target: &Target) -> CompiledTarget {
        match target {
            Target::Variable(name) => CompiledTarget::Variable(name.clone()),

            Target::Access { base, tails } => {
                let Some((last, path)) = tails.split_last() else {
                    return CompiledTarget::Empty;
                };

                let key = match &last.kind {
                    AccessKind::Member(name) => CompiledKey::Member(name.clone()),
                    AccessKind::Index(key) => CompiledKey::Index(self.compile_expr(key), last.span),
                    AccessKind::Invoke(_) => CompiledKey::Invalid(last.span),
                };

                CompiledTarget::Slot {
                    base: self.compile_expr(base),
                    path: self.compile_tails(path),
                    key,
                }
            }
        }
    }

    fn compile_assign(&self, target: &Target, op: AssignOp, value: &Expr, span: Span) -> CompiledExpr {
        let target = self.compile_target(target);
        let value = self.compile_expr(value);

        match op.binary() {
            None => Box::new(move |env: &Env| {
                let place = target.resolve(env)?;
                let result = value(env)?;
                place.write(env, result.clone()).map_err(|e| e.at(span))?;
                Ok(result)
            }),

            Some(binary) => {
                let apply = operators::resolve(binary);
                Box::new(move |env: &Env| {
                    let place = target.resolve(env)?;
                    let current = place.read(env).map_err(|e| e.at(span))?;
                    let rhs = value(env)?;
                    let result = apply(current, rhs).map_err(|e| e.at(span))?;
                    place.write(env, result.clone()).map_err(|e| e.at(span))?;
                    Ok(result)
                })
            }
        }
    }

    fn compile_step(&self, target: &Target, op: StepOp, fixity: Fixity, span: Span) -> CompiledExpr {
        let target = self.compile_target(target);

        Box::new(move |env: &Env| {
            let place = target.resolve(env)?;
            let current = place.read(env).map_err(|e| e.at(span))?;
            let old = operators::step_operand(&current, op).map_err(|e| e.at(span))?;
            let new = old + op.delta();

            place.write(env, Some(Value::Number(new))).map_err(|e| e.at(span))?;

            Ok(Some(Value::Number(match fixity {
                Fixity::Prefix => new,
                Fixity::Suffix => old,
            })))
        })
    }
}
