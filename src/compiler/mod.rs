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

/*!
 * Closure Compiler
 * ----------------
 *
 * Turns a parsed tree into a graph of boxed closures. Each node is
 * compiled once; running the graph skips the `match` on node kinds the
 * tree walker does on every visit.
 *
 * The compiled graph produces the same values, signals and errors as the
 * tree walker for every program. The only observable difference is
 * opt-in: under [`LiteralPolicy::Cache`] a constant list or table literal
 * evaluates to the same container every time.
 *
 * Function literals compile their bodies lazily, on first call, and every
 * function value created by one literal shares that body graph.
 */

mod compiled;
mod expressions;
mod literals;
mod statements;

pub use compiled::{CompiledExpr, CompiledStmt};

use crate::config::LiteralPolicy;

/// Compiles trees into closures. Compilation cannot fail; errors surface
/// when the closures run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compiler {
    policy: LiteralPolicy,
}

impl Compiler {
    pub fn new(policy: LiteralPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> LiteralPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::environment::Environment;
    use crate::interpreter::statements::ExecSignal;
    use crate::value::Value;
    use crate::{lex, parse};
    use std::rc::Rc;

    fn run(compiler: Compiler, source: &str) -> Option<Value> {
        let tree = parse(&lex(source).unwrap()).unwrap();
        let env = Environment::new_root();
        compiler.compile_stmt(&tree)(&env).unwrap().value
    }

    #[test]
    fn compiled_program_yields_last_value() {
        assert_eq!(run(Compiler::default(), "x = 2\nx * 3"), Some(Value::Number(6.0)));
    }

    #[test]
    fn top_level_return_is_reported() {
        let tree = parse(&lex("return 5\n6").unwrap()).unwrap();
        let env = Environment::new_root();
        let flow = Compiler::default().compile_stmt(&tree)(&env).unwrap();

        assert_eq!(flow.signal, ExecSignal::Return);
        assert_eq!(flow.value, Some(Value::Number(5.0)));
    }

    #[test]
    fn fresh_policy_rebuilds_constant_lists() {
        let source = "fn f() { return [1, 2] }\nf() == f()";
        assert_eq!(run(Compiler::new(LiteralPolicy::Fresh), source), Some(Value::Bool(true)));

        let tree = parse(&lex("fn f() { return [1] }\na = f()\nb = f()").unwrap()).unwrap();
        let env = Environment::new_root();
        Compiler::new(LiteralPolicy::Fresh).compile_stmt(&tree)(&env).unwrap();

        let (a, b) = (env.borrow().get("a"), env.borrow().get("b"));
        match (a, b) {
            (Some(Value::List(a)), Some(Value::List(b))) => assert!(!Rc::ptr_eq(&a, &b)),
            other => panic!("expected two lists, got {:?}", other),
        }
    }

    #[test]
    fn cache_policy_shares_constant_lists() {
        let tree = parse(&lex("fn f() { return [1] }\na = f()\nb = f()").unwrap()).unwrap();
        let env = Environment::new_root();
        Compiler::new(LiteralPolicy::Cache).compile_stmt(&tree)(&env).unwrap();

        let (a, b) = (env.borrow().get("a"), env.borrow().get("b"));
        match (a, b) {
            (Some(Value::List(a)), Some(Value::List(b))) => assert!(Rc::ptr_eq(&a, &b)),
            other => panic!("expected two lists, got {:?}", other),
        }
    }

    #[test]
    fn function_values_from_one_literal_share_a_body_graph() {
        let tree = parse(&lex("fs = [null, null]\nfor i of 2 { fs[i] = fn() { return 1 } }").unwrap()).unwrap();
        let env = Environment::new_root();
        Compiler::default().compile_stmt(&tree)(&env).unwrap();

        let Some(Value::List(items)) = env.borrow().get("fs") else {
            panic!("fs is not a list");
        };
        let items = items.borrow();
        match (&items[0], &items[1]) {
            (Some(Value::Function(a)), Some(Value::Function(b))) => {
                assert!(!Rc::ptr_eq(a, b));
                match (&**a, &**b) {
                    (
                        crate::value::Function::Compiled { graph: ga, .. },
                        crate::value::Function::Compiled { graph: gb, .. },
                    ) => assert!(Rc::ptr_eq(ga, gb)),
                    _ => panic!("expected compiled functions"),
                }
            }
            other => panic!("expected two functions, got {:?}", other),
        }
    }
}
