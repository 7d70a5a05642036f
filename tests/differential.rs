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

//! Runs every behavioral scenario through both engines and requires the
//! same value, the same control-flow signal and the same error.

use nua::globals::install_globals;
use nua::interpreter::environment::DEFAULT_MAX_CALL_DEPTH;
use nua::{
    lex, parse, ClosureEngine, Engine, Env, Environment, ExecSignal, Flow, LiteralPolicy,
    RuntimeError, TreeWalker, Value,
};
use pretty_assertions::assert_eq;

enum Expect {
    Value(Option<Value>),
    Error(&'static str),
}

fn num(n: f64) -> Option<Value> {
    Some(Value::Number(n))
}

fn text(s: &str) -> Option<Value> {
    Some(Value::string(s))
}

fn list(items: Vec<Option<Value>>) -> Option<Value> {
    Some(Value::list(items))
}

fn root() -> Env {
    let env = Environment::new_root();
    install_globals(&env);
    env
}

fn run(engine: &dyn Engine, source: &str) -> Result<Flow, RuntimeError> {
    let tokens = lex(source).unwrap_or_else(|e| panic!("failed to lex {source:?}: {e}"));
    let program = parse(&tokens).unwrap_or_else(|e| panic!("failed to parse {source:?}: {e}"));
    engine.execute(&program, &root())
}

/// Both engines must agree with each other and with `expect`.
fn check(source: &str, expect: Expect) {
    let tree = run(&TreeWalker, source);
    let compiled = run(&ClosureEngine::new(LiteralPolicy::Fresh), source);

    assert_eq!(tree, compiled, "engines disagree on:\n{source}");

    match (expect, tree) {
        (Expect::Value(expected), Ok(flow)) => assert_eq!(flow.value, expected, "value of:\n{source}"),
        (Expect::Error(code), Err(err)) => assert_eq!(err.code, code, "error of:\n{source}"),
        (Expect::Value(_), Err(err)) => panic!("{source:?} failed: {err}"),
        (Expect::Error(code), Ok(flow)) => panic!("{source:?} should fail with {code}, got {flow:?}"),
    }
}

#[test]
fn operator_precedence() {
    check("1 + 2 * 3", Expect::Value(num(7.0)));
    check("(1 + 2) * 3", Expect::Value(num(9.0)));
    check("2 ** 3 ** 2", Expect::Value(num(64.0)));
    check("2 * 3 ** 2", Expect::Value(num(36.0)));
    check("1 + 2 < 4 and 10 - 1 == 9", Expect::Value(Some(Value::Bool(true))));
    check("[-7 // 2, -7 % 2, 7 / 2]", Expect::Value(list(vec![num(-4.0), num(-1.0), num(3.5)])));
}

#[test]
fn break_inside_if_stops_the_loop() {
    let source = "
        seen = []
        for i of 10 {
            if i == 3 { break }
            push(seen, i)
        }
        seen
    ";
    check(source, Expect::Value(list(vec![num(0.0), num(1.0), num(2.0)])));
}

#[test]
fn continue_skips_the_rest_of_one_iteration() {
    let source = "
        total = 0
        for i of 6 {
            if i % 2 == 0 { continue }
            total += i
        }
        total
    ";
    check(source, Expect::Value(num(9.0)));
}

#[test]
fn return_leaves_the_function_from_nested_loops() {
    let source = "
        fn find(xs, want) {
            for i in xs {
                for j of 3 {
                    if xs[i] == want { return i }
                }
            }
            return -1
        }
        [find([5, 7, 9], 9), find([1], 4)]
    ";
    check(source, Expect::Value(list(vec![num(2.0), num(-1.0)])));
}

#[test]
fn while_loop_with_break() {
    let source = "
        n = 0
        while true {
            n += 1
            if n >= 5 { break }
        }
        n
    ";
    check(source, Expect::Value(num(5.0)));
}

#[test]
fn top_level_return_ends_the_program() {
    let source = "x = 1\nreturn x + 1\nx = 100";
    check(source, Expect::Value(num(2.0)));

    let flow = run(&ClosureEngine::default(), source).unwrap();
    assert_eq!(flow.signal, ExecSignal::Return);
}

#[test]
fn and_short_circuits_on_null() {
    let source = "
        hits = 0
        fn bump() {
            hits += 1
            return true
        }
        r = null and bump();
        [r, hits]
    ";
    check(source, Expect::Value(list(vec![None, num(0.0)])));
}

#[test]
fn or_returns_the_deciding_operand() {
    check("false or \"y\"", Expect::Value(text("y")));
    check("0 or 1", Expect::Value(num(0.0)));
    check("null or false", Expect::Value(Some(Value::Bool(false))));
    check("not 0", Expect::Value(Some(Value::Bool(false))));
}

#[test]
fn assignment_through_an_access_chain() {
    let source = "
        t = {a: [1, 2]}
        t.a[0] = 5
        t.a[0] + t[\"a\"][1]
    ";
    check(source, Expect::Value(num(7.0)));
}

#[test]
fn storing_null_removes_a_table_key() {
    let source = "
        t = {a: 1, b: 2}
        t.a = null;
        [keys(t), len(t)]
    ";
    check(source, Expect::Value(list(vec![list(vec![text("b")]), num(1.0)])));
}

#[test]
fn increments_and_compound_assignment() {
    check("x = 5\na = x++\nb = ++x;\n[a, b, x]", Expect::Value(list(vec![num(5.0), num(7.0), num(7.0)])));
    check("x = 10\nx -= 3\nx += 1", Expect::Value(num(8.0)));
    check("t = {n: 1}\nt.n++\nt.n", Expect::Value(num(2.0)));
    check("s = \"ab\"\ns += \"c\"", Expect::Value(text("abc")));
}

#[test]
fn strings() {
    check("\"banana\" - \"an\"", Expect::Value(text("bana")));
    check("s = \"hey\"\ns[-1]", Expect::Value(text("y")));
    check("out = []\nfor c of \"abc\" { push(out, c) }\nout", Expect::Value(list(vec![text("a"), text("b"), text("c")])));
}

#[test]
fn call_frames_see_their_callers() {
    let source = "
        fn reader() { return secret }
        fn caller() {
            secret = 42
            return reader()
        }
        [caller(), secret]
    ";
    check(source, Expect::Value(list(vec![num(42.0), None])));
}

#[test]
fn global_pins_writes_to_the_root() {
    let source = "
        fn setter() {
            global g
            g = 3
        }
        setter()
        g
    ";
    check(source, Expect::Value(num(3.0)));
}

#[test]
fn missing_parameters_shadow_outer_names() {
    let source = "
        x = 1
        fn f(x) {
            x = 2
            return x
        }
        [f(), x]
    ";
    check(source, Expect::Value(list(vec![num(2.0), num(1.0)])));
}

#[test]
fn large_tables_keep_order_through_removals() {
    let source = "
        t = {}
        for i of 2000 { t[i] = i * 2 }
        for i of 1000 { t[i] = null }
        t[[1]] = \"list\"
        k = keys(t);
        [len(t), t[1500], t[10], k[0], t[[1]]]
    ";
    check(source, Expect::Value(list(vec![num(1001.0), num(3000.0), None, num(1000.0), text("list")])));
}

#[test]
fn loops_iterate_keys_and_values() {
    check("t = {x: 1, y: 2}\nout = \"\"\nfor k in t { out += k }\nout", Expect::Value(text("xy")));
    check("sum = 0\nfor v of {x: 1, y: 2} { sum += v }\nsum", Expect::Value(num(3.0)));
    check("xs = [1, 2]\nfor v of xs { push(xs, v) }\nlen(xs)", Expect::Value(num(4.0)));
}

#[test]
fn if_elif_else_yields_the_branch_value() {
    let source = "x = 5\nif x < 3 { \"low\" } elif x < 10 { \"mid\" } else { \"high\" }";
    check(source, Expect::Value(text("mid")));
}

#[test]
fn recursion() {
    let source = "
        fn fib(n) {
            if n < 2 { return n }
            return fib(n - 1) + fib(n - 2)
        }
        fib(10)
    ";
    check(source, Expect::Value(num(55.0)));
}

#[test]
fn literals_are_fresh_per_evaluation() {
    check("fn f() { return [] }\na = f()\npush(a, 1)\nlen(f())", Expect::Value(num(0.0)));
    check("[1, {a: 2}] == [1, {a: 2}]", Expect::Value(Some(Value::Bool(true))));
    check("t = {[\"k\" + \"1\"]: 5, 1: \"one\"};\n[t.k1, t[1]]", Expect::Value(list(vec![num(5.0), text("one")])));
}

#[test]
fn errors_match_code_and_span() {
    check("1 + true", Expect::Error("E_TYPE"));
    check("x = 1\nx.y", Expect::Error("E_TYPE"));
    check("null.x", Expect::Error("E_REFERENCE"));
    check("[1][5]", Expect::Error("E_INDEX"));
    check("[1][0.5]", Expect::Error("E_TYPE"));
    check("5()", Expect::Error("E_CALL"));
    check("missing()", Expect::Error("E_REFERENCE"));
    check("s = \"abc\"\ns[0] = \"x\"", Expect::Error("E_TYPE"));
    check("{[null]: 1}", Expect::Error("E_TYPE"));
    check("for x of null { }", Expect::Error("E_TYPE"));
    check("-\"a\"", Expect::Error("E_TYPE"));
    check("x = null\nx++", Expect::Error("E_TYPE"));
    check("fn f(n) { return f(n + 1) }\nf(0)", Expect::Error("E_LIMIT"));
}

fn countdown(n: usize) -> String {
    format!("fn f(n) {{ if n == 0 {{ return 0 }} return f(n - 1) + 1 }}\nf({n})")
}

#[test]
fn recursion_may_use_every_allowed_frame() {
    let deepest = DEFAULT_MAX_CALL_DEPTH - 1;
    check(&countdown(deepest), Expect::Value(num(deepest as f64)));
}

#[test]
fn one_frame_past_the_limit_is_a_limit_error() {
    check(&countdown(DEFAULT_MAX_CALL_DEPTH), Expect::Error("E_LIMIT"));
}

#[test]
fn deeply_nested_source_runs_in_both_engines() {
    let depth = 5_000;
    let grouped = format!("{}1{} + 1", "(".repeat(depth), ")".repeat(depth));
    check(&grouped, Expect::Value(num(2.0)));

    let blocks = 1_000;
    let nested_ifs = format!("{}7{}", "if true { ".repeat(blocks), " }".repeat(blocks));
    check(&nested_ifs, Expect::Value(num(7.0)));
}

#[test]
fn error_stops_the_sequence() {
    let source = "
        log = []
        push(log, 1)
        1 + null
        push(log, 2)
    ";
    check(source, Expect::Error("E_TYPE"));
}

#[test]
fn cache_policy_shares_constant_literals() {
    let source = "fn f() { return [] }\na = f()\npush(a, 1)\nlen(f())";

    let cached = run(&ClosureEngine::new(LiteralPolicy::Cache), source).unwrap();
    assert_eq!(cached.value, num(1.0));

    let fresh = run(&ClosureEngine::new(LiteralPolicy::Fresh), source).unwrap();
    assert_eq!(fresh.value, num(0.0));
}

#[test]
fn non_constant_literals_are_rebuilt_under_cache() {
    let source = "fn f(x) { return [x] }\na = f(1)\npush(a, 2)\nlen(f(1))";
    let flow = run(&ClosureEngine::new(LiteralPolicy::Cache), source).unwrap();
    assert_eq!(flow.value, num(1.0));
}
