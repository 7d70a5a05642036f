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

use nua::interpreter::display::{value_to_repr, value_to_string};
use nua::{evaluate, lex, parse, Config, DiagnosticPrinter, Environment, EvalMode, Interpreter, NuaError, Value};
use pretty_assertions::assert_eq;

fn sessions() -> Vec<Interpreter> {
    [EvalMode::Tree, EvalMode::Compiled]
        .into_iter()
        .map(|mode| {
            Interpreter::new(Config {
                mode,
                ..Config::default()
            })
        })
        .collect()
}

/// Evaluates `source` in every mode and renders the result.
fn shown(source: &str) -> String {
    let mut rendered = sessions().into_iter().map(|nua| {
        let value = nua
            .eval(source)
            .unwrap_or_else(|e| panic!("{} engine failed on {source:?}: {e}", nua.engine_name()));
        value_to_repr(&value)
    });

    let first = rendered.next().unwrap_or_default();
    for other in rendered {
        assert_eq!(first, other, "modes disagree on {source:?}");
    }
    first
}

fn failure(source: &str) -> NuaError {
    let mut errors = sessions().into_iter().map(|nua| nua.eval(source).unwrap_err());
    let first = errors.next().unwrap();
    for other in errors {
        assert_eq!(first, other, "modes disagree on {source:?}");
    }
    first
}

#[test]
fn evaluate_runs_a_parsed_program() {
    let program = parse(&lex("a = 2\nb = 3\na * b").unwrap()).unwrap();
    let env = Environment::new_root();

    assert_eq!(evaluate(&program, &env).unwrap(), Some(Value::Number(6.0)));
    assert_eq!(env.borrow().get("a"), Some(Value::Number(2.0)));
}

#[test]
fn collections_display_like_literals() {
    assert_eq!(shown("[1, 2.5, \"x\", null, true]"), "[1, 2.5, \"x\", null, true]");
    assert_eq!(shown("{a: 1, [2]: [3]}"), "{\"a\": 1, [2]: [3]}");
    assert_eq!(shown("fn add(a, b) { return a + b }"), "<fn add(a, b)>");
    assert_eq!(shown("xs = [1]\npush(xs, xs)"), "[1, [...]]");
}

#[test]
fn core_globals() {
    assert_eq!(shown("[len(\"héllo\"), len([1, 2]), len({a: 1})]"), "[5, 2, 1]");
    assert_eq!(shown("[type(1), type(\"\"), type(null), type([]), type({}), type(len)]"),
               "[\"number\", \"string\", \"null\", \"list\", \"table\", \"function\"]");
    assert_eq!(shown("str(1.50) + str([1])"), "\"1.5[1]\"");
    assert_eq!(shown("[num(\" 42 \"), num(\"nope\")]"), "[42, null]");
    assert_eq!(shown("xs = [1, 2];\n[pop(xs), pop(xs), pop(xs), xs]"), "[2, 1, null, []]");
    assert_eq!(shown("keys({b: 1, a: 2})"), "[\"b\", \"a\"]");
}

#[test]
fn top_level_values_print_raw() {
    let nua = Interpreter::default();
    assert_eq!(value_to_string(&nua.eval("\"plain\"").unwrap()), "plain");
    assert_eq!(value_to_string(&nua.eval("3 / 2").unwrap()), "1.5");
    assert_eq!(value_to_string(&nua.eval("null").unwrap()), "null");
}

#[test]
fn function_values_are_first_class() {
    let source = "
        fn twice(f, x) { return f(f(x)) }
        inc = fn(n) { return n + 1 }
        twice(inc, 5)
    ";
    assert_eq!(shown(source), "7");
    assert_eq!(shown("t = {f: fn() { return 9 }}\nt.f()"), "9");
    assert_eq!(shown("f = len\nf == len"), "true");
}

#[test]
fn inner_functions_do_not_capture() {
    let source = "
        fn outer() {
            hidden = 1
            return fn() { return hidden }
        }
        g = outer()
        g()
    ";
    assert_eq!(shown(source), "null");
}

#[test]
fn multiline_strings_and_comments() {
    assert_eq!(shown("# leading comment\ns = 'one\ntwo' # trailing\nlen(s)"), "7");
}

#[test]
fn host_bindings_are_callable() {
    use nua::Function;
    use std::rc::Rc;

    for nua in sessions() {
        let double = Function::native("double", &["x"], |args| {
            let n = args.into_iter().next().flatten().and_then(|v| v.as_number()).unwrap_or(0.0);
            Ok(Some(Value::Number(n * 2.0)))
        });
        nua.define("double", Value::Function(Rc::new(double)));
        assert_eq!(nua.eval("double(21)").unwrap(), Some(Value::Number(42.0)));
    }
}

#[test]
fn lex_and_parse_errors_surface_through_eval() {
    assert_eq!(failure("x = \"open").code(), "E_LEX");
    assert_eq!(failure("x = )").code(), "E_PARSE");
    assert_eq!(failure("if true {").code(), "E_PARSE");
}

#[test]
fn runtime_errors_point_at_the_operation() {
    let source = "x = 1\ny = x + true\n";
    let err = failure(source);

    assert_eq!(err.code(), "E_TYPE");
    assert_eq!(err.to_string(), "cannot apply '+' to number and boolean");

    let span = err.span().unwrap();
    assert_eq!((span.line, span.column), (2, 7));

    let rendered = DiagnosticPrinter::new("demo.nua", source).render(&err);
    assert!(rendered.contains("--> demo.nua:2:7"), "{rendered}");
    assert!(rendered.contains("y = x + true"), "{rendered}");
}

#[test]
fn raised_depth_limit_is_usable_on_a_small_thread() {
    let source = "fn f(n) { if n == 0 { return 0 } return f(n - 1) + 1 }\nf(4999)";

    for mode in [EvalMode::Tree, EvalMode::Compiled] {
        let nua = Interpreter::new(Config {
            mode,
            max_call_depth: 5_000,
            ..Config::default()
        });
        assert_eq!(nua.eval(source).unwrap(), Some(Value::Number(4_999.0)), "{} engine", nua.engine_name());
        assert_eq!(nua.eval("f(5000)").unwrap_err().code(), "E_LIMIT");
    }
}

#[test]
fn depth_limit_carries_help() {
    let err = failure("fn f() { return f() }\nf()");
    assert_eq!(err.code(), "E_LIMIT");
    assert!(err.help().is_some());
}
