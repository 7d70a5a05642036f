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

use nua::ast::{AccessKind, BinaryOp, ExprKind, StmtKind};
use nua::{lex, parse, Expr, ParseError, Stmt};
use pretty_assertions::assert_eq;

fn program(source: &str) -> Stmt {
    let tokens = lex(source).unwrap_or_else(|e| panic!("failed to lex {source:?}: {e}"));
    parse(&tokens).unwrap_or_else(|e| panic!("failed to parse {source:?}: {e}"))
}

fn parse_error(source: &str) -> ParseError {
    parse(&lex(source).unwrap()).unwrap_err()
}

fn only_expression(program: &Stmt) -> &Expr {
    match program.statements() {
        [Stmt {
            kind: StmtKind::Expression(expr),
            ..
        }] => expr,
        other => panic!("expected one expression statement, got {other:?}"),
    }
}

fn chain_ops(expr: &Expr) -> Vec<BinaryOp> {
    match &expr.kind {
        ExprKind::Binary { tails, .. } => tails.iter().map(|t| t.op).collect(),
        other => panic!("expected an operator chain, got {other:?}"),
    }
}

#[test]
fn power_shares_the_multiplicative_chain() {
    let tree = program("2 * 3 ** 2");
    assert_eq!(chain_ops(only_expression(&tree)), vec![BinaryOp::Mul, BinaryOp::Pow]);

    let tree = program("2 ** 3 ** 2");
    assert_eq!(chain_ops(only_expression(&tree)), vec![BinaryOp::Pow, BinaryOp::Pow]);
}

#[test]
fn tighter_levels_nest_inside_looser_ones() {
    let tree = program("1 + 2 * 3");
    let expr = only_expression(&tree);
    assert_eq!(chain_ops(expr), vec![BinaryOp::Add]);

    let ExprKind::Binary { tails, .. } = &expr.kind else {
        unreachable!()
    };
    assert_eq!(chain_ops(&tails[0].right), vec![BinaryOp::Mul]);
}

#[test]
fn access_chain_keeps_suffix_order() {
    let tree = program("a.b[0](1, 2).c");
    let ExprKind::Access { base, tails } = &only_expression(&tree).kind else {
        panic!("expected an access chain");
    };

    assert!(matches!(base.kind, ExprKind::Variable(ref name) if name == "a"));
    let shape: Vec<&str> = tails
        .iter()
        .map(|tail| match &tail.kind {
            AccessKind::Member(_) => "member",
            AccessKind::Index(_) => "index",
            AccessKind::Invoke(_) => "invoke",
        })
        .collect();
    assert_eq!(shape, vec!["member", "index", "invoke", "member"]);
}

#[test]
fn function_declaration_is_assignment_sugar() {
    let tree = program("fn add(a, b) { return a + b }");
    let ExprKind::Assign { value, .. } = &only_expression(&tree).kind else {
        panic!("expected an assignment");
    };
    let ExprKind::Function(literal) = &value.kind else {
        panic!("expected a function literal");
    };

    assert_eq!(literal.name.as_deref(), Some("add"));
    assert_eq!(literal.params.to_vec(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn trailing_commas_are_accepted() {
    program("[1, 2, 3,]");
    program("{a: 1, b: 2,}");
    program("f(1, 2,)");
}

#[test]
fn input_ending_mid_construct_is_recoverable() {
    for source in [
        "if true {",
        "while x {",
        "x = 1 +",
        "f(1, 2",
        "[1, 2",
        "{a: 1",
        "{a",
        "for i in",
        "global",
        "t.",
        "fn f(a, b) {",
    ] {
        assert!(parse_error(source).is_recoverable(), "{source:?} should be recoverable");
    }
}

#[test]
fn wrong_tokens_are_fatal() {
    for source in [
        "x = )",
        "if true 1",
        "[1 2]",
        "{a 1}",
        "for 1 in x {}",
        "for i at x {}",
        "1 = 2",
        "f()++",
        "break",
        "import thing",
        ")",
    ] {
        let err = parse_error(source);
        assert!(!err.is_recoverable(), "{source:?} should be fatal");
        assert!(err.span.is_some(), "{source:?} should point at a token");
    }
}

#[test]
fn fatal_message_names_the_found_token() {
    let err = parse_error("[1 2]");
    assert_eq!(err.message.as_deref(), Some("expected ',' or ']' in the list, found number 2"));
}

#[test]
fn loops_inside_functions_allow_break() {
    program("fn f() { while true { break } }");
    program("for i of 3 { if i == 1 { continue } }");
}

#[test]
fn thousands_of_nested_groups_parse() {
    let depth = 5_000;
    let tree = program(&format!("{}x{}", "(".repeat(depth), ")".repeat(depth)));
    assert!(matches!(only_expression(&tree).kind, ExprKind::Variable(ref name) if name == "x"));

    let source = format!("{}1", "(".repeat(depth));
    assert!(parse_error(&source).is_recoverable());

    let source = format!("{}1]", "(".repeat(depth));
    assert!(!parse_error(&source).is_recoverable());
}

#[test]
fn long_unary_chains_parse() {
    let tree = program(&format!("{}true", "not ".repeat(3_000)));
    assert!(matches!(only_expression(&tree).kind, ExprKind::Not(_)));
}

#[test]
fn return_is_allowed_at_top_level() {
    let tree = program("return 5");
    assert!(matches!(tree.statements()[0].kind, StmtKind::Return(Some(_))));
}
