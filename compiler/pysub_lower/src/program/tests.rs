use pretty_assertions::assert_eq;
use pysub_ir::cst::build::{
    assign, chain, compound, eval_input, expr_stmt, file, file_with, ident, int, keyword, lambda,
    layout, newline, node, op, pass_stmt, simple_stmt, single_input, statement, testlist,
};
use pysub_ir::cst::{Child, ConcreteNode, NodeKind};
use pysub_ir::Span;

use super::*;
use crate::error::LowerError;

fn lower_file(root: ConcreteNode) -> LowerResult<Program> {
    lower_file_input(&layout(root).root)
}

fn rejected<T: std::fmt::Debug>(result: LowerResult<T>) -> (Construct, Span) {
    match result {
        Err(LowerError::Unsupported(err)) => (err.construct, err.span),
        other => panic!("expected an unsupported construct, got {other:?}"),
    }
}

fn sum(left: &str, right: &str) -> ConcreteNode {
    chain(NodeKind::ArithExpr, ident(left), vec![("+", int(right))])
}

// -- file_input --

#[test]
fn test_empty_file() {
    let program = lower_file(file(Vec::new())).unwrap();
    assert!(program.is_empty());
}

#[test]
fn test_statements_in_source_order() {
    let program = lower_file(file(vec![
        statement(assign(ident("x"), int("1"))),
        statement(sum("x", "2")),
        statement(ident("x")),
    ]))
    .unwrap();
    assert_eq!(program.len(), 3);
    assert_eq!(program.to_string(), "x = 1\n(x + 2)\nx");
}

#[test]
fn test_blank_lines_contribute_nothing() {
    let root = file_with(vec![
        Child::Token(newline()),
        Child::Node(statement(ident("a"))),
        Child::Token(newline()),
        Child::Token(newline()),
        Child::Node(statement(ident("b"))),
    ]);
    let fixture = layout(root);
    assert_eq!(fixture.source, "\na\n\n\nb\n");

    let program = lower_file_input(&fixture.root).unwrap();
    assert_eq!(program.to_string(), "a\nb");
    assert_eq!(program.body[1].span(), Span::new(5, 6));
}

#[test]
fn test_compound_statements_rejected() {
    let cases = [
        (NodeKind::IfStmt, "if", Construct::IfStatements),
        (NodeKind::WhileStmt, "while", Construct::WhileLoops),
        (NodeKind::ForStmt, "for", Construct::ForLoops),
        (NodeKind::TryStmt, "try", Construct::TryStatements),
        (NodeKind::WithStmt, "with", Construct::WithStatements),
        (NodeKind::Funcdef, "def", Construct::FunctionDefinitions),
        (NodeKind::Classdef, "class", Construct::ClassDefinitions),
        (NodeKind::Decorated, "@", Construct::DecoratedDefinitions),
        (NodeKind::AsyncStmt, "async", Construct::AsyncStatements),
    ];
    for (kind, keyword_text, expected) in cases {
        let (construct, span) = rejected(lower_file(file(vec![compound(kind, keyword_text)])));
        assert_eq!(construct, expected);
        assert_eq!(span.start, 0, "{expected} should point at the statement");
    }
}

#[test]
fn test_compound_rule_directly_under_stmt() {
    let body = node(NodeKind::WhileStmt, vec![Child::Token(keyword("while"))]);
    let stmt = node(NodeKind::Stmt, vec![Child::Node(body)]);
    assert_eq!(
        rejected(lower_file(file(vec![stmt]))).0,
        Construct::WhileLoops
    );
}

#[test]
fn test_first_failure_aborts() {
    let result = lower_file(file(vec![
        statement(ident("a")),
        statement(lambda(int("1"))),
        statement(pass_stmt()),
    ]));
    let (construct, span) = rejected(result);
    assert_eq!(construct, Construct::LambdaExpressions);
    // "a\nlambda : 1\n"
    assert_eq!(span, Span::new(2, 12));
}

#[test]
fn test_stray_top_level_token() {
    let result = lower_file(file_with(vec![Child::Token(op(")"))]));
    match result {
        Err(LowerError::Parse(failure)) => {
            assert_eq!(failure.message, "unexpected token `)` at top level");
            assert_eq!(failure.span, Span::new(0, 1));
        }
        other => panic!("expected a parse failure, got {other:?}"),
    }
}

#[test]
fn test_wrong_root_is_mismatch() {
    let result = lower_file(statement(ident("a")));
    assert!(matches!(result, Err(LowerError::Parse(_))), "{result:?}");
}

// -- single_input --

#[test]
fn test_single_input_newline_is_empty() {
    let fixture = layout(single_input(None));
    assert!(lower_single_input(&fixture.root).unwrap().is_empty());
}

#[test]
fn test_single_input_simple_statement() {
    let line = simple_stmt(vec![assign(ident("x"), int("1"))], false);
    let fixture = layout(single_input(Some(line)));
    let program = lower_single_input(&fixture.root).unwrap();
    assert_eq!(program.to_string(), "x = 1");
}

#[test]
fn test_single_input_compound_rejected() {
    let rule = node(NodeKind::ForStmt, vec![Child::Token(keyword("for"))]);
    let compound_stmt = node(NodeKind::CompoundStmt, vec![Child::Node(rule)]);
    let fixture = layout(single_input(Some(compound_stmt)));
    assert_eq!(
        rejected(lower_single_input(&fixture.root)).0,
        Construct::ForLoops
    );
}

#[test]
fn test_single_input_multiple_statements_rejected() {
    let line = simple_stmt(vec![expr_stmt(ident("a")), expr_stmt(ident("b"))], false);
    let fixture = layout(single_input(Some(line)));
    assert_eq!(
        rejected(lower_single_input(&fixture.root)).0,
        Construct::MultipleStatementsPerLine
    );
}

// -- eval_input --

#[test]
fn test_eval_input_expression() {
    let fixture = layout(eval_input(sum("a", "1")));
    let expr = lower_eval_input(&fixture.root).unwrap();
    assert_eq!(expr.to_string(), "(a + 1)");
    assert_eq!(expr.span(), Span::new(0, 5));
}

#[test]
fn test_eval_input_tuple_rejected() {
    let fixture = layout(eval_input(testlist(vec![int("1"), int("2")], false)));
    assert_eq!(
        rejected(lower_eval_input(&fixture.root)).0,
        Construct::TupleExpressions
    );
}

#[test]
fn test_eval_input_trailing_token() {
    let root = node(
        NodeKind::EvalInput,
        vec![
            Child::Node(testlist(vec![ident("a")], false)),
            Child::Token(op(")")),
        ],
    );
    let result = lower_eval_input(&layout(root).root);
    assert!(
        matches!(result, Err(LowerError::Parse(ref failure)) if failure.message.contains("after expression")),
        "{result:?}"
    );
}
