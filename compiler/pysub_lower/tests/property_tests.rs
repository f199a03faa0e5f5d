//! Property-based tests for lowering.
//!
//! Operator chains of any length fold to the left, and programs of any
//! number of statements keep every statement in source order.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

mod common;

use common::{line, prebuilt, unlimited_queue};
use proptest::prelude::*;
use pysub_ir::cst::build::{assign, chain, file_with, ident, int, newline};
use pysub_ir::cst::{Child, ConcreteNode, NodeKind};
use pysub_ir::Spanned;
use pysub_lower::{parse, EntryPoint};

// -- Strategies --

fn arb_operand() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,6}".prop_map(|s| s),
        (0u32..10_000).prop_map(|n| n.to_string()),
    ]
}

fn operand_node(text: &str) -> ConcreteNode {
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        int(text)
    } else {
        ident(text)
    }
}

type Chain = (String, Vec<(&'static str, String)>);

fn arb_chain(operators: &'static [&'static str]) -> impl Strategy<Value = Chain> {
    let operator = prop::sample::select(operators);
    (
        arb_operand(),
        prop::collection::vec((operator, arb_operand()), 0..24),
    )
}

fn left_fold(first: &str, rest: &[(&str, String)]) -> String {
    rest.iter()
        .fold(first.to_string(), |acc, (op, operand)| format!("({acc} {op} {operand})"))
}

/// Lower `first op operand ...` as a one-line program and render it.
fn lower_chain(kind: NodeKind, first: &str, rest: &[(&'static str, String)]) -> String {
    let node = chain(
        kind,
        operand_node(first),
        rest.iter().map(|(op, operand)| (*op, operand_node(operand))),
    );
    let root = file_with(vec![Child::Node(line(node))]);
    let (source, parser) = prebuilt(EntryPoint::FileInput, root);
    let mut queue = unlimited_queue();
    let program = parse(&source, &parser, &mut queue).unwrap();
    let stmt = &program.body[0];
    // The statement covers its whole line.
    assert_eq!(stmt.span().to_range(), 0..source.len() - 1);
    program.to_string()
}

/// One statement line, preceded by some blank lines.
fn arb_statement() -> impl Strategy<Value = (usize, String, Option<u32>)> {
    (0usize..3, "[a-z]{1,4}", prop::option::of(0u32..100))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// `a - b + c ...` lowers to `((a - b) + c) ...`.
    #[test]
    fn additive_chains_fold_left((first, rest) in arb_chain(&["+", "-"])) {
        let lowered = lower_chain(NodeKind::ArithExpr, &first, &rest);
        prop_assert_eq!(lowered, left_fold(&first, &rest));
    }

    #[test]
    fn multiplicative_chains_fold_left((first, rest) in arb_chain(&["*", "/"])) {
        let lowered = lower_chain(NodeKind::Term, &first, &rest);
        prop_assert_eq!(lowered, left_fold(&first, &rest));
    }

    #[test]
    fn logical_chains_fold_left((first, rest) in arb_chain(&["and"])) {
        let lowered = lower_chain(NodeKind::AndTest, &first, &rest);
        let expected = rest
            .iter()
            .fold(first.clone(), |acc, (_, operand)| format!("({acc} && {operand})"));
        prop_assert_eq!(lowered, expected);
    }

    /// Any number of statement lines with blank lines between them gives one
    /// statement per line, in order.
    #[test]
    fn program_keeps_statement_order(statements in prop::collection::vec(arb_statement(), 1..12)) {
        let mut children = Vec::new();
        let mut expected = Vec::new();
        for (blank_lines, name, value) in &statements {
            children.extend((0..*blank_lines).map(|_| Child::Token(newline())));
            let body = match value {
                Some(value) => {
                    expected.push(format!("{name} = {value}"));
                    assign(ident(name), int(&value.to_string()))
                }
                None => {
                    expected.push(name.clone());
                    ident(name)
                }
            };
            children.push(Child::Node(line(body)));
        }

        let (source, parser) = prebuilt(EntryPoint::FileInput, file_with(children));
        let mut queue = unlimited_queue();
        let program = parse(&source, &parser, &mut queue).unwrap();
        prop_assert_eq!(program.len(), statements.len());
        prop_assert_eq!(program.to_string(), expected.join("\n"));
        prop_assert!(queue.is_empty());
    }
}
