//! ESTree-shaped JSON output of lowered programs.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

mod common;

use common::{line, prebuilt, unlimited_queue};
use pretty_assertions::assert_eq;
use pysub_ir::cst::build::{aug_assign, chain, factor, file, ident, int, not, str_lit};
use pysub_ir::cst::NodeKind;
use pysub_lower::{parse, EntryPoint};
use serde_json::json;

#[test]
fn test_program_serializes_as_estree() {
    // "x += - 1\nnot x or 'a'\n"
    let negative = factor("-", int("1"));
    let either = chain(NodeKind::OrTest, not(ident("x")), vec![("or", str_lit("'a'"))]);
    let (source, parser) = prebuilt(
        EntryPoint::FileInput,
        file(vec![
            line(aug_assign(ident("x"), "+=", negative)),
            line(either),
        ]),
    );
    assert_eq!(source, "x += - 1\nnot x or 'a'\n");

    let mut queue = unlimited_queue();
    let program = parse(&source, &parser, &mut queue).unwrap();

    assert_eq!(
        serde_json::to_value(&program).unwrap(),
        json!({
            "type": "Program",
            "sourceType": "script",
            "body": [
                {
                    "type": "AssignmentStatement",
                    "operator": "+=",
                    "start": 0,
                    "end": 8,
                    "left": {"type": "Literal", "value": "x", "raw": "x", "start": 0, "end": 1},
                    "right": {
                        "type": "UnaryExpression",
                        "operator": "-",
                        "start": 5,
                        "end": 8,
                        "argument": {"type": "Literal", "value": 1, "raw": "1", "start": 7, "end": 8},
                    },
                },
                {
                    "type": "ExpressionStatement",
                    "start": 9,
                    "end": 21,
                    "expression": {
                        "type": "LogicalExpression",
                        "operator": "||",
                        "start": 9,
                        "end": 21,
                        "left": {
                            "type": "UnaryExpression",
                            "operator": "!",
                            "start": 9,
                            "end": 14,
                            "argument": {"type": "Literal", "value": "x", "raw": "x", "start": 13, "end": 14},
                        },
                        "right": {"type": "Literal", "value": "'a'", "raw": "'a'", "start": 18, "end": 21},
                    },
                },
            ],
        })
    );
}
