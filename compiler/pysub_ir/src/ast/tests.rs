use pretty_assertions::assert_eq;

use super::*;
use crate::{Span, Spanned};

fn name(text: &str, start: u32) -> Expr {
    let end = start + u32::try_from(text.len()).unwrap_or(0);
    Expr::literal(
        LiteralValue::Identifier(text.to_string()),
        text,
        Span::new(start, end),
    )
}

#[test]
fn test_binary_span_merges_operands() {
    let expr = Expr::binary(BinaryOp::Sub, name("a", 0), name("b", 4));
    assert_eq!(expr.span(), Span::new(0, 5));
}

#[test]
fn test_display_is_fully_parenthesized() {
    let inner = Expr::binary(BinaryOp::Sub, name("a", 0), name("b", 4));
    let outer = Expr::binary(BinaryOp::Sub, inner, name("c", 8));
    assert_eq!(outer.to_string(), "((a - b) - c)");

    let negated = Expr::unary(UnaryOp::Not, name("x", 4), Span::new(0, 5));
    assert_eq!(negated.to_string(), "(!x)");

    let both = Expr::logical(LogicalOp::Or, name("p", 0), name("q", 5));
    assert_eq!(both.to_string(), "(p || q)");
}

#[test]
fn test_deep_chain_drops_without_recursion() {
    let mut expr = name("a", 0);
    for _ in 0..200_000 {
        expr = Expr::binary(BinaryOp::Add, expr, name("a", 0));
    }
    let negated = Expr::unary(UnaryOp::Minus, expr, Span::new(0, 1));
    let mixed = Expr::logical(LogicalOp::And, negated, name("b", 2));
    assert_eq!(mixed.span(), Span::new(0, 3));
    drop(mixed);
}

#[test]
fn test_statement_display() {
    let one = Expr::literal(LiteralValue::Int(1), "1", Span::new(5, 6));
    let stmt = Stmt::assignment(AssignOp::AddAssign, name("x", 0), one, Span::new(0, 6));
    assert_eq!(stmt.to_string(), "x += 1");

    let program = Program::new(vec![stmt.clone(), Stmt::expression(name("y", 7), Span::new(7, 8))]);
    assert_eq!(program.to_string(), "x += 1\ny");
    assert_eq!(program.len(), 2);
    assert_eq!(program.source_type, SourceType::Script);
}

#[test]
fn test_operator_symbols() {
    assert_eq!(UnaryOp::Not.to_string(), "!");
    assert_eq!(LogicalOp::And.to_string(), "&&");
    assert_eq!(BinaryOp::In.to_string(), "in");
    assert_eq!(AssignOp::DivAssign.to_string(), "/=");
    assert!(BinaryOp::NotEq.is_comparison());
    assert!(!BinaryOp::BitOr.is_comparison());
    assert_eq!(AssignOp::MulAssign.binary_op(), Some(BinaryOp::Mul));
    assert_eq!(AssignOp::Assign.binary_op(), None);
}

#[test]
fn test_as_literal() {
    let lit = Expr::literal(LiteralValue::Bool(true), "True", Span::new(0, 4));
    assert_eq!(lit.as_literal(), Some(&LiteralValue::Bool(true)));
    let neg = Expr::unary(UnaryOp::Minus, lit, Span::new(0, 5));
    assert_eq!(neg.as_literal(), None);
}

#[cfg(feature = "serde")]
#[test]
fn test_estree_json_shape() {
    let one = Expr::literal(LiteralValue::Int(1), "1", Span::new(4, 5));
    let sum = Expr::binary(BinaryOp::Add, name("a", 0), one);
    let program = Program::new(vec![Stmt::expression(sum, Span::new(0, 5))]);

    assert_eq!(
        serde_json::to_value(&program).ok(),
        Some(serde_json::json!({
            "type": "Program",
            "sourceType": "script",
            "body": [{
                "type": "ExpressionStatement",
                "start": 0,
                "end": 5,
                "expression": {
                    "type": "BinaryExpression",
                    "operator": "+",
                    "start": 0,
                    "end": 5,
                    "left": {"type": "Literal", "value": "a", "raw": "a", "start": 0, "end": 1},
                    "right": {"type": "Literal", "value": 1, "raw": "1", "start": 4, "end": 5},
                },
            }],
        }))
    );
}
