//! Expression lowering.
//!
//! One function per precedence level, loosest binding first:
//!
//! | Rule | Operators kept | Lowered to |
//! |------|----------------|------------|
//! | `test` | (none) | conditional and lambda rejected |
//! | `or_test` | `or` | `LogicalExpression` `\|\|` |
//! | `and_test` | `and` | `LogicalExpression` `&&` |
//! | `not_test` | `not` | `UnaryExpression` `!` |
//! | `comparison` | `> < >= <= != in` | `BinaryExpression` |
//! | `expr` | `\|` | `BinaryExpression` |
//! | `xor_expr`, `and_expr`, `shift_expr` | (none) | operand only |
//! | `arith_expr` | `+ -` | `BinaryExpression` |
//! | `term` | `* /` | `BinaryExpression` |
//! | `factor` | unary `+ -` | `UnaryExpression` |
//! | `power`, `atom_expr` | (none) | operand only |
//! | `atom` | literals, names | `Literal` |
//!
//! Chain rules hold their operands flat (`a - b - c` is one `arith_expr`
//! with five children) and fold left to right, so every operator is
//! left-associative: `((a - b) - c)`.

use pysub_ir::ast::{BinaryOp, Expr, LiteralValue, LogicalOp, UnaryOp};
use pysub_ir::cst::{Child, ConcreteNode, NodeKind, TokenKind};
use pysub_ir::{Span, Spanned};
use pysub_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::error::{mismatch, unsupported, LowerResult};
use crate::policy::Construct;

/// Lower any expression-level node.
///
/// Dispatches on the node's rule, so callers may start at whatever level
/// their grammar position holds.
pub fn lower_expression(node: &ConcreteNode) -> LowerResult<Expr> {
    match node.kind() {
        NodeKind::TestlistStarExpr | NodeKind::Testlist => lower_testlist(node),
        NodeKind::Test | NodeKind::TestNocond => lower_test(node),
        NodeKind::Lambdef | NodeKind::LambdefNocond => {
            unsupported(Construct::LambdaExpressions, node.span())
        }
        NodeKind::OrTest => lower_or_test(node),
        NodeKind::AndTest => lower_and_test(node),
        NodeKind::NotTest => lower_not_test(node),
        NodeKind::Comparison => lower_comparison(node),
        NodeKind::StarExpr => unsupported(Construct::StarredExpressions, node.span()),
        NodeKind::Expr => lower_bit_or(node),
        NodeKind::XorExpr => lower_bit_xor(node),
        NodeKind::AndExpr => lower_bit_and(node),
        NodeKind::ShiftExpr => lower_shift(node),
        NodeKind::ArithExpr => lower_arith(node),
        NodeKind::Term => lower_term(node),
        NodeKind::Factor => lower_factor(node),
        NodeKind::Power => lower_power(node),
        NodeKind::AtomExpr => lower_atom_expr(node),
        NodeKind::Atom => lower_atom(node),
        NodeKind::YieldExpr => unsupported(Construct::YieldExpressions, node.span()),
        NodeKind::FileInput | NodeKind::SingleInput | NodeKind::EvalInput | NodeKind::Stmt
        | NodeKind::SimpleStmt | NodeKind::SmallStmt | NodeKind::ExprStmt | NodeKind::Annassign
        | NodeKind::Augassign | NodeKind::DelStmt | NodeKind::PassStmt | NodeKind::BreakStmt
        | NodeKind::ContinueStmt | NodeKind::ReturnStmt | NodeKind::RaiseStmt
        | NodeKind::YieldStmt | NodeKind::ImportStmt | NodeKind::GlobalStmt
        | NodeKind::NonlocalStmt | NodeKind::AssertStmt | NodeKind::FlowStmt
        | NodeKind::CompoundStmt | NodeKind::IfStmt | NodeKind::WhileStmt | NodeKind::ForStmt
        | NodeKind::TryStmt | NodeKind::WithStmt | NodeKind::Funcdef | NodeKind::Classdef
        | NodeKind::Decorated | NodeKind::AsyncStmt | NodeKind::CompOp | NodeKind::Trailer
        | NodeKind::TestlistComp | NodeKind::YieldArg => {
            mismatch(node, "an expression")
        }
    }
}

/// `testlist` / `testlist_star_expr`: exactly one element, no commas.
pub fn lower_testlist(node: &ConcreteNode) -> LowerResult<Expr> {
    match node.children() {
        [Child::Node(item)] => match item.kind() {
            NodeKind::Test => lower_test(item),
            NodeKind::StarExpr => unsupported(Construct::StarredExpressions, item.span()),
            _ => mismatch(item, "`test` or `star_expr`"),
        },
        [] => mismatch(node, "at least one element"),
        _ => unsupported(Construct::TupleExpressions, node.span()),
    }
}

/// `test`: a plain `or_test`; conditionals and lambdas are rejected.
pub fn lower_test(node: &ConcreteNode) -> LowerResult<Expr> {
    ensure_sufficient_stack(|| match node.children() {
        [Child::Node(inner)] => match inner.kind() {
            NodeKind::OrTest => lower_or_test(inner),
            NodeKind::Lambdef | NodeKind::LambdefNocond => {
                unsupported(Construct::LambdaExpressions, inner.span())
            }
            _ => mismatch(inner, "`or_test` or `lambdef`"),
        },
        [Child::Node(body), _, ..] if body.kind() == NodeKind::OrTest => {
            unsupported(Construct::ConditionalExpressions, node.span())
        }
        _ => mismatch(node, "`or_test`"),
    })
}

fn lower_or_test(node: &ConcreteNode) -> LowerResult<Expr> {
    fold_chain(node, NodeKind::AndTest, lower_and_test, |op| match op {
        "or" => Some(Fold::Logical(LogicalOp::Or)),
        _ => None,
    })
}

fn lower_and_test(node: &ConcreteNode) -> LowerResult<Expr> {
    fold_chain(node, NodeKind::NotTest, lower_not_test, |op| match op {
        "and" => Some(Fold::Logical(LogicalOp::And)),
        _ => None,
    })
}

/// `not_test: 'not' not_test | comparison`.
fn lower_not_test(node: &ConcreteNode) -> LowerResult<Expr> {
    match node.children() {
        [Child::Token(not), Child::Node(operand)]
            if not.is(TokenKind::Keyword, "not") && operand.kind() == NodeKind::NotTest =>
        {
            trace!("lower_not_test -> Not");
            let argument = ensure_sufficient_stack(|| lower_not_test(operand))?;
            Ok(Expr::unary(UnaryOp::Not, argument, node.span()))
        }
        [Child::Node(comparison)] if comparison.kind() == NodeKind::Comparison => {
            lower_comparison(comparison)
        }
        _ => mismatch(node, "`not not_test` or `comparison`"),
    }
}

/// Comparisons take at most one operator; `a < b < c` is rejected rather
/// than desugared.
fn lower_comparison(node: &ConcreteNode) -> LowerResult<Expr> {
    if node.children().len() > 3 {
        return unsupported(Construct::ChainedComparisons, node.span());
    }
    fold_chain(node, NodeKind::Expr, lower_bit_or, |op| {
        let op = match op {
            ">" => BinaryOp::Gt,
            "<" => BinaryOp::Lt,
            ">=" => BinaryOp::GtEq,
            "<=" => BinaryOp::LtEq,
            "!=" => BinaryOp::NotEq,
            "in" => BinaryOp::In,
            _ => return None,
        };
        Some(Fold::Binary(op))
    })
}

/// `expr`: bitwise or.
fn lower_bit_or(node: &ConcreteNode) -> LowerResult<Expr> {
    fold_chain(node, NodeKind::XorExpr, lower_bit_xor, |op| {
        (op == "|").then_some(Fold::Binary(BinaryOp::BitOr))
    })
}

fn lower_bit_xor(node: &ConcreteNode) -> LowerResult<Expr> {
    fold_chain(node, NodeKind::AndExpr, lower_bit_and, |_| None)
}

fn lower_bit_and(node: &ConcreteNode) -> LowerResult<Expr> {
    fold_chain(node, NodeKind::ShiftExpr, lower_shift, |_| None)
}

fn lower_shift(node: &ConcreteNode) -> LowerResult<Expr> {
    fold_chain(node, NodeKind::ArithExpr, lower_arith, |_| None)
}

fn lower_arith(node: &ConcreteNode) -> LowerResult<Expr> {
    fold_chain(node, NodeKind::Term, lower_term, |op| match op {
        "+" => Some(Fold::Binary(BinaryOp::Add)),
        "-" => Some(Fold::Binary(BinaryOp::Sub)),
        _ => None,
    })
}

fn lower_term(node: &ConcreteNode) -> LowerResult<Expr> {
    fold_chain(node, NodeKind::Factor, lower_factor, |op| match op {
        "*" => Some(Fold::Binary(BinaryOp::Mul)),
        "/" => Some(Fold::Binary(BinaryOp::Div)),
        _ => None,
    })
}

/// `factor: ('+'|'-'|'~') factor | power`.
fn lower_factor(node: &ConcreteNode) -> LowerResult<Expr> {
    match node.children() {
        [Child::Token(op), Child::Node(operand)] if operand.kind() == NodeKind::Factor => {
            let operator = match op.text.as_str() {
                "+" => UnaryOp::Plus,
                "-" => UnaryOp::Minus,
                other => return unsupported(Construct::Operator(other.to_string()), op.span),
            };
            trace!(operator = %operator, "lower_factor -> Unary");
            let argument = ensure_sufficient_stack(|| lower_factor(operand))?;
            Ok(Expr::unary(operator, argument, node.span()))
        }
        [Child::Node(power)] if power.kind() == NodeKind::Power => lower_power(power),
        _ => mismatch(node, "a prefix operator or `power`"),
    }
}

/// `power: atom_expr ['**' factor]`.
fn lower_power(node: &ConcreteNode) -> LowerResult<Expr> {
    match node.children() {
        [Child::Node(base)] if base.kind() == NodeKind::AtomExpr => lower_atom_expr(base),
        [Child::Node(base), Child::Token(op), Child::Node(_)]
            if base.kind() == NodeKind::AtomExpr =>
        {
            unsupported(Construct::Operator(op.text.clone()), op.span)
        }
        _ => mismatch(node, "`atom_expr` or `atom_expr ** factor`"),
    }
}

/// `atom_expr: [AWAIT] atom trailer*`.
///
/// The outermost construct is reported first: `await` before trailers,
/// trailers before the atom itself.
fn lower_atom_expr(node: &ConcreteNode) -> LowerResult<Expr> {
    let children = node.children();
    if children
        .first()
        .is_some_and(|c| c.is_token(TokenKind::Keyword, "await"))
    {
        return unsupported(Construct::AwaitExpressions, node.span());
    }

    let [Child::Node(atom), trailers @ ..] = children else {
        return mismatch(node, "`atom` followed by trailers");
    };
    if atom.kind() != NodeKind::Atom {
        return mismatch(atom, "`atom`");
    }

    if let Some(first) = trailers.first() {
        let Some(trailer) = first.as_node().filter(|t| t.kind() == NodeKind::Trailer) else {
            return mismatch(node, "`trailer`");
        };
        let construct = match trailer.first_token().map(|t| t.text.as_str()) {
            Some("(") => Construct::FunctionCalls,
            Some("[") => Construct::Subscripts,
            Some(".") => Construct::AttributeAccess,
            _ => return mismatch(trailer, "`(`, `[` or `.`"),
        };
        return unsupported(construct, trailer.span());
    }

    lower_atom(atom)
}

/// `atom`: names, integers, booleans and single strings.
fn lower_atom(node: &ConcreteNode) -> LowerResult<Expr> {
    let span = node.span();
    let children = node.children();

    let Some(Child::Token(first)) = children.first() else {
        return mismatch(node, "a token");
    };

    if children.len() > 1 {
        let construct = match first.text.as_str() {
            "(" => Construct::ParenthesizedExpressions,
            "[" => Construct::ListDisplays,
            "{" => Construct::DictOrSetDisplays,
            _ if children
                .iter()
                .all(|c| c.as_token().is_some_and(|t| t.kind == TokenKind::String)) =>
            {
                Construct::ImplicitStringConcatenation
            }
            _ => return mismatch(node, "a single literal token"),
        };
        return unsupported(construct, span);
    }

    let raw = first.text.as_str();
    let value = match first.kind {
        TokenKind::Name => LiteralValue::Identifier(raw.to_string()),
        TokenKind::Number => LiteralValue::Int(parse_int(raw, span)?),
        TokenKind::String => LiteralValue::Str(raw.to_string()),
        TokenKind::Keyword => match raw {
            "True" => LiteralValue::Bool(true),
            "False" => LiteralValue::Bool(false),
            "None" => return unsupported(Construct::NoneLiteral, span),
            _ => return mismatch(node, "`True`, `False` or `None`"),
        },
        TokenKind::Operator if raw == "..." => return unsupported(Construct::Ellipsis, span),
        _ => return mismatch(node, "a literal"),
    };
    trace!(raw, "lower_atom -> Literal");
    Ok(Expr::literal(value, raw, span))
}

/// Parse an integer literal: decimal, `0x`, `0o` or `0b`, with `_`
/// separators. Floats and imaginary literals are rejected, as are values
/// that do not fit in an `i64`.
fn parse_int(text: &str, span: Span) -> LowerResult<i64> {
    use std::num::IntErrorKind;

    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let (radix, body) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ => (10, digits.as_str()),
    };

    if radix == 10 && !body.bytes().all(|b| b.is_ascii_digit()) {
        return unsupported(Construct::NonIntegerLiterals, span);
    }

    match i64::from_str_radix(body, radix) {
        Ok(value) => Ok(value),
        Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow) => {
            unsupported(Construct::IntegerOverflow, span)
        }
        Err(_) => Err(crate::error::ParseFailure::new(
            span,
            format!("malformed integer literal `{text}`"),
        )
        .into()),
    }
}

/// How a chain operator combines its operands.
#[derive(Copy, Clone, Debug)]
enum Fold {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

impl Fold {
    fn apply(self, left: Expr, right: Expr) -> Expr {
        match self {
            Fold::Binary(op) => Expr::binary(op, left, right),
            Fold::Logical(op) => Expr::logical(op, left, right),
        }
    }
}

/// Fold a flat operator chain `operand (op operand)*` left to right.
///
/// Each operand must be an `operand_kind` node and is lowered with
/// `lower_operand`. `resolve` maps operator text to how it combines; an
/// operator it does not know is rejected at the operator's span. Operators
/// are either single tokens or, in a comparison, a `comp_op` node whose
/// text is its tokens joined by a space (`not in`, `is not`).
fn fold_chain(
    node: &ConcreteNode,
    operand_kind: NodeKind,
    lower_operand: fn(&ConcreteNode) -> LowerResult<Expr>,
    resolve: fn(&str) -> Option<Fold>,
) -> LowerResult<Expr> {
    let children = node.children();
    if children.len() % 2 == 0 {
        return mismatch(node, "an odd-length operand/operator chain");
    }

    let operand = |child: &Child| -> LowerResult<Expr> {
        match child {
            Child::Node(inner) if inner.kind() == operand_kind => lower_operand(inner),
            Child::Node(inner) => mismatch(inner, operand_kind.rule_name()),
            Child::Token(_) => mismatch(node, operand_kind.rule_name()),
        }
    };

    let mut acc = operand(&children[0])?;
    for pair in children[1..].chunks_exact(2) {
        let (op_text, op_span) = match &pair[0] {
            Child::Token(token) => (token.text.clone(), token.span),
            Child::Node(comp_op) if comp_op.kind() == NodeKind::CompOp => {
                (comp_op.token_text(), comp_op.span())
            }
            Child::Node(other) => return mismatch(other, "an operator"),
        };
        let Some(fold) = resolve(&op_text) else {
            return unsupported(Construct::Operator(op_text), op_span);
        };
        let right = operand(&pair[1])?;
        trace!(kind = %node.kind(), operator = %op_text, "fold_chain");
        acc = fold.apply(acc, right);
    }
    Ok(acc)
}
