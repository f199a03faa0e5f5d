//! Statement lowering.
//!
//! A `simple_stmt` line holds exactly one small statement, and the only
//! small statement kept is `expr_stmt` in one of three shapes:
//!
//! ```text
//! value                 -> ExpressionStatement
//! target = value        -> AssignmentStatement "="
//! target op= value      -> AssignmentStatement "+=" | "-=" | "*=" | "/="
//! ```

use pysub_ir::ast::{AssignOp, Expr, Stmt};
use pysub_ir::cst::{Child, ConcreteNode, NodeKind, TokenKind};
use pysub_ir::Spanned;
use tracing::trace;

use crate::error::{mismatch, unsupported, LowerResult};
use crate::expr::{lower_expression, lower_testlist};
use crate::policy::Construct;

/// Lower one `simple_stmt` line into one statement.
///
/// `small_stmt (';' small_stmt)* [';'] NEWLINE`: a trailing `;` is
/// tolerated, a second statement is not.
pub fn lower_simple_stmt(node: &ConcreteNode) -> LowerResult<Stmt> {
    if node.kind() != NodeKind::SimpleStmt {
        return mismatch(node, "`simple_stmt`");
    }

    let mut small = None;
    for child in node.children() {
        match child {
            Child::Node(stmt) if stmt.kind() == NodeKind::SmallStmt => {
                if small.is_some() {
                    return unsupported(Construct::MultipleStatementsPerLine, stmt.span());
                }
                small = Some(stmt);
            }
            Child::Token(token)
                if token.is(TokenKind::Operator, ";") || token.kind == TokenKind::Newline => {}
            _ => return mismatch(node, "`small_stmt` separated by `;`"),
        }
    }

    match small {
        Some(stmt) => lower_small_stmt(stmt),
        None => mismatch(node, "a `small_stmt`"),
    }
}

fn lower_small_stmt(node: &ConcreteNode) -> LowerResult<Stmt> {
    let [Child::Node(body)] = node.children() else {
        return mismatch(node, "a single statement body");
    };

    match body.kind() {
        NodeKind::ExprStmt => lower_expr_stmt(body),
        NodeKind::FlowStmt => {
            let inner = body.child_nodes().next();
            match inner.and_then(|n| Construct::for_small_statement_rule(n.kind())) {
                Some(construct) => unsupported(construct, body.span()),
                None => mismatch(body, "a flow statement"),
            }
        }
        NodeKind::DelStmt | NodeKind::PassStmt | NodeKind::BreakStmt | NodeKind::ContinueStmt
        | NodeKind::ReturnStmt | NodeKind::RaiseStmt | NodeKind::YieldStmt
        | NodeKind::ImportStmt | NodeKind::GlobalStmt | NodeKind::NonlocalStmt
        | NodeKind::AssertStmt => reject_small_stmt(body),
        NodeKind::FileInput | NodeKind::SingleInput | NodeKind::EvalInput | NodeKind::Stmt
        | NodeKind::SimpleStmt | NodeKind::SmallStmt | NodeKind::Annassign
        | NodeKind::Augassign | NodeKind::CompoundStmt | NodeKind::IfStmt | NodeKind::WhileStmt
        | NodeKind::ForStmt | NodeKind::TryStmt | NodeKind::WithStmt | NodeKind::Funcdef
        | NodeKind::Classdef | NodeKind::Decorated | NodeKind::AsyncStmt
        | NodeKind::TestlistStarExpr | NodeKind::Testlist | NodeKind::Test
        | NodeKind::TestNocond | NodeKind::Lambdef | NodeKind::LambdefNocond | NodeKind::OrTest
        | NodeKind::AndTest | NodeKind::NotTest | NodeKind::Comparison | NodeKind::CompOp
        | NodeKind::StarExpr | NodeKind::Expr | NodeKind::XorExpr | NodeKind::AndExpr
        | NodeKind::ShiftExpr | NodeKind::ArithExpr | NodeKind::Term | NodeKind::Factor
        | NodeKind::Power | NodeKind::AtomExpr | NodeKind::Atom | NodeKind::Trailer
        | NodeKind::TestlistComp | NodeKind::YieldExpr | NodeKind::YieldArg => {
            mismatch(body, "a small statement")
        }
    }
}

fn reject_small_stmt<T>(node: &ConcreteNode) -> LowerResult<T> {
    match Construct::for_small_statement_rule(node.kind()) {
        Some(construct) => unsupported(construct, node.span()),
        None => mismatch(node, "a small statement"),
    }
}

/// One operand or operator of an `expr_stmt`, in source order.
enum Part<'a> {
    Operand(&'a ConcreteNode),
    Assign,
    Augmented(&'a ConcreteNode),
    Annotation,
}

fn classify(child: &Child) -> Option<Part<'_>> {
    match child {
        Child::Token(token) if token.is(TokenKind::Operator, "=") => Some(Part::Assign),
        Child::Token(_) => None,
        Child::Node(node) => match node.kind() {
            NodeKind::TestlistStarExpr | NodeKind::Testlist | NodeKind::YieldExpr => {
                Some(Part::Operand(node))
            }
            NodeKind::Augassign => Some(Part::Augmented(node)),
            NodeKind::Annassign => Some(Part::Annotation),
            _ => None,
        },
    }
}

fn lower_expr_stmt(node: &ConcreteNode) -> LowerResult<Stmt> {
    let mut parts = Vec::with_capacity(node.children().len());
    for child in node.children() {
        match classify(child) {
            Some(Part::Annotation) => {
                return unsupported(Construct::AnnotatedAssignments, node.span())
            }
            Some(part) => parts.push(part),
            None => return mismatch(node, "operands separated by an assignment operator"),
        }
    }

    let span = node.span();
    match parts.as_slice() {
        [Part::Operand(value)] => {
            trace!("lower_expr_stmt -> Expression");
            Ok(Stmt::expression(lower_value(value)?, span))
        }
        [Part::Operand(target), Part::Assign, Part::Operand(value)] => {
            trace!("lower_expr_stmt -> Assignment");
            let left = lower_target(target)?;
            let right = lower_value(value)?;
            Ok(Stmt::assignment(AssignOp::Assign, left, right, span))
        }
        [Part::Operand(target), Part::Augmented(op), Part::Operand(value)] => {
            let left = lower_target(target)?;
            let operator = augmented_operator(op)?;
            if value.kind() == NodeKind::YieldExpr {
                return unsupported(Construct::AugmentedYieldAssignment, value.span());
            }
            trace!(operator = %operator, "lower_expr_stmt -> Assignment");
            Ok(Stmt::assignment(operator, left, lower_value(value)?, span))
        }
        [Part::Operand(_), Part::Assign, Part::Operand(_), Part::Assign, ..] => {
            unsupported(Construct::ChainedAssignments, span)
        }
        _ => mismatch(node, "operands separated by an assignment operator"),
    }
}

/// `augassign`: only the four arithmetic forms the evaluator knows.
fn augmented_operator(node: &ConcreteNode) -> LowerResult<AssignOp> {
    let Some(token) = node.tokens().next() else {
        return mismatch(node, "an augmented assignment operator");
    };
    match token.text.as_str() {
        "+=" => Ok(AssignOp::AddAssign),
        "-=" => Ok(AssignOp::SubAssign),
        "*=" => Ok(AssignOp::MulAssign),
        "/=" => Ok(AssignOp::DivAssign),
        other => unsupported(Construct::Operator(other.to_string()), token.span),
    }
}

/// Assignment target: a single, non-starred operand.
fn lower_target(node: &ConcreteNode) -> LowerResult<Expr> {
    if matches!(node.kind(), NodeKind::TestlistStarExpr | NodeKind::Testlist) {
        match node.children() {
            [Child::Node(item)] if item.kind() == NodeKind::StarExpr => {
                return unsupported(Construct::StarredAssignmentTargets, item.span());
            }
            [_] => {}
            [] => return mismatch(node, "an assignment target"),
            _ => return unsupported(Construct::MultipleAssignmentTargets, node.span()),
        }
    }
    lower_expression(node)
}

/// Right-hand side or expression statement value.
fn lower_value(node: &ConcreteNode) -> LowerResult<Expr> {
    match node.kind() {
        NodeKind::YieldExpr => unsupported(Construct::YieldExpressions, node.span()),
        NodeKind::TestlistStarExpr | NodeKind::Testlist => lower_testlist(node),
        _ => mismatch(node, "`testlist_star_expr`, `testlist` or `yield_expr`"),
    }
}
