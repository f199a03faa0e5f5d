//! Entry-rule lowering: `file_input`, `single_input` and `eval_input`.

use pysub_ir::ast::{Expr, Program, Stmt};
use pysub_ir::cst::{Child, ConcreteNode, NodeKind, TokenKind};
use pysub_ir::Spanned;
use tracing::debug;

use crate::error::{mismatch, unsupported, LowerResult, ParseFailure};
use crate::expr::lower_testlist;
use crate::policy::Construct;
use crate::stmt::lower_simple_stmt;

/// Lower a whole module.
///
/// Statements keep source order; blank lines and the end marker contribute
/// nothing. The first failing statement aborts the whole program.
pub fn lower_file_input(root: &ConcreteNode) -> LowerResult<Program> {
    if root.kind() != NodeKind::FileInput {
        return mismatch(root, "`file_input`");
    }

    let mut body = Vec::new();
    for child in root.children() {
        match child {
            Child::Token(token) if token.is_structural() => {}
            Child::Token(token) => {
                return Err(ParseFailure::new(
                    token.span,
                    format!("unexpected token `{}` at top level", token.text),
                )
                .into())
            }
            Child::Node(stmt) => body.push(lower_stmt(stmt)?),
        }
    }

    debug!(statements = body.len(), "lowered file input");
    Ok(Program::new(body))
}

/// Lower one interactive input: nothing, a simple statement, or a compound
/// statement followed by a newline.
pub fn lower_single_input(root: &ConcreteNode) -> LowerResult<Program> {
    if root.kind() != NodeKind::SingleInput {
        return mismatch(root, "`single_input`");
    }

    let body = match root.children() {
        [Child::Token(token)] if token.kind == TokenKind::Newline => Vec::new(),
        [Child::Node(stmt)] if stmt.kind() == NodeKind::SimpleStmt => {
            vec![lower_simple_stmt(stmt)?]
        }
        [Child::Node(stmt), Child::Token(token)]
            if stmt.kind() == NodeKind::CompoundStmt && token.kind == TokenKind::Newline =>
        {
            return reject_compound(stmt);
        }
        _ => return mismatch(root, "a newline, `simple_stmt` or `compound_stmt`"),
    };

    debug!(statements = body.len(), "lowered single input");
    Ok(Program::new(body))
}

/// Lower a standalone expression: `testlist NEWLINE* ENDMARKER`.
pub fn lower_eval_input(root: &ConcreteNode) -> LowerResult<Expr> {
    let [Child::Node(list), rest @ ..] = root.children() else {
        return mismatch(root, "`testlist`");
    };
    if root.kind() != NodeKind::EvalInput || list.kind() != NodeKind::Testlist {
        return mismatch(root, "`eval_input` starting with a `testlist`");
    }

    for child in rest {
        match child {
            Child::Token(token) if token.is_structural() => {}
            Child::Token(token) => {
                return Err(ParseFailure::new(
                    token.span,
                    format!("unexpected token `{}` after expression", token.text),
                )
                .into())
            }
            Child::Node(node) => return mismatch(node, "end of input"),
        }
    }

    let expr = lower_testlist(list)?;
    debug!(span = %expr.span(), "lowered eval input");
    Ok(expr)
}

fn lower_stmt(node: &ConcreteNode) -> LowerResult<Stmt> {
    if node.kind() != NodeKind::Stmt {
        return mismatch(node, "`stmt`");
    }
    let [Child::Node(inner)] = node.children() else {
        return mismatch(node, "a simple or compound statement");
    };

    match inner.kind() {
        NodeKind::SimpleStmt => lower_simple_stmt(inner),
        NodeKind::CompoundStmt => reject_compound(inner),
        NodeKind::IfStmt | NodeKind::WhileStmt | NodeKind::ForStmt | NodeKind::TryStmt
        | NodeKind::WithStmt | NodeKind::Funcdef | NodeKind::Classdef | NodeKind::Decorated
        | NodeKind::AsyncStmt => reject_rule(inner),
        NodeKind::FileInput | NodeKind::SingleInput | NodeKind::EvalInput | NodeKind::Stmt
        | NodeKind::SmallStmt | NodeKind::ExprStmt | NodeKind::Annassign | NodeKind::Augassign
        | NodeKind::DelStmt | NodeKind::PassStmt | NodeKind::BreakStmt | NodeKind::ContinueStmt
        | NodeKind::ReturnStmt | NodeKind::RaiseStmt | NodeKind::YieldStmt
        | NodeKind::ImportStmt | NodeKind::GlobalStmt | NodeKind::NonlocalStmt
        | NodeKind::AssertStmt | NodeKind::FlowStmt | NodeKind::TestlistStarExpr
        | NodeKind::Testlist | NodeKind::Test | NodeKind::TestNocond | NodeKind::Lambdef
        | NodeKind::LambdefNocond | NodeKind::OrTest | NodeKind::AndTest | NodeKind::NotTest
        | NodeKind::Comparison | NodeKind::CompOp | NodeKind::StarExpr | NodeKind::Expr
        | NodeKind::XorExpr | NodeKind::AndExpr | NodeKind::ShiftExpr | NodeKind::ArithExpr
        | NodeKind::Term | NodeKind::Factor | NodeKind::Power | NodeKind::AtomExpr
        | NodeKind::Atom | NodeKind::Trailer | NodeKind::TestlistComp | NodeKind::YieldExpr
        | NodeKind::YieldArg => {
            mismatch(inner, "`simple_stmt` or `compound_stmt`")
        }
    }
}

/// Every compound statement is outside the subset; name the one used.
fn reject_compound<T>(node: &ConcreteNode) -> LowerResult<T> {
    match node.child_nodes().next() {
        Some(rule) => reject_rule(rule),
        None => mismatch(node, "a compound statement rule"),
    }
}

fn reject_rule<T>(rule: &ConcreteNode) -> LowerResult<T> {
    match Construct::for_compound_rule(rule.kind()) {
        Some(construct) => unsupported(construct, rule.span()),
        None => mismatch(rule, "a compound statement rule"),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
