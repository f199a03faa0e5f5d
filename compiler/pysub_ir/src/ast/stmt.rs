//! Statement nodes and the program root.

use std::fmt;

use super::expr::Expr;
use super::operators::AssignOp;
use crate::{Span, Spanned};

/// A single lowered statement.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(tag = "type"))]
pub enum Stmt {
    #[cfg_attr(feature = "serde", serde(rename = "ExpressionStatement"))]
    Expression {
        expression: Expr,
        #[cfg_attr(feature = "serde", serde(flatten))]
        span: Span,
    },
    /// `left op right`; `left` is always a single expression.
    #[cfg_attr(feature = "serde", serde(rename = "AssignmentStatement"))]
    Assignment {
        operator: AssignOp,
        left: Expr,
        right: Expr,
        #[cfg_attr(feature = "serde", serde(flatten))]
        span: Span,
    },
}

impl Stmt {
    pub fn expression(expression: Expr, span: Span) -> Self {
        Stmt::Expression { expression, span }
    }

    pub fn assignment(operator: AssignOp, left: Expr, right: Expr, span: Span) -> Self {
        Stmt::Assignment {
            operator,
            left,
            right,
            span,
        }
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        match self {
            Stmt::Expression { span, .. } | Stmt::Assignment { span, .. } => *span,
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expression { expression, .. } => write!(f, "{expression}"),
            Stmt::Assignment {
                operator,
                left,
                right,
                ..
            } => write!(f, "{left} {operator} {right}"),
        }
    }
}

/// How the evaluator should treat the program body.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum SourceType {
    #[default]
    Script,
}

/// Root of a lowered source file.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", rename = "Program", rename_all = "camelCase")
)]
pub struct Program {
    pub source_type: SourceType,
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program {
            source_type: SourceType::Script,
            body,
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// One statement per line.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.body.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}
