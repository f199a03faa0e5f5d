//! Expression nodes.

use std::fmt;

use super::operators::{BinaryOp, LogicalOp, UnaryOp};
use crate::{Span, Spanned};

/// Literal payload.
///
/// Identifiers are literals too: the evaluator resolves a name literal
/// against its environment.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum LiteralValue {
    Int(i64),
    Bool(bool),
    Identifier(String),
    /// Raw string lexeme, quotes and prefix included.
    Str(String),
}

/// Expression tree.
///
/// Operands are owned and boxed; every node carries the span of the source
/// it was lowered from.
///
/// Operator chains fold into trees as deep as the chain is long. Dropping is
/// iterative and handles any depth. The derived impls and `Display` recurse
/// once per level, so cloning, comparing or rendering a chain of many
/// thousands of operands needs a correspondingly large stack.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(tag = "type"))]
pub enum Expr {
    Literal {
        value: LiteralValue,
        raw: String,
        #[cfg_attr(feature = "serde", serde(flatten))]
        span: Span,
    },
    #[cfg_attr(feature = "serde", serde(rename = "UnaryExpression"))]
    Unary {
        operator: UnaryOp,
        argument: Box<Expr>,
        #[cfg_attr(feature = "serde", serde(flatten))]
        span: Span,
    },
    #[cfg_attr(feature = "serde", serde(rename = "BinaryExpression"))]
    Binary {
        operator: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        #[cfg_attr(feature = "serde", serde(flatten))]
        span: Span,
    },
    #[cfg_attr(feature = "serde", serde(rename = "LogicalExpression"))]
    Logical {
        operator: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
        #[cfg_attr(feature = "serde", serde(flatten))]
        span: Span,
    },
}

impl Expr {
    pub fn literal(value: LiteralValue, raw: impl Into<String>, span: Span) -> Self {
        Expr::Literal {
            value,
            raw: raw.into(),
            span,
        }
    }

    pub fn unary(operator: UnaryOp, argument: Expr, span: Span) -> Self {
        Expr::Unary {
            operator,
            argument: Box::new(argument),
            span,
        }
    }

    /// Binary node spanning both operands.
    pub fn binary(operator: BinaryOp, left: Expr, right: Expr) -> Self {
        let span = left.span().merge(right.span());
        Expr::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    /// Logical node spanning both operands.
    pub fn logical(operator: LogicalOp, left: Expr, right: Expr) -> Self {
        let span = left.span().merge(right.span());
        Expr::Logical {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    /// Stand-in left behind when an operand is moved out during drop.
    fn placeholder() -> Self {
        Expr::Literal {
            value: LiteralValue::Bool(false),
            raw: String::new(),
            span: Span::DUMMY,
        }
    }

    /// Move every non-literal operand into `pending`.
    fn take_operands(&mut self, pending: &mut Vec<Expr>) {
        let operands = match self {
            Expr::Literal { .. } => return,
            Expr::Unary { argument, .. } => [Some(argument), None],
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                [Some(left), Some(right)]
            }
        };
        for operand in operands.into_iter().flatten() {
            if !matches!(**operand, Expr::Literal { .. }) {
                pending.push(std::mem::replace(&mut **operand, Expr::placeholder()));
            }
        }
    }

    /// Literal value, if this is a literal.
    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match self {
            Expr::Literal { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Literal { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Logical { span, .. } => *span,
        }
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_operands(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.take_operands(&mut pending);
        }
    }
}

/// Fully parenthesized rendering: `((a - b) - c)`, `(!x)`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { raw, .. } => f.write_str(raw),
            Expr::Unary {
                operator, argument, ..
            } => write!(f, "({operator}{argument})"),
            Expr::Binary {
                operator,
                left,
                right,
                ..
            } => write!(f, "({left} {operator} {right})"),
            Expr::Logical {
                operator,
                left,
                right,
                ..
            } => write!(f, "({left} {operator} {right})"),
        }
    }
}
