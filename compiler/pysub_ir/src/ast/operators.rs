//! Operators of the evaluator's expression and statement shapes.
//!
//! Closed sets: the evaluator understands exactly these operators, so no
//! other value can be constructed. Symbols follow the evaluator's
//! JavaScript-flavoured vocabulary (`!`, `&&`, `||`), not the source
//! language's keywords.

use std::fmt;

/// Prefix operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UnaryOp {
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Plus,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Minus,
    /// Source-level `not`.
    #[cfg_attr(feature = "serde", serde(rename = "!"))]
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
        }
    }
}

/// Arithmetic, bitwise-or, and comparison operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BinaryOp {
    // Arithmetic
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Add,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Sub,
    #[cfg_attr(feature = "serde", serde(rename = "*"))]
    Mul,
    #[cfg_attr(feature = "serde", serde(rename = "/"))]
    Div,

    // Bitwise
    #[cfg_attr(feature = "serde", serde(rename = "|"))]
    BitOr,

    // Comparison
    #[cfg_attr(feature = "serde", serde(rename = ">"))]
    Gt,
    #[cfg_attr(feature = "serde", serde(rename = "<"))]
    Lt,
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    GtEq,
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    LtEq,
    #[cfg_attr(feature = "serde", serde(rename = "!="))]
    NotEq,
    #[cfg_attr(feature = "serde", serde(rename = "in"))]
    In,
}

impl BinaryOp {
    /// Returns the symbol the evaluator expects for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::BitOr => "|",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::GtEq => ">=",
            Self::LtEq => "<=",
            Self::NotEq => "!=",
            Self::In => "in",
        }
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Gt | Self::Lt | Self::GtEq | Self::LtEq | Self::NotEq | Self::In
        )
    }
}

/// Short-circuiting boolean operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LogicalOp {
    /// Source-level `and`.
    #[cfg_attr(feature = "serde", serde(rename = "&&"))]
    And,
    /// Source-level `or`.
    #[cfg_attr(feature = "serde", serde(rename = "||"))]
    Or,
}

impl LogicalOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

/// Plain and augmented assignment operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AssignOp {
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Assign,
    #[cfg_attr(feature = "serde", serde(rename = "+="))]
    AddAssign,
    #[cfg_attr(feature = "serde", serde(rename = "-="))]
    SubAssign,
    #[cfg_attr(feature = "serde", serde(rename = "*="))]
    MulAssign,
    #[cfg_attr(feature = "serde", serde(rename = "/="))]
    DivAssign,
}

impl AssignOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
        }
    }

    /// The binary operator an augmented assignment applies, `None` for `=`.
    pub const fn binary_op(self) -> Option<BinaryOp> {
        match self {
            Self::Assign => None,
            Self::AddAssign => Some(BinaryOp::Add),
            Self::SubAssign => Some(BinaryOp::Sub),
            Self::MulAssign => Some(BinaryOp::Mul),
            Self::DivAssign => Some(BinaryOp::Div),
        }
    }
}

macro_rules! display_as_symbol {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_symbol())
                }
            }
        )*
    };
}

display_as_symbol!(UnaryOp, BinaryOp, LogicalOp, AssignOp);
