//! Abstract syntax tree handed to the evaluator.
//!
//! ESTree-shaped: a [`Program`] is a list of [`Stmt`]s, each an expression
//! statement or an assignment over [`Expr`] trees built from literals and
//! unary, binary and logical operators. Nothing else exists at this level;
//! any source construct outside these shapes is rejected during lowering.
//!
//! With the `serde` feature the tree serializes to ESTree-style JSON
//! (`{"type": "BinaryExpression", "operator": "-", ...}`).

mod expr;
mod operators;
mod stmt;

#[cfg(test)]
mod tests;

pub use expr::{Expr, LiteralValue};
pub use operators::{AssignOp, BinaryOp, LogicalOp, UnaryOp};
pub use stmt::{Program, SourceType, Stmt};
