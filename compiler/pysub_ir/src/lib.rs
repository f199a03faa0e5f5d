//! pysub IR - tree types for the lowering pipeline
//!
//! This crate contains the data structures on both sides of lowering:
//! - Spans for source locations
//! - The concrete syntax tree produced by a grammar parser ([`cst`])
//! - The ESTree-shaped abstract tree consumed by the evaluator ([`ast`])
//!
//! # Design Philosophy
//!
//! - **Closed Sets**: rule kinds and operators are exhaustive enums
//! - **Immutable Trees**: concrete trees are built once and only borrowed
//! - **Interface Segregation**: focused traits (`Spanned`)

pub mod ast;
pub mod cst;
mod span;
mod traits;

pub use span::{Span, SpanError};
pub use traits::Spanned;
