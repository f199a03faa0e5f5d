//! Focused traits shared by concrete and abstract trees.

use super::Span;

/// Trait for types that have a source location span.
pub trait Spanned {
    /// Get the source location span.
    fn span(&self) -> Span;
}
