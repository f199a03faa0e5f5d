//! Lowering error types.
//!
//! Two failure classes, both fatal:
//! - [`ParseFailure`]: the grammar parser rejected the input, or the tree
//!   handed to lowering does not have the shape the grammar prescribes
//! - [`UnsupportedConstruct`]: valid source outside the supported subset
//!
//! Lowering stops at the first error and never produces a partial program.

use pysub_diagnostic::{Diagnostic, ErrorCode};
use pysub_ir::cst::ConcreteNode;
use pysub_ir::{Span, Spanned};
use tracing::debug;

use crate::policy::Construct;

/// Valid source that uses a construct outside the supported subset.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[error("{}", self.explain())]
pub struct UnsupportedConstruct {
    pub construct: Construct,
    pub span: Span,
}

impl UnsupportedConstruct {
    #[cold]
    pub fn new(construct: Construct, span: Span) -> Self {
        UnsupportedConstruct { construct, span }
    }

    /// One-line explanation: "lambda expressions are not allowed".
    pub fn explain(&self) -> String {
        let verb = if self.construct.is_singular() { "is" } else { "are" };
        format!("{} {verb} not allowed", self.construct)
    }

    /// Longer explanation, attached to diagnostics as a note.
    pub fn elaborate(&self) -> String {
        format!(
            "You are trying to use {}, which is not allowed (yet).",
            self.construct
        )
    }
}

/// Input the grammar does not accept, or a tree that does not match it.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[error("{message}")]
pub struct ParseFailure {
    pub span: Span,
    pub message: String,
}

impl ParseFailure {
    #[cold]
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        ParseFailure {
            span,
            message: message.into(),
        }
    }

    /// A node whose kind or children do not match the grammar.
    #[cold]
    pub fn grammar_mismatch(node: &ConcreteNode, expected: &str) -> Self {
        ParseFailure::new(
            node.span(),
            format!("grammar mismatch: expected {expected}, found `{}`", node.kind()),
        )
    }

    pub fn elaborate(&self) -> &'static str {
        "There is a syntax error in your program"
    }
}

/// Any lowering failure.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum LowerError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedConstruct),
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

impl LowerError {
    pub fn span(&self) -> Span {
        match self {
            LowerError::Unsupported(err) => err.span,
            LowerError::Parse(err) => err.span,
        }
    }

    /// The rejected construct, if this is a subset violation.
    pub fn construct(&self) -> Option<&Construct> {
        match self {
            LowerError::Unsupported(err) => Some(&err.construct),
            LowerError::Parse(_) => None,
        }
    }

    /// Convert into a diagnostic with a primary label at the error span.
    pub fn into_diagnostic(self) -> Diagnostic {
        match self {
            LowerError::Unsupported(err) => Diagnostic::error(ErrorCode::E1001)
                .with_message(err.explain())
                .with_label(err.span, format!("{} used here", err.construct))
                .with_note(err.elaborate()),
            LowerError::Parse(err) => Diagnostic::error(ErrorCode::E0001)
                .with_label(err.span, "syntax error here")
                .with_note(err.elaborate())
                .with_message(err.message),
        }
    }
}

/// Result type for lowering operations.
pub type LowerResult<T> = Result<T, LowerError>;

/// Reject `construct` at `span`.
#[cold]
pub(crate) fn unsupported<T>(construct: Construct, span: Span) -> LowerResult<T> {
    debug!(construct = %construct, span = %span, "rejecting construct");
    Err(UnsupportedConstruct::new(construct, span).into())
}

/// Report that `node` does not have the shape the grammar prescribes.
#[cold]
pub(crate) fn mismatch<T>(node: &ConcreteNode, expected: &str) -> LowerResult<T> {
    debug!(kind = %node.kind(), span = %node.span(), expected, "grammar mismatch");
    Err(ParseFailure::grammar_mismatch(node, expected).into())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pysub_ir::cst::build::ident;

    use super::*;

    #[test]
    fn test_unsupported_explanations() {
        let err = UnsupportedConstruct::new(Construct::LambdaExpressions, Span::new(0, 6));
        assert_eq!(err.to_string(), "lambda expressions are not allowed");
        assert_eq!(
            err.elaborate(),
            "You are trying to use lambda expressions, which is not allowed (yet)."
        );

        let op = UnsupportedConstruct::new(Construct::Operator("//".into()), Span::new(2, 4));
        assert_eq!(op.to_string(), "the `//` operator is not allowed");
    }

    #[test]
    fn test_unsupported_into_diagnostic() {
        let err = LowerError::from(UnsupportedConstruct::new(
            Construct::FunctionCalls,
            Span::new(3, 8),
        ));
        assert_eq!(err.construct(), Some(&Construct::FunctionCalls));

        let diag = err.into_diagnostic();
        assert_eq!(diag.code, ErrorCode::E1001);
        assert_eq!(diag.message, "function calls are not allowed");
        assert_eq!(diag.primary_span(), Some(Span::new(3, 8)));
        assert_eq!(
            diag.notes,
            vec!["You are trying to use function calls, which is not allowed (yet).".to_string()]
        );
    }

    #[test]
    fn test_parse_failure_into_diagnostic() {
        let err = LowerError::from(ParseFailure::new(Span::new(5, 6), "unexpected token `)`"));
        assert_eq!(err.span(), Span::new(5, 6));
        assert_eq!(err.construct(), None);

        let diag = err.into_diagnostic();
        assert_eq!(diag.code, ErrorCode::E0001);
        assert_eq!(diag.message, "unexpected token `)`");
        assert_eq!(diag.notes, vec!["There is a syntax error in your program".to_string()]);
    }

    #[test]
    fn test_grammar_mismatch_names_rule() {
        let failure = ParseFailure::grammar_mismatch(&ident("x"), "a statement");
        assert_eq!(
            failure.message,
            "grammar mismatch: expected a statement, found `atom`"
        );
    }
}
