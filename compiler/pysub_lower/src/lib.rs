//! Lowering of Python concrete syntax trees into an ESTree-shaped AST.
//!
//! A [`GrammarParser`] turns source text into a [`ConcreteNode`] tree for the
//! full Python 3 grammar. This crate walks that tree and either produces a
//! [`Program`] for the supported subset or rejects the input with a
//! diagnostic naming the first construct outside it.
//!
//! # Supported subset
//!
//! - integer, boolean, identifier and single string literals
//! - unary `+`, `-`, `not`
//! - binary `+ - * / |` and comparisons `> < >= <= != in`
//! - logical `and`, `or`
//! - expression statements and single-target `=`, `+=`, `-=`, `*=`, `/=`
//!
//! # Pipeline
//!
//! ```text
//! source ──GrammarParser──▶ ConcreteNode ──lower_*──▶ Program / Expr
//!                                              │
//!                                              └──▶ Diagnostic ──▶ DiagnosticQueue
//! ```
//!
//! Lowering stops at the first error. Callers get `Some` only when nothing
//! fatal was reported during the call.

mod error;
mod expr;
mod policy;
mod program;
mod stmt;

use std::sync::Once;

use pysub_diagnostic::span_utils::LineOffsetTable;
use pysub_diagnostic::{DiagnosticQueue, ErrorGuaranteed};
use pysub_ir::ast::{Expr, Program};
use pysub_ir::cst::ConcreteNode;
use pysub_ir::Span;
use tracing::debug;

pub use error::{LowerError, LowerResult, ParseFailure, UnsupportedConstruct};
pub use expr::{lower_expression, lower_test, lower_testlist};
pub use policy::Construct;
pub use program::{lower_eval_input, lower_file_input, lower_single_input};
pub use stmt::lower_simple_stmt;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for lowering diagnostics.
///
/// Reads the `RUST_LOG` environment variable for filtering:
/// - `RUST_LOG=pysub_lower=debug` shows statement counts and rejections
/// - `RUST_LOG=pysub_lower=trace` shows every dispatch decision
///
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Grammar start rule a parser should apply.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EntryPoint {
    /// A module: `(NEWLINE | stmt)* ENDMARKER`.
    FileInput,
    /// One interactive statement: `NEWLINE | simple_stmt | compound_stmt NEWLINE`.
    SingleInput,
    /// A standalone expression list: `testlist NEWLINE* ENDMARKER`.
    EvalInput,
}

/// Full-grammar Python parser producing concrete trees.
///
/// Implementations report every syntax error they find. Token spans must be
/// byte offsets into `source` so diagnostics resolve to line/column pairs.
pub trait GrammarParser {
    fn parse(&self, source: &str, entry: EntryPoint) -> Result<ConcreteNode, Vec<ParseFailure>>;
}

/// Parse and lower a module.
///
/// Returns `None` if the parser rejected `source` or lowering hit an
/// unsupported construct; the reason is in `queue`.
pub fn parse<P: GrammarParser + ?Sized>(
    source: &str,
    parser: &P,
    queue: &mut DiagnosticQueue,
) -> Option<Program> {
    run(source, parser, EntryPoint::FileInput, queue, lower_file_input).ok()
}

/// Parse and lower one interactive statement.
pub fn parse_interactive<P: GrammarParser + ?Sized>(
    source: &str,
    parser: &P,
    queue: &mut DiagnosticQueue,
) -> Option<Program> {
    run(source, parser, EntryPoint::SingleInput, queue, lower_single_input).ok()
}

/// Parse and lower a standalone expression.
pub fn parse_expression<P: GrammarParser + ?Sized>(
    source: &str,
    parser: &P,
    queue: &mut DiagnosticQueue,
) -> Option<Expr> {
    run(source, parser, EntryPoint::EvalInput, queue, lower_eval_input).ok()
}

/// Report a lowering error against `source`.
pub fn report(error: LowerError, source: &str, queue: &mut DiagnosticQueue) -> ErrorGuaranteed {
    queue.emit_error_with_source(error.into_diagnostic(), source)
}

fn run<P: GrammarParser + ?Sized, T>(
    source: &str,
    parser: &P,
    entry: EntryPoint,
    queue: &mut DiagnosticQueue,
    lower: fn(&ConcreteNode) -> LowerResult<T>,
) -> Result<T, ErrorGuaranteed> {
    debug!(?entry, bytes = source.len(), "parsing");
    let root = parser
        .parse(source, entry)
        .map_err(|failures| report_parse_failures(failures, source, queue))?;
    lower(&root).map_err(|error| report(error, source, queue))
}

/// Report every parser failure; an empty list still counts as one.
fn report_parse_failures(
    failures: Vec<ParseFailure>,
    source: &str,
    queue: &mut DiagnosticQueue,
) -> ErrorGuaranteed {
    debug!(failures = failures.len(), "grammar parser rejected input");
    let table = LineOffsetTable::build(source);
    let mut emit = |failure: ParseFailure| {
        let diag = LowerError::from(failure).into_diagnostic();
        queue.emit_error_with_table(diag, &table, source)
    };

    let mut guarantee = None;
    for failure in failures {
        guarantee = Some(emit(failure));
    }
    guarantee.unwrap_or_else(|| {
        emit(ParseFailure::new(
            Span::DUMMY,
            "the grammar parser rejected the input",
        ))
    })
}
