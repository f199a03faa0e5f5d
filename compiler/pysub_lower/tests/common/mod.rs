//! Shared helpers for lowering integration tests.
//!
//! Trees come from `pysub_ir::cst::build`; [`Prebuilt`] stands in for a real
//! grammar parser by handing back a laid-out tree for its source text.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use pysub_diagnostic::{DiagnosticConfig, DiagnosticQueue};
use pysub_ir::cst::build::{layout, statement, Fixture};
use pysub_ir::cst::{ConcreteNode, NodeKind};
use pysub_ir::Span;
use pysub_lower::{EntryPoint, GrammarParser, ParseFailure};

/// Grammar parser that returns a fixed result for one entry point.
pub struct Prebuilt {
    entry: EntryPoint,
    result: Result<ConcreteNode, Vec<ParseFailure>>,
}

impl Prebuilt {
    pub fn failing(entry: EntryPoint, failures: Vec<ParseFailure>) -> Self {
        Prebuilt {
            entry,
            result: Err(failures),
        }
    }
}

impl GrammarParser for Prebuilt {
    fn parse(&self, _source: &str, entry: EntryPoint) -> Result<ConcreteNode, Vec<ParseFailure>> {
        if entry != self.entry {
            return Err(vec![ParseFailure::new(
                Span::DUMMY,
                format!("parser prepared for {:?}, asked for {entry:?}", self.entry),
            )]);
        }
        self.result.clone()
    }
}

/// Lay out `root` and pair its source with a parser that yields it.
pub fn prebuilt(entry: EntryPoint, root: ConcreteNode) -> (String, Prebuilt) {
    let Fixture { source, root } = layout(root);
    let parser = Prebuilt {
        entry,
        result: Ok(root),
    };
    (source, parser)
}

/// A statement line from a full `stmt` node, a statement body or an expression.
pub fn line(body: ConcreteNode) -> ConcreteNode {
    if body.kind() == NodeKind::Stmt {
        body
    } else {
        statement(body)
    }
}

/// Queue that keeps every diagnostic.
pub fn unlimited_queue() -> DiagnosticQueue {
    DiagnosticQueue::with_config(DiagnosticConfig::unlimited())
}
