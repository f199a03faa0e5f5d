//! Diagnostic system for lowering errors.
//!
//! Every rejected program produces a [`Diagnostic`] with:
//! - An error code for searchability
//! - A message saying what went wrong
//! - A primary span saying where
//! - Notes elaborating on the cause
//!
//! # Error Guarantees
//!
//! The `ErrorGuaranteed` type provides type-level proof that at least one
//! error was emitted. Code that fails must hand one back, so a failure
//! can never be returned without a matching report.
//!
//! ```text
//! // Can only get ErrorGuaranteed by emitting an error
//! let guarantee = queue.emit_error(diagnostic, line, column);
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue, SyncDiagnosticQueue};
