//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of same-line errors
//! - Merging of per-task queues after parallel lowering
//! - `ErrorGuaranteed` proof that errors were emitted

use std::hash::{Hash, Hasher};

use parking_lot::{Mutex, MutexGuard};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, ErrorGuaranteed};

/// Number of characters to use for message prefix deduplication.
const MESSAGE_PREFIX_LEN: usize = 30;

/// Hash the first N characters of a message for dedup comparison.
#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg.get(..byte_end).unwrap_or(msg).hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before stopping (0 = unlimited).
    pub error_limit: usize,
    /// Deduplicate diagnostics with same line and similar content.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queued diagnostic with its position for sorting and deduplication.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    /// Line number (1-based).
    line: u32,
    /// Column number (1-based).
    column: u32,
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// Caller-owned: lowering appends to it, the caller decides when to flush.
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// let guarantee = queue.emit_error(diagnostic, line, column);
/// // ... emit more
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    /// Count of errors (not warnings).
    error_count: usize,
    /// Last line with a syntax error (for dedup).
    last_syntax_line: Option<u32>,
    /// Last (line, `message_prefix_hash`) for non-syntax error dedup.
    last_error: Option<(u32, u64)>,
    config: DiagnosticConfig,
}

impl Default for DiagnosticQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            last_syntax_line: None,
            last_error: None,
            config,
        }
    }

    /// Add a diagnostic at a known position.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered
    /// by the error limit or deduplication.
    pub fn add(&mut self, diag: Diagnostic, line: u32, column: u32) -> bool {
        if self.limit_reached() {
            return false;
        }

        let is_error = diag.is_error();

        if self.config.deduplicate && self.is_duplicate(&diag, line) {
            return false;
        }

        if is_error {
            if diag.code.is_syntax_error() {
                self.last_syntax_line = Some(line);
            } else {
                self.last_error = Some((line, message_prefix_hash(&diag.message)));
            }
            self.error_count += 1;
        }

        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            line,
            column,
        });
        true
    }

    /// Emit an error diagnostic and get proof it was emitted.
    ///
    /// The returned `ErrorGuaranteed` can only be obtained from the queue.
    pub fn emit_error(&mut self, diag: Diagnostic, line: u32, column: u32) -> ErrorGuaranteed {
        self.add(diag, line, column);
        ErrorGuaranteed::new()
    }

    /// Emit an error diagnostic, positioned from its primary span.
    ///
    /// Diagnostics without a primary label are placed at 1:1.
    pub fn emit_error_with_table(
        &mut self,
        diag: Diagnostic,
        table: &LineOffsetTable,
        source: &str,
    ) -> ErrorGuaranteed {
        let (line, column) = diag
            .primary_span()
            .map_or((1, 1), |span| table.offset_to_line_col(source, span.start));
        self.emit_error(diag, line, column)
    }

    /// Like [`emit_error_with_table`](Self::emit_error_with_table), building
    /// the table for a one-off lookup.
    pub fn emit_error_with_source(&mut self, diag: Diagnostic, source: &str) -> ErrorGuaranteed {
        self.emit_error_with_table(diag, &LineOffsetTable::build(source), source)
    }

    /// Move every diagnostic from `other` into this queue.
    ///
    /// `other` already applied its own limit and deduplication, and its
    /// line numbers may refer to a different source, so nothing is filtered
    /// here and the error limit is not checked. Dedup state is reset so later
    /// additions are never compared against another source's lines.
    /// Returns how many were moved.
    pub fn merge(&mut self, other: DiagnosticQueue) -> usize {
        let moved = other.diagnostics.len();
        self.error_count += other.error_count;
        self.diagnostics.extend(other.diagnostics);
        self.last_syntax_line = None;
        self.last_error = None;
        moved
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of queued diagnostics of any severity.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Sort diagnostics by position and return them, clearing the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| (w[0].line, w[0].column) <= (w[1].line, w[1].column));
        if !already_sorted {
            self.diagnostics.sort_by_key(|d| (d.line, d.column));
        }

        let result = self.diagnostics.drain(..).map(|d| d.diagnostic).collect();

        self.error_count = 0;
        self.last_syntax_line = None;
        self.last_error = None;

        result
    }

    /// Get diagnostics without clearing the queue, in insertion order.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|d| &d.diagnostic)
    }

    /// Like [`peek`](Self::peek), with each diagnostic's (line, column).
    pub fn peek_positioned(&self) -> impl Iterator<Item = (u32, u32, &Diagnostic)> {
        self.diagnostics
            .iter()
            .map(|d| (d.line, d.column, &d.diagnostic))
    }

    /// Check if a diagnostic is a duplicate of a recent one.
    fn is_duplicate(&self, diag: &Diagnostic, line: u32) -> bool {
        if !diag.is_error() {
            return false;
        }

        if diag.code.is_syntax_error() {
            self.last_syntax_line == Some(line)
        } else {
            self.last_error
                .is_some_and(|(last_line, last_hash)| {
                    last_line == line && message_prefix_hash(&diag.message) == last_hash
                })
        }
    }
}

/// A [`DiagnosticQueue`] shared between threads.
///
/// Every operation takes the lock for its duration, so diagnostics from
/// concurrent callers are serialized in arrival order.
#[derive(Debug, Default)]
pub struct SyncDiagnosticQueue {
    inner: Mutex<DiagnosticQueue>,
}

impl SyncDiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        SyncDiagnosticQueue {
            inner: Mutex::new(DiagnosticQueue::with_config(config)),
        }
    }

    /// Emit an error diagnostic, positioned from its primary span.
    pub fn emit_error_with_source(&self, diag: Diagnostic, source: &str) -> ErrorGuaranteed {
        self.inner.lock().emit_error_with_source(diag, source)
    }

    /// Merge a per-task queue in one step.
    pub fn merge(&self, other: DiagnosticQueue) -> usize {
        self.inner.lock().merge(other)
    }

    pub fn error_count(&self) -> usize {
        self.inner.lock().error_count()
    }

    /// Lock the queue for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, DiagnosticQueue> {
        self.inner.lock()
    }

    pub fn into_inner(self) -> DiagnosticQueue {
        self.inner.into_inner()
    }
}
