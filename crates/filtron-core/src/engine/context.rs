//! Per-query execution context.

/// State shared between fragment evaluation and result materialization for
/// one in-flight query.
///
/// The duplicate-elimination flag is write-only from the evaluator's side:
/// any join-resolved fragment sets it (idempotently), and the engine reads
/// it exactly once when materializing results.
#[derive(Debug, Default)]
pub struct QueryContext {
    distinct: bool,
}

impl QueryContext {
    /// Create a fresh context with no distinct request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request duplicate-row elimination at materialization time.
    /// Idempotent; the flag is never cleared.
    pub fn request_distinct(&mut self) {
        self.distinct = true;
    }

    /// Whether duplicate-row elimination was requested.
    pub fn is_distinct(&self) -> bool {
        self.distinct
    }
}
