// src/export/observer.rs

//! Caller-facing event surface for one export invocation.

/// Per-invocation callbacks supplied by the caller.
///
/// All methods default to no-ops, so callers implement only what they need.
///
/// Guarantees made by the orchestrator:
/// - `on_progress` may fire any number of times, including zero, and always
///   strictly before the terminal callback;
/// - exactly one of `on_success` / `on_error` fires per invocation, never
///   more.
pub trait ExportObserver: Send + Sync {
    /// A chunk of compiler output (stdout or stderr), forwarded verbatim.
    fn on_progress(&self, _chunk: &str) {}

    /// The invocation completed successfully.
    fn on_success(&self) {}

    /// The invocation failed; `message` is the classified, human-readable
    /// failure description.
    fn on_error(&self, _message: &str) {}
}

/// Observer that ignores every event.
pub struct NullObserver;

impl ExportObserver for NullObserver {}
