// src/export/sink.rs

//! Leveled diagnostic sink collaborator.

use tracing::{error, info, warn};

/// Destination for leveled text diagnostics produced while an export runs.
///
/// May be a no-op; the orchestrator never depends on anything coming back
/// from the sink.
pub trait DiagnosticSink: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards diagnostics to the global `tracing` subscriber.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn warn(&self, message: &str) {
        warn!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}

/// Discards every diagnostic.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
