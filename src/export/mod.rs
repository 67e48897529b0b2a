// src/export/mod.rs

//! Export orchestration and outcome classification.
//!
//! - [`orchestrator`] drives one compiler invocation end-to-end and decides
//!   the single terminal outcome for it.
//! - [`classify`] is the pure stderr relevance heuristic used to detect
//!   "silent failures" (clean exit, error-shaped diagnostics).
//! - [`observer`] is the caller-facing event surface.
//! - [`sink`] is the leveled diagnostic sink collaborator.

pub mod classify;
pub mod observer;
pub mod orchestrator;
pub mod sink;

pub use classify::{ERROR_SIGNATURE_PATTERNS, extract_relevant_stderr};
pub use observer::{ExportObserver, NullObserver};
pub use orchestrator::{
    ExportOrchestrator, ExportOutcome, ExportRequest, InvocationState, TOOL_NOT_FOUND_MESSAGE,
};
pub use sink::{DiagnosticSink, NullSink, TracingSink};
