// src/export/orchestrator.rs

//! The export orchestration and outcome-classification engine.
//!
//! One orchestrator drives one compiler invocation at a time: it derives the
//! command line, starts the process handle, consumes the process event
//! stream (one entry point per signal), accumulates stderr, and decides the
//! single terminal outcome. Completion resolves directly from the terminal
//! event rather than by polling the handle's liveness.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::{ExportError, Result};
use crate::exec::descriptor::CommandDescriptor;
use crate::exec::process::{ProcessEvent, ProcessHandle, SpawnErrorKind};
use crate::export::classify::extract_relevant_stderr;
use crate::export::observer::ExportObserver;
use crate::export::sink::{DiagnosticSink, TracingSink};

/// One export attempt: which compiler to run, on what, and where the PDF
/// goes. Immutable for the duration of one invocation.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub executable_path: PathBuf,
    pub source_file: PathBuf,
    pub output_dir: PathBuf,
}

/// Lifecycle of the orchestrator's current (or most recent) invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    /// No export has started yet.
    Idle,
    /// An invocation is in flight.
    Running,
    /// The last invocation has reported its terminal outcome.
    Terminated,
}

/// The single terminal determination reported for an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Success,
    /// The compiler binary does not exist.
    ToolNotFound,
    /// Any other failure to start the process; carries the underlying
    /// message unchanged.
    SpawnFailed(String),
    /// The process ran but reported failure via its exit code.
    ExitCode(i32),
    /// Exit code 0, but stderr carried error-shaped diagnostics; carries the
    /// relevant lines extracted by the classifier.
    Diagnostics(String),
    /// The invocation was cancelled and the process killed.
    Cancelled,
}

/// Fixed user-facing message for the tool-not-found outcome, independent of
/// the underlying error's own text.
pub const TOOL_NOT_FOUND_MESSAGE: &str = "Quarkdown not found. Please install it first.";

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExportOutcome::Success)
    }

    /// Caller-visible message for error outcomes; `None` for success.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ExportOutcome::Success => None,
            ExportOutcome::ToolNotFound => Some(TOOL_NOT_FOUND_MESSAGE.to_string()),
            ExportOutcome::SpawnFailed(message) => Some(message.clone()),
            ExportOutcome::ExitCode(code) => {
                Some(format!("export failed with exit code {code}"))
            }
            ExportOutcome::Diagnostics(text) => Some(format!("export failed: {text}")),
            ExportOutcome::Cancelled => Some("export cancelled".to_string()),
        }
    }
}

/// Drives one external-process invocation end-to-end.
///
/// Holds at most one live process handle; overlapping `export` calls on the
/// same instance are rejected with [`ExportError::ExportInProgress`].
pub struct ExportOrchestrator<H: ProcessHandle> {
    handle: tokio::sync::Mutex<H>,
    state: Mutex<InvocationState>,
    cancel_requested: AtomicBool,
    sink: Arc<dyn DiagnosticSink>,
}

impl<H: ProcessHandle> ExportOrchestrator<H> {
    /// Orchestrator that logs diagnostics through `tracing`.
    pub fn new(handle: H) -> Self {
        Self::with_sink(handle, Arc::new(TracingSink))
    }

    pub fn with_sink(handle: H, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            handle: tokio::sync::Mutex::new(handle),
            state: Mutex::new(InvocationState::Idle),
            cancel_requested: AtomicBool::new(false),
            sink,
        }
    }

    /// Current invocation state.
    pub fn state(&self) -> InvocationState {
        *self.state.lock().expect("state lock poisoned")
    }

    /// True exactly while an invocation is in flight; false before any
    /// export has started and again once the terminal outcome is decided.
    pub fn is_exporting(&self) -> bool {
        self.state() == InvocationState::Running
    }

    fn set_state(&self, state: InvocationState) {
        *self.state.lock().expect("state lock poisoned") = state;
    }

    /// Run one export invocation to its terminal outcome.
    ///
    /// The terminal outcome is also reported exactly once through the
    /// observer: progress events first, then one of `on_success` /
    /// `on_error`. `Err` is returned only when the invocation could not
    /// begin at all (overlapping call, or the handle rejected its start);
    /// in the latter case `on_error` has fired as well, so callers using
    /// either error-reporting style observe the failure.
    pub async fn export(
        &self,
        request: &ExportRequest,
        observer: &dyn ExportObserver,
    ) -> Result<ExportOutcome> {
        // The handle lock serializes invocations; the state guard rejects
        // overlap without waiting on it.
        let mut handle = self.handle.lock().await;

        {
            let mut state = self.state.lock().expect("state lock poisoned");
            if *state == InvocationState::Running {
                return Err(ExportError::ExportInProgress);
            }
            *state = InvocationState::Running;
        }
        self.cancel_requested.store(false, Ordering::SeqCst);

        let descriptor = CommandDescriptor::build(request);
        self.sink
            .info(&format!("exporting with: {}", descriptor.display_command()));

        let mut events = match handle.start(&descriptor) {
            Ok(events) => events,
            Err(err) => {
                let message = format!("failed to start export process: {err}");
                self.sink.error(&message);
                observer.on_error(&message);
                self.set_state(InvocationState::Terminated);
                return Err(ExportError::StartFailed(err.to_string()));
            }
        };
        drop(handle);

        let mut stderr_buf = String::new();

        // One entry point per process signal, one exit per terminal outcome.
        // Breaking at the first terminal event makes "first outcome wins"
        // structural: later exit or spawn-error events are never observed.
        let outcome = loop {
            let Some(event) = events.recv().await else {
                break ExportOutcome::SpawnFailed(
                    "process event stream ended without an exit".to_string(),
                );
            };

            match event {
                ProcessEvent::Stdout(chunk) => {
                    self.sink.info(chunk.trim());
                    observer.on_progress(&chunk);
                }
                ProcessEvent::Stderr(chunk) => {
                    if !stderr_buf.is_empty() {
                        stderr_buf.push('\n');
                    }
                    stderr_buf.push_str(&chunk);
                    self.sink.warn(chunk.trim());
                    // Progress forwarding is unfiltered; the classifier only
                    // shapes the terminal error message.
                    observer.on_progress(&chunk);
                }
                ProcessEvent::SpawnError(err) => {
                    break match err.kind {
                        SpawnErrorKind::NotFound => ExportOutcome::ToolNotFound,
                        SpawnErrorKind::Other => ExportOutcome::SpawnFailed(err.message),
                    };
                }
                ProcessEvent::Exited(code) => {
                    break self.classify_exit(code, &stderr_buf);
                }
            }
        };

        self.set_state(InvocationState::Terminated);

        match outcome.user_message() {
            Some(message) => {
                self.sink.error(&message);
                observer.on_error(&message);
            }
            None => {
                self.sink.info("export completed");
                observer.on_success();
            }
        }

        Ok(outcome)
    }

    /// Classify a process exit, in priority order: cancellation, nonzero
    /// exit code, then the stderr relevance heuristic.
    fn classify_exit(&self, code: i32, stderr_buf: &str) -> ExportOutcome {
        if code != 0 {
            // A clean exit that races a cancel request still classifies
            // normally; only a killed process reports Cancelled.
            if self.cancel_requested.load(Ordering::SeqCst) {
                return ExportOutcome::Cancelled;
            }
            return ExportOutcome::ExitCode(code);
        }

        let relevant = extract_relevant_stderr(stderr_buf);
        if relevant.is_empty() {
            ExportOutcome::Success
        } else {
            ExportOutcome::Diagnostics(relevant)
        }
    }

    /// Cancel the in-flight invocation, if any, and wait for the process to
    /// be gone.
    ///
    /// Does not itself emit a terminal callback: the kill surfaces through
    /// the exit event, which the running `export` call reports as
    /// [`ExportOutcome::Cancelled`]. A no-op when nothing is running.
    pub async fn cancel(&self) -> Result<()> {
        self.cancel_requested.store(true, Ordering::SeqCst);
        let mut handle = self.handle.lock().await;
        handle.stop().await
    }
}
