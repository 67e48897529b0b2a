// src/exec/mod.rs

//! Process execution layer.
//!
//! This module owns everything needed to actually run the external compiler
//! with `tokio::process::Command` and to report what happened back to the
//! export orchestrator as a stream of [`process::ProcessEvent`]s.
//!
//! - [`descriptor`] derives the compiler command line from an export request.
//! - [`process`] provides the `ProcessHandle` trait and the concrete
//!   `TokioProcessHandle` used in production, which tests can replace with a
//!   fake implementation.

pub mod descriptor;
pub mod process;

pub use descriptor::CommandDescriptor;
pub use process::{
    ProcessEvent, ProcessHandle, SpawnError, SpawnErrorKind, TokioProcessHandle,
};
