// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod export;
pub mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_or_default;
use crate::errors::{ExportError, Result};
use crate::exec::{CommandDescriptor, TokioProcessHandle};
use crate::export::{ExportObserver, ExportOrchestrator, ExportRequest};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file defaults, CLI overrides)
/// - the export orchestrator on the real process handle
/// - Ctrl-C → cancellation
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref().map(Path::new))?;

    let request = ExportRequest {
        executable_path: PathBuf::from(args.compiler.as_deref().unwrap_or(&cfg.compiler.path)),
        source_file: absolutize(Path::new(&args.source)),
        output_dir: absolutize(Path::new(
            args.out.as_deref().unwrap_or(&cfg.export.output_dir),
        )),
    };

    if args.dry_run {
        print_dry_run(&request);
        return Ok(());
    }

    let orchestrator = Arc::new(ExportOrchestrator::new(TokioProcessHandle::new()));

    // Ctrl-C → cancel the running invocation.
    {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {err}");
                return;
            }
            info!("interrupt received, cancelling export");
            let _ = orchestrator.cancel().await;
        });
    }

    let observer = ConsoleObserver;
    let outcome = orchestrator.export(&request, &observer).await?;

    match outcome.user_message() {
        Some(message) => Err(ExportError::Other(anyhow!(message))),
        None => Ok(()),
    }
}

/// Resolve a possibly relative path against the current working directory.
fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Simple dry-run output: print the composed command line, nothing runs.
fn print_dry_run(request: &ExportRequest) {
    let descriptor = CommandDescriptor::build(request);
    println!("qdexport dry-run");
    println!("  cwd: {}", descriptor.cwd.display());
    println!("  cmd: {}", descriptor.display_command());
    debug!("dry-run complete (no execution)");
}

/// Prints compiler output to stdout; diagnostics stay on stderr via the
/// orchestrator's tracing sink. `run` maps the outcome to the process exit
/// status, so no terminal handling is needed here.
struct ConsoleObserver;

impl ExportObserver for ConsoleObserver {
    fn on_progress(&self, chunk: &str) {
        println!("{chunk}");
    }

    fn on_success(&self) {
        println!("PDF export finished.");
    }
}
