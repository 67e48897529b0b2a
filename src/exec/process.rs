// src/exec/process.rs

//! Process handle abstraction over the external compiler process.
//!
//! The orchestrator talks to a [`ProcessHandle`] instead of spawning
//! processes directly. This makes it easy to swap in a fake handle in tests
//! while keeping the production implementation, [`TokioProcessHandle`], on
//! `tokio::process::Command`.
//!
//! Every signal the process can emit arrives on a single event stream:
//! stdout lines, stderr lines, a failure to launch at all, and the final
//! exit code. The production handle guarantees that all stdout/stderr
//! events are delivered before the `Exited` event.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::errors::{ExportError, Result};
use crate::exec::descriptor::CommandDescriptor;

/// Classification of a failure to launch the process at all, as opposed to a
/// failure during or after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnErrorKind {
    /// The executable does not exist on the system.
    NotFound,
    /// Any other inability to start the process.
    Other,
}

/// A spawn failure with a machine-checkable kind and a human-readable
/// message from the underlying cause.
#[derive(Debug, Clone)]
pub struct SpawnError {
    pub kind: SpawnErrorKind,
    pub message: String,
}

/// One event per process signal.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    /// A line of standard output.
    Stdout(String),
    /// A line of error output.
    Stderr(String),
    /// The process could not be launched.
    SpawnError(SpawnError),
    /// The process exited with the given code (`-1` when killed by signal).
    Exited(i32),
}

/// Trait abstracting a single external process.
///
/// Production code uses [`TokioProcessHandle`]; tests can provide their own
/// implementation that emits scripted events without spawning anything.
pub trait ProcessHandle: Send {
    /// Begin execution of the described command and return the event stream
    /// for this invocation.
    ///
    /// A failure to launch the OS process is *not* an `Err` here: it is
    /// delivered as [`ProcessEvent::SpawnError`] on the stream, so the
    /// orchestrator classifies it alongside exits. `Err` is reserved for
    /// handle-level misuse, e.g. starting while a process is still running.
    fn start(&mut self, descriptor: &CommandDescriptor) -> Result<mpsc::Receiver<ProcessEvent>>;

    /// Request termination of the running process and wait until it is gone.
    ///
    /// A no-op when nothing is running. Termination still surfaces through
    /// the event stream as an `Exited` event.
    fn stop(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Current liveness of the underlying process.
    fn is_running(&self) -> bool;
}

/// Production process handle on top of `tokio::process`.
///
/// Reusable across sequential invocations; a single handle never runs more
/// than one process at a time.
pub struct TokioProcessHandle {
    running: Arc<AtomicBool>,
    stop_tx: Option<oneshot::Sender<()>>,
    done_rx: Option<oneshot::Receiver<()>>,
}

impl TokioProcessHandle {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            stop_tx: None,
            done_rx: None,
        }
    }
}

impl Default for TokioProcessHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessHandle for TokioProcessHandle {
    fn start(&mut self, descriptor: &CommandDescriptor) -> Result<mpsc::Receiver<ProcessEvent>> {
        if self.is_running() {
            return Err(ExportError::ProcessAlreadyRunning);
        }

        let (event_tx, event_rx) = mpsc::channel::<ProcessEvent>(64);

        let mut cmd = Command::new(&descriptor.command);
        cmd.args(&descriptor.args)
            .current_dir(&descriptor.cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                let kind = if err.kind() == std::io::ErrorKind::NotFound {
                    SpawnErrorKind::NotFound
                } else {
                    SpawnErrorKind::Other
                };
                debug!(command = %descriptor.command, error = %err, "spawn failed");
                // Freshly created channel, so the send cannot be full here.
                let _ = event_tx.try_send(ProcessEvent::SpawnError(SpawnError {
                    kind,
                    message: err.to_string(),
                }));
                return Ok(event_rx);
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let out_task = spawn_line_reader(stdout, event_tx.clone(), ProcessEvent::Stdout);
        let err_task = spawn_line_reader(stderr, event_tx.clone(), ProcessEvent::Stderr);

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let (done_tx, done_rx) = oneshot::channel::<()>();

        let running = Arc::clone(&self.running);
        running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            // Either the process exits on its own, or a stop request kills it.
            let status = tokio::select! {
                status = child.wait() => status,
                _ = &mut stop_rx => {
                    if let Err(err) = child.kill().await {
                        warn!(error = %err, "failed to kill child process on stop");
                    }
                    child.wait().await
                }
            };

            let code = match status {
                Ok(status) => status.code().unwrap_or(-1),
                Err(err) => {
                    warn!(error = %err, "waiting for child process failed");
                    -1
                }
            };

            // Join both readers first, so every stdout/stderr event is
            // delivered before the exit event.
            let _ = out_task.await;
            let _ = err_task.await;

            running.store(false, Ordering::SeqCst);
            let _ = event_tx.send(ProcessEvent::Exited(code)).await;
            let _ = done_tx.send(());
        });

        self.stop_tx = Some(stop_tx);
        self.done_rx = Some(done_rx);

        Ok(event_rx)
    }

    fn stop(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let stop_tx = self.stop_tx.take();
        let done_rx = self.done_rx.take();

        Box::pin(async move {
            if let Some(tx) = stop_tx {
                // Fails when the wait task already finished; nothing left to
                // stop in that case.
                let _ = tx.send(());
            }
            if let Some(rx) = done_rx {
                let _ = rx.await;
            }
            Ok(())
        })
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Forward every line of the given stream as a `ProcessEvent`.
fn spawn_line_reader<R>(
    stream: Option<R>,
    event_tx: mpsc::Sender<ProcessEvent>,
    make_event: fn(String) -> ProcessEvent,
) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(stream) = stream else {
            return;
        };
        let reader = BufReader::new(stream);
        let mut lines = reader.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if event_tx.send(make_event(line)).await.is_err() {
                break;
            }
        }
    })
}
