use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{Notify, mpsc};

use qdexport::errors::{ExportError, Result};
use qdexport::exec::{CommandDescriptor, ProcessEvent, ProcessHandle};

/// A scripted process handle:
/// - records every descriptor it was started with
/// - emits a fixed sequence of events per start
/// - with [`FakeProcessHandle::gated`], withholds the final event until the
///   gate is released, so tests can observe the orchestrator mid-invocation.
///
/// `stop()` counts calls and releases the gate, standing in for killing the
/// process.
pub struct FakeProcessHandle {
    events: Vec<ProcessEvent>,
    gate: Option<Arc<Notify>>,
    running: Arc<AtomicBool>,
    pub started: Arc<Mutex<Vec<CommandDescriptor>>>,
    pub stop_calls: Arc<AtomicUsize>,
}

impl FakeProcessHandle {
    pub fn with_events(events: Vec<ProcessEvent>) -> Self {
        Self {
            events,
            gate: None,
            running: Arc::new(AtomicBool::new(false)),
            started: Arc::new(Mutex::new(Vec::new())),
            stop_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Like [`with_events`](Self::with_events), but the last event is
    /// withheld until the returned notify is triggered (or `stop` is
    /// called).
    pub fn gated(events: Vec<ProcessEvent>) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let mut handle = Self::with_events(events);
        handle.gate = Some(Arc::clone(&gate));
        (handle, gate)
    }

    pub fn started_descriptors(&self) -> Vec<CommandDescriptor> {
        self.started.lock().unwrap().clone()
    }
}

impl ProcessHandle for FakeProcessHandle {
    fn start(&mut self, descriptor: &CommandDescriptor) -> Result<mpsc::Receiver<ProcessEvent>> {
        self.started.lock().unwrap().push(descriptor.clone());

        let (tx, rx) = mpsc::channel(64);
        let events = self.events.clone();
        let gate = self.gate.clone();
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let last = events.len().saturating_sub(1);
            for (i, event) in events.into_iter().enumerate() {
                if i == last {
                    if let Some(gate) = &gate {
                        gate.notified().await;
                    }
                    running.store(false, Ordering::SeqCst);
                }
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            running.store(false, Ordering::SeqCst);
        });

        Ok(rx)
    }

    fn stop(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.clone();
        Box::pin(async move {
            if let Some(gate) = gate {
                gate.notify_one();
            }
            Ok(())
        })
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Handle whose start call itself fails, for exercising the synchronous
/// start-failure path.
pub struct FailingStartHandle;

impl ProcessHandle for FailingStartHandle {
    fn start(&mut self, _descriptor: &CommandDescriptor) -> Result<mpsc::Receiver<ProcessEvent>> {
        Err(ExportError::Other(anyhow::anyhow!(
            "handle refused to start"
        )))
    }

    fn stop(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async { Ok(()) })
    }

    fn is_running(&self) -> bool {
        false
    }
}
