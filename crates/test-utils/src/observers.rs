use std::sync::Mutex;

use qdexport::export::ExportObserver;

/// Everything an observer can see, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    Progress(String),
    Success,
    Error(String),
}

/// Observer that records every callback for later assertions, including
/// their relative order.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::Progress(chunk) => Some(chunk),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ObservedEvent::Success))
            .count()
    }

    /// Number of terminal callbacks observed; the orchestrator promises this
    /// is exactly one per invocation.
    pub fn terminal_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ObservedEvent::Success | ObservedEvent::Error(_)))
            .count()
    }

    /// Index of the first terminal event in the log, if any.
    pub fn first_terminal_index(&self) -> Option<usize> {
        self.events()
            .iter()
            .position(|e| matches!(e, ObservedEvent::Success | ObservedEvent::Error(_)))
    }
}

impl ExportObserver for RecordingObserver {
    fn on_progress(&self, chunk: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ObservedEvent::Progress(chunk.to_string()));
    }

    fn on_success(&self) {
        self.events.lock().unwrap().push(ObservedEvent::Success);
    }

    fn on_error(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ObservedEvent::Error(message.to_string()));
    }
}
