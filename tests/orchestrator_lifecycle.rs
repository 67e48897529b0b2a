mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{init_tracing, with_timeout};
use tokio::time::sleep;

use qdexport::errors::ExportError;
use qdexport::exec::ProcessEvent;
use qdexport::export::{
    ExportOrchestrator, ExportOutcome, ExportRequest, InvocationState, NullSink,
};
use qdexport_test_utils::builders::ExportRequestBuilder;
use qdexport_test_utils::fake_process::FakeProcessHandle;
use qdexport_test_utils::observers::RecordingObserver;

type FakeOrchestrator = ExportOrchestrator<FakeProcessHandle>;

fn spawn_export(
    orch: &Arc<FakeOrchestrator>,
    request: &ExportRequest,
    observer: &Arc<RecordingObserver>,
) -> tokio::task::JoinHandle<qdexport::errors::Result<ExportOutcome>> {
    let orch = Arc::clone(orch);
    let request = request.clone();
    let observer = Arc::clone(observer);
    tokio::spawn(async move { orch.export(&request, observer.as_ref()).await })
}

async fn wait_until_exporting(orch: &FakeOrchestrator) {
    for _ in 0..100 {
        if orch.is_exporting() {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("orchestrator never reached the Running state");
}

#[tokio::test]
async fn idle_before_any_export() {
    init_tracing();

    let orch = ExportOrchestrator::with_sink(
        FakeProcessHandle::with_events(vec![]),
        Arc::new(NullSink),
    );

    assert!(!orch.is_exporting());
    assert_eq!(orch.state(), InvocationState::Idle);
}

#[tokio::test]
async fn state_tracks_the_invocation_lifecycle() {
    init_tracing();

    let (handle, gate) = FakeProcessHandle::gated(vec![
        ProcessEvent::Stdout("working".into()),
        ProcessEvent::Exited(0),
    ]);
    let orch = Arc::new(ExportOrchestrator::with_sink(handle, Arc::new(NullSink)));
    let observer = Arc::new(RecordingObserver::new());
    let request = ExportRequestBuilder::new().build();

    let export = spawn_export(&orch, &request, &observer);
    with_timeout(wait_until_exporting(&orch)).await;
    assert_eq!(orch.state(), InvocationState::Running);

    gate.notify_one();
    let outcome = with_timeout(export).await.unwrap().unwrap();

    assert!(outcome.is_success());
    assert!(!orch.is_exporting());
    assert_eq!(orch.state(), InvocationState::Terminated);
}

#[tokio::test]
async fn overlapping_export_is_rejected() {
    init_tracing();

    let (handle, gate) = FakeProcessHandle::gated(vec![ProcessEvent::Exited(0)]);
    let orch = Arc::new(ExportOrchestrator::with_sink(handle, Arc::new(NullSink)));
    let observer = Arc::new(RecordingObserver::new());
    let request = ExportRequestBuilder::new().build();

    let first = spawn_export(&orch, &request, &observer);
    with_timeout(wait_until_exporting(&orch)).await;

    let second = orch
        .export(&request, &RecordingObserver::new())
        .await;
    assert!(matches!(second, Err(ExportError::ExportInProgress)));

    gate.notify_one();
    let outcome = with_timeout(first).await.unwrap().unwrap();
    assert!(outcome.is_success());
    // The rejected call must not have produced a second terminal callback.
    assert_eq!(observer.terminal_count(), 1);
}

#[tokio::test]
async fn cancel_reports_cancelled_outcome() {
    init_tracing();

    // The gated fake withholds the exit event until stop releases it,
    // mimicking a kill: the process "dies" with a signal-style exit code.
    let (handle, _gate) = FakeProcessHandle::gated(vec![
        ProcessEvent::Stdout("rendering".into()),
        ProcessEvent::Exited(-1),
    ]);
    let stop_calls = Arc::clone(&handle.stop_calls);
    let orch = Arc::new(ExportOrchestrator::with_sink(handle, Arc::new(NullSink)));
    let observer = Arc::new(RecordingObserver::new());
    let request = ExportRequestBuilder::new().build();

    let export = spawn_export(&orch, &request, &observer);
    with_timeout(wait_until_exporting(&orch)).await;

    orch.cancel().await.unwrap();
    let outcome = with_timeout(export).await.unwrap().unwrap();

    assert_eq!(outcome, ExportOutcome::Cancelled);
    assert_eq!(stop_calls.load(Ordering::SeqCst), 1);
    assert_eq!(observer.errors(), vec!["export cancelled"]);
    assert!(!orch.is_exporting());
}

#[tokio::test]
async fn cancel_before_any_export_is_a_noop() {
    init_tracing();

    let orch = ExportOrchestrator::with_sink(
        FakeProcessHandle::with_events(vec![ProcessEvent::Exited(0)]),
        Arc::new(NullSink),
    );

    orch.cancel().await.unwrap();
    assert!(!orch.is_exporting());

    // A stale cancel request must not taint the next invocation.
    let observer = RecordingObserver::new();
    let outcome = orch
        .export(&ExportRequestBuilder::new().build(), &observer)
        .await
        .unwrap();
    assert!(outcome.is_success());
}

#[tokio::test]
async fn sequential_exports_reuse_the_orchestrator() {
    init_tracing();

    let handle = FakeProcessHandle::with_events(vec![
        ProcessEvent::Stdout("ok".into()),
        ProcessEvent::Exited(0),
    ]);
    let started = Arc::clone(&handle.started);
    let orch = ExportOrchestrator::with_sink(handle, Arc::new(NullSink));
    let request = ExportRequestBuilder::new().build();

    for _ in 0..2 {
        let observer = RecordingObserver::new();
        let outcome = orch.export(&request, &observer).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(observer.terminal_count(), 1);
    }

    assert_eq!(started.lock().unwrap().len(), 2);
    assert_eq!(orch.state(), InvocationState::Terminated);
}
