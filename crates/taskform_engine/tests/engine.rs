use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use taskform_engine::{
    ApiClient, ChannelEventSink, EngineEvent, EngineHandle, FailureKind, FetchError, NodeRecord,
    PresetRecord, Resource,
};

#[derive(Default)]
struct FakeClient {
    node_calls: AtomicUsize,
    preset_calls: AtomicUsize,
}

#[async_trait::async_trait]
impl ApiClient for FakeClient {
    async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, FetchError> {
        self.node_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![NodeRecord {
            id: 1,
            hostname: "localhost".to_string(),
            port: 3000,
            queue_count: 0,
            online: true,
            available_options: Vec::new(),
        }])
    }

    async fn fetch_presets(&self) -> Result<Vec<PresetRecord>, FetchError> {
        self.preset_calls.fetch_add(1, Ordering::SeqCst);
        Err(FetchError {
            kind: FailureKind::HttpStatus(502),
            message: "502 Bad Gateway".to_string(),
        })
    }
}

fn engine() -> (EngineHandle, Arc<FakeClient>, mpsc::Receiver<EngineEvent>) {
    let client = Arc::new(FakeClient::default());
    let (tx, rx) = mpsc::channel();
    let handle = EngineHandle::new(client.clone(), Arc::new(ChannelEventSink::new(tx)));
    (handle, client, rx)
}

#[test]
fn fetch_reports_tagged_result() {
    let (engine, _client, rx) = engine();
    engine.fetch(7, Resource::ProcessingNodes, Duration::ZERO);

    match rx.recv_timeout(Duration::from_secs(5)).expect("event") {
        EngineEvent::NodesFetched { request_id, result } => {
            assert_eq!(request_id, 7);
            assert_eq!(result.unwrap()[0].hostname, "localhost");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn failures_are_reported_not_swallowed() {
    let (engine, _client, rx) = engine();
    engine.fetch(3, Resource::Presets, Duration::ZERO);

    match rx.recv_timeout(Duration::from_secs(5)).expect("event") {
        EngineEvent::PresetsFetched { request_id, result } => {
            assert_eq!(request_id, 3);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(502));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn delayed_fetch_waits_before_calling_client() {
    let (engine, client, rx) = engine();
    engine.fetch(1, Resource::ProcessingNodes, Duration::from_millis(300));

    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(client.node_calls.load(Ordering::SeqCst), 0);

    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    assert_eq!(client.node_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn cancel_stops_pending_retries() {
    let (engine, client, rx) = engine();
    engine.fetch(1, Resource::ProcessingNodes, Duration::from_millis(200));
    engine.fetch(2, Resource::Presets, Duration::from_millis(200));
    engine.cancel_pending();

    assert!(rx.recv_timeout(Duration::from_millis(600)).is_err());
    assert_eq!(client.node_calls.load(Ordering::SeqCst), 0);
    assert_eq!(client.preset_calls.load(Ordering::SeqCst), 0);

    // Work issued after a cancel runs normally.
    engine.fetch(3, Resource::ProcessingNodes, Duration::ZERO);
    match rx.recv_timeout(Duration::from_secs(5)).expect("event") {
        EngineEvent::NodesFetched { request_id, .. } => assert_eq!(request_id, 3),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn dropping_handle_aborts_pending_work() {
    let (engine, client, rx) = engine();
    engine.fetch(1, Resource::ProcessingNodes, Duration::from_millis(200));
    drop(engine);

    assert!(rx.recv_timeout(Duration::from_millis(600)).is_err());
    assert_eq!(client.node_calls.load(Ordering::SeqCst), 0);
}
