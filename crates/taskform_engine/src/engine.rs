use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use taskform_logging::{tf_debug, tf_error, tf_warn};
use tokio_util::sync::CancellationToken;

use crate::fetch::ApiClient;
use crate::{EngineEvent, RequestId, Resource};

enum EngineCommand {
    Fetch {
        request_id: RequestId,
        resource: Resource,
        delay: Duration,
    },
    CancelPending,
}

/// Receives fetch outcomes from the engine thread.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Handle to the background thread that runs fetches on a tokio runtime.
///
/// Dropping the handle stops the thread and aborts whatever is still running.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(client: Arc<dyn ApiClient>, sink: Arc<dyn EventSink>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    tf_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut cancel = CancellationToken::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Fetch {
                        request_id,
                        resource,
                        delay,
                    } => {
                        let client = client.clone();
                        let sink = sink.clone();
                        let token = cancel.clone();
                        runtime.spawn(async move {
                            tokio::select! {
                                _ = token.cancelled() => {
                                    tf_debug!("Request {} for {:?} cancelled", request_id, resource);
                                }
                                event = run_fetch(client.as_ref(), request_id, resource, delay) => {
                                    sink.emit(event);
                                }
                            }
                        });
                    }
                    EngineCommand::CancelPending => {
                        cancel.cancel();
                        cancel = CancellationToken::new();
                    }
                }
            }
            cancel.cancel();
        });

        Self { cmd_tx }
    }

    /// Fetches `resource` once `delay` has elapsed, unless cancelled first.
    pub fn fetch(&self, request_id: RequestId, resource: Resource, delay: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::Fetch {
            request_id,
            resource,
            delay,
        });
    }

    /// Aborts every fetch and pending retry issued so far.
    pub fn cancel_pending(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelPending);
    }
}

async fn run_fetch(
    client: &dyn ApiClient,
    request_id: RequestId,
    resource: Resource,
    delay: Duration,
) -> EngineEvent {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    match resource {
        Resource::ProcessingNodes => {
            let result = client.fetch_nodes().await;
            if let Err(err) = &result {
                tf_warn!("Error retrieving processing nodes: {}", err);
            }
            EngineEvent::NodesFetched { request_id, result }
        }
        Resource::Presets => {
            let result = client.fetch_presets().await;
            if let Err(err) = &result {
                tf_warn!("Error retrieving presets: {}", err);
            }
            EngineEvent::PresetsFetched { request_id, result }
        }
    }
}
