use std::sync::{mpsc, Arc};

use anyhow::Context;
use serde_json::Value;
use taskform_core::{Effect, Msg, NodeOption, NodeSummary, Preset, PresetOption, Resource};
use taskform_engine::{
    EngineEvent, EngineHandle, EventSink, FetchSettings, NodeRecord, PresetRecord,
    ReqwestApiClient,
};
use taskform_logging::{tf_debug, tf_info};

use super::app::LoopEvent;
use super::ui::preset_dialog::PresetDialog;
use super::ui::render::render_task_info;

/// Executes the effects `update` asks for.
pub struct EffectRunner {
    engine: EngineHandle,
    dialog: Box<dyn PresetDialog>,
    loop_tx: mpsc::Sender<LoopEvent>,
}

impl EffectRunner {
    pub fn new(
        settings: FetchSettings,
        loop_tx: mpsc::Sender<LoopEvent>,
        dialog: Box<dyn PresetDialog>,
    ) -> anyhow::Result<Self> {
        let base_url = settings.base_url.clone();
        let client = ReqwestApiClient::new(settings)
            .with_context(|| format!("setting up HTTP client for {base_url}"))?;
        let sink = Arc::new(FormEventSink {
            tx: loop_tx.clone(),
        });
        let engine = EngineHandle::new(Arc::new(client), sink);
        Ok(Self {
            engine,
            dialog,
            loop_tx,
        })
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            tf_debug!("Effect {:?}", effect);
            match effect {
                Effect::Fetch {
                    request_id,
                    resource,
                    delay,
                } => {
                    if !delay.is_zero() {
                        tf_info!("Retrying {:?} in {} ms", resource, delay.as_millis());
                    }
                    self.engine.fetch(request_id, map_resource(resource), delay);
                }
                Effect::CancelPending => self.engine.cancel_pending(),
                Effect::NotifyFormLoaded => {
                    tf_info!("Form loaded");
                    println!("Form loaded. Type `help` for commands.");
                }
                Effect::OpenPresetDialog(request) => self.dialog.show(&request),
                Effect::LaunchTask(info) => {
                    tf_info!("Launching task {:?}", info.name);
                    for line in render_task_info(&info) {
                        println!("{line}");
                    }
                    let _ = self.loop_tx.send(LoopEvent::Quit);
                }
            }
        }
    }
}

/// Turns engine events into form messages on the main loop.
struct FormEventSink {
    tx: mpsc::Sender<LoopEvent>,
}

impl EventSink for FormEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(LoopEvent::Form(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::NodesFetched { request_id, result } => Msg::NodesFetched {
            request_id,
            result: result
                .map(|nodes| nodes.into_iter().map(map_node).collect())
                .map_err(|err| err.to_string()),
        },
        EngineEvent::PresetsFetched { request_id, result } => Msg::PresetsFetched {
            request_id,
            result: result
                .map(|presets| presets.into_iter().map(map_preset).collect())
                .map_err(|err| err.to_string()),
        },
    }
}

fn map_resource(resource: Resource) -> taskform_engine::Resource {
    match resource {
        Resource::ProcessingNodes => taskform_engine::Resource::ProcessingNodes,
        Resource::Presets => taskform_engine::Resource::Presets,
    }
}

fn map_node(record: NodeRecord) -> NodeSummary {
    NodeSummary {
        id: record.id,
        hostname: record.hostname,
        port: record.port,
        queue_count: record.queue_count,
        online: record.online,
        available_options: record
            .available_options
            .into_iter()
            .map(|option| NodeOption {
                name: option.name,
                kind: option.kind,
                value: value_text(&option.value),
                help: option.help.unwrap_or_default(),
            })
            .collect(),
    }
}

fn map_preset(record: PresetRecord) -> Preset {
    Preset {
        id: record.id,
        name: record.name,
        options: record
            .options
            .into_iter()
            .map(|option| PresetOption {
                name: option.name,
                value: value_text(&option.value),
            })
            .collect(),
    }
}

/// Strings as-is, null as empty, everything else as JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskform_engine::{AvailableOption, FailureKind, FetchError, PresetOptionRecord};

    #[test]
    fn node_records_map_to_summaries() {
        let msg = map_event(EngineEvent::NodesFetched {
            request_id: 5,
            result: Ok(vec![NodeRecord {
                id: 2,
                hostname: "odm".to_string(),
                port: 3000,
                queue_count: 1,
                online: true,
                available_options: vec![AvailableOption {
                    name: "min-num-features".to_string(),
                    kind: "int".to_string(),
                    value: json!(8000),
                    domain: Value::Null,
                    help: None,
                }],
            }]),
        });

        match msg {
            Msg::NodesFetched {
                request_id,
                result: Ok(nodes),
            } => {
                assert_eq!(request_id, 5);
                assert_eq!(nodes[0].available_options[0].value, "8000");
                assert_eq!(nodes[0].available_options[0].help, "");
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn fetch_errors_become_text() {
        let msg = map_event(EngineEvent::PresetsFetched {
            request_id: 1,
            result: Err(FetchError {
                kind: FailureKind::HttpStatus(503),
                message: "503 Service Unavailable".to_string(),
            }),
        });
        assert_eq!(
            msg,
            Msg::PresetsFetched {
                request_id: 1,
                result: Err("http status 503: 503 Service Unavailable".to_string()),
            }
        );
    }

    #[test]
    fn preset_values_keep_strings_unquoted() {
        let preset = map_preset(PresetRecord {
            id: 1,
            name: "Default".to_string(),
            options: vec![
                PresetOptionRecord {
                    name: "crop".to_string(),
                    value: json!("0"),
                },
                PresetOptionRecord {
                    name: "dsm".to_string(),
                    value: json!(true),
                },
            ],
        });
        let values: Vec<_> = preset.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["0", "true"]);
    }
}
