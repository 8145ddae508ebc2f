//! Taskform engine: HTTP access to the node and preset endpoints, run off the UI thread.
mod decode;
mod engine;
mod fetch;
mod types;

pub use decode::decode_json_array;
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use fetch::{ApiClient, FetchSettings, ReqwestApiClient};
pub use types::{
    AvailableOption, EngineEvent, FailureKind, FetchError, NodeRecord, PresetOptionRecord,
    PresetRecord, RequestId, Resource,
};
