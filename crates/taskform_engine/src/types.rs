use serde::Deserialize;
use serde_json::Value;

pub type RequestId = u64;

/// Remote collections the engine knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    ProcessingNodes,
    Presets,
}

impl Resource {
    /// Path relative to the server root, without leading slash.
    pub fn path(self) -> &'static str {
        match self {
            Resource::ProcessingNodes => "api/processingnodes/",
            Resource::Presets => "api/presets/",
        }
    }

    pub fn query(self) -> Option<&'static str> {
        match self {
            Resource::ProcessingNodes => Some("has_available_options=True"),
            Resource::Presets => None,
        }
    }
}

/// One element of `GET /api/processingnodes/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeRecord {
    pub id: u64,
    pub hostname: String,
    pub port: u16,
    #[serde(default)]
    pub queue_count: u32,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub available_options: Vec<AvailableOption>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AvailableOption {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub domain: Value,
    #[serde(default)]
    pub help: Option<String>,
}

/// One element of `GET /api/presets/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresetRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub options: Vec<PresetOptionRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresetOptionRecord {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    NodesFetched {
        request_id: RequestId,
        result: Result<Vec<NodeRecord>, FetchError>,
    },
    PresetsFetched {
        request_id: RequestId,
        result: Result<Vec<PresetRecord>, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureKind {
    #[error("invalid url")]
    InvalidUrl,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("malformed response")]
    MalformedResponse,
    #[error("network error")]
    Network,
}
