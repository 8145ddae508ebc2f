use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use url::Url;

use crate::decode::decode_json_array;
use crate::{FailureKind, FetchError, NodeRecord, PresetRecord, Resource};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Server root, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Read access to the two collections the form needs.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, FetchError>;

    async fn fetch_presets(&self) -> Result<Vec<PresetRecord>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    settings: FetchSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let base = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    /// Full URL of `resource` under the configured server root.
    pub fn endpoint(&self, resource: Resource) -> Result<Url, FetchError> {
        let mut url = self
            .base
            .join(resource.path())
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.set_query(resource.query());
        Ok(url)
    }

    async fn get_body(&self, resource: Resource) -> Result<Vec<u8>, FetchError> {
        let url = self.endpoint(resource)?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, FetchError> {
        let body = self.get_body(Resource::ProcessingNodes).await?;
        decode_json_array(&body)
    }

    async fn fetch_presets(&self) -> Result<Vec<PresetRecord>, FetchError> {
        let body = self.get_body(Resource::Presets).await?;
        decode_json_array(&body)
    }
}

/// Parses the server root, making sure relative joins keep any path prefix.
fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let mut base =
        Url::parse(raw).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(FetchError::new(FailureKind::InvalidUrl, raw));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
