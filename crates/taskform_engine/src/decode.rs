use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{FailureKind, FetchError};

/// Decodes a response body that must be a JSON array of `T`.
///
/// Anything else (invalid JSON, an object, elements of the wrong shape) is
/// reported as [`FailureKind::MalformedResponse`].
pub fn decode_json_array<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, FetchError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| FetchError::new(FailureKind::MalformedResponse, err.to_string()))?;

    if !value.is_array() {
        return Err(FetchError::new(
            FailureKind::MalformedResponse,
            format!("expected a JSON array, got {}", json_kind(&value)),
        ));
    }

    serde_json::from_value(value)
        .map_err(|err| FetchError::new(FailureKind::MalformedResponse, err.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
