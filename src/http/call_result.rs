//! Uniform call/response envelope returned by every service operation.

use serde::Serialize;
use serde_json::{json, Value};

/// A required precondition (auth token, source id, readable file) was not
/// met; no request went out.
pub const STATUS_NO_AUTH: i32 = -1;

/// A status response referenced a different job than the one submitted.
pub const STATUS_JOB_ID_MISMATCH: i32 = -2;

/// Network-level failure (DNS, timeout, connection reset) before any HTTP
/// status was obtained.
pub const STATUS_TRANSPORT_FAILURE: i32 = 0;

/// Correlates a caller-supplied item identifier with the server-assigned
/// object key for one uploaded item of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectKeyMapping {
    #[serde(rename = "sourceId")]
    pub source_id: String,
    #[serde(rename = "objectKey")]
    pub object_key: String,
}

/// Immutable outcome of one service call. Non-positive status codes are
/// reserved for failures that never reached the server.
#[derive(Debug, Clone)]
pub struct CallResult {
    status_code: i32,
    status_message: String,
    body: String,
    object_keys_mapping: Option<Vec<ObjectKeyMapping>>,
}

impl CallResult {
    pub fn new(
        status_code: i32,
        status_message: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            status_message: status_message.into(),
            body: body.into(),
            object_keys_mapping: None,
        }
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self::new(STATUS_TRANSPORT_FAILURE, message, "{}")
    }

    pub fn precondition_failure(message: impl Into<String>) -> Self {
        Self::new(STATUS_NO_AUTH, message, "{}")
    }

    pub fn job_id_mismatch(message: impl Into<String>) -> Self {
        Self::new(STATUS_JOB_ID_MISMATCH, message, "{}")
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let message = status.canonical_reason().unwrap_or_default().to_string();
        match response.text().await {
            Ok(body) => Self::new(status.as_u16() as i32, message, body),
            Err(e) => Self::transport_failure(e.to_string()),
        }
    }

    pub fn status_code(&self) -> i32 {
        self.status_code
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// 200–299.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status_code)
    }

    /// Strictly 200. A 202 "Accepted" does not carry the full response, so
    /// result-pulling loops require an actual OK.
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }

    /// 202 — the work was accepted, poll for a result.
    pub fn is_accepted(&self) -> bool {
        self.status_code == 202
    }

    pub fn failed(&self) -> bool {
        !self.is_success()
    }

    /// Body parsed as JSON, if it is JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// A string field of the JSON body, top level.
    pub fn json_str_field(&self, field: &str) -> Option<String> {
        self.json()?
            .get(field)?
            .as_str()
            .map(|s| s.to_string())
    }

    pub fn object_keys_mapping(&self) -> Option<&[ObjectKeyMapping]> {
        self.object_keys_mapping.as_deref()
    }

    pub fn with_object_keys_mapping(mut self, mapping: Vec<ObjectKeyMapping>) -> Self {
        self.object_keys_mapping = Some(mapping);
        self
    }

    /// The JSON-serializable envelope collaborators render directly:
    /// `{responseCode, responseMessage, response}` plus the object-keys
    /// mapping when a batch was submitted.
    pub fn envelope(&self) -> Value {
        let response: Value = self
            .json()
            .unwrap_or_else(|| Value::String(self.body.clone()));
        let mut envelope = json!({
            "responseCode": self.status_code,
            "responseMessage": self.status_message,
            "response": response,
        });
        if let Some(mapping) = &self.object_keys_mapping {
            envelope["objectKeysMapping"] = json!(mapping);
        }
        envelope
    }
}
