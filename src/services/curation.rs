//! Data Curation: presign, upload, poll the status endpoint until the job
//! is done, then fetch the final payload from the presigned GET URL.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};
use crate::family::ServiceFamily;
use crate::http::CallResult;
use crate::poll::{poll_until_terminal, PollCheck};
use crate::services::content::ContentToProcess;
use crate::services::core::ServiceCore;

/// Presign options used when the caller supplies none.
pub const PRESIGN_DEFAULT_OPTIONS: &str = r#"{"normalization": {"quotations": true},"chunking": true,"embedding": true,"json_schema": "PIPELINE"}"#;

#[derive(Debug, Clone)]
pub struct DataCurationService {
    core: Arc<ServiceCore>,
}

impl DataCurationService {
    pub fn new(core: Arc<ServiceCore>) -> Self {
        Self { core }
    }

    pub async fn invoke(
        &self,
        config_name: &str,
        method: &str,
        endpoint: &str,
        payload: Option<&str>,
    ) -> Result<CallResult> {
        self.core
            .invoke(ServiceFamily::DataCuration, config_name, method, endpoint, payload, None)
            .await
    }

    /// Full curation flow. Returns the curated payload fetched from the
    /// presigned GET URL, or the first failing step's result, or — when the
    /// attempt budget runs out before the job is done — the last observed
    /// status response unchanged.
    pub async fn curate(
        &self,
        config_name: &str,
        content: &ContentToProcess,
        options_json: Option<&str>,
    ) -> Result<CallResult> {
        // 1. Presign (this also fails fast when no auth is available).
        let options = options_json
            .filter(|o| !o.trim().is_empty())
            .unwrap_or(PRESIGN_DEFAULT_OPTIONS);
        let presign = self
            .invoke(config_name, "POST", "/api/presign", Some(options))
            .await?;
        if presign.failed() {
            return Ok(presign);
        }

        let job_id = presign.json_str_field("job_id").unwrap_or_default();
        let put_url = presign.json_str_field("put_url").unwrap_or_default();
        let get_url = presign.json_str_field("get_url").unwrap_or_default();
        if job_id.trim().is_empty() || put_url.trim().is_empty() || get_url.trim().is_empty() {
            return Err(Error::InvalidJobHandle(
                "presign response is missing job_id, put_url or get_url".into(),
            ));
        }

        // 2. Upload with PUT.
        let bytes = match content.read_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                return Ok(CallResult::precondition_failure(format!(
                    "Cannot read content for curation: {e}"
                )))
            }
        };
        let uploaded = self
            .core
            .invoker()
            .upload_with_put(&put_url, "application/octet-stream", bytes)
            .await;
        if uploaded.failed() {
            return Ok(uploaded);
        }

        // 3. Pull status until done.
        let status = self.pull_status(config_name, &job_id).await?;
        let done = status
            .json()
            .and_then(|body| body.get("status").and_then(Value::as_str).map(str::to_string))
            .map(|s| s.eq_ignore_ascii_case("done"))
            .unwrap_or(false);
        if !status.is_success() || !done {
            return Ok(status);
        }

        // 4. GET at the presigned URL, no authentication headers.
        Ok(self.core.invoker().get(&get_url, &HashMap::new()).await)
    }

    /// Polls `/api/status/{job_id}`. A status payload carrying a different
    /// job id is a recoverable anomaly: logged, counted as one attempt, and
    /// polling continues.
    pub async fn pull_status(&self, config_name: &str, job_id: &str) -> Result<CallResult> {
        let endpoint = format!("/api/status/{job_id}");
        poll_until_terminal(
            self.core.poll_settings(),
            self.core.cancellation(),
            "Data Curation",
            || self.invoke(config_name, "GET", &endpoint, None),
            |result| {
                if !result.is_success() {
                    return PollCheck::Pending;
                }
                let Some(body) = result.json() else {
                    return PollCheck::Pending;
                };
                if let Some(received) = body.get("jobId").and_then(Value::as_str) {
                    if received != job_id {
                        return PollCheck::JobIdMismatch {
                            expected: job_id.to_string(),
                            received: received.to_string(),
                        };
                    }
                }
                match body.get("status").and_then(Value::as_str) {
                    Some(status) if status.eq_ignore_ascii_case("done") => PollCheck::Terminal,
                    Some(status) => {
                        info!("Pulling Data Curation status for job {job_id}, status: {status}");
                        PollCheck::Pending
                    }
                    None => PollCheck::Pending,
                }
            },
        )
        .await
    }
}
