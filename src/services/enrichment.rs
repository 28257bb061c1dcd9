//! Knowledge Enrichment: batch presigned uploads, processing submission and
//! result pulling with per-item partial failure.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::error;

use crate::error::{Error, Result};
use crate::family::ServiceFamily;
use crate::http::{CallResult, ObjectKeyMapping};
use crate::poll::{poll_until_terminal, PollCheck};
use crate::services::content::ContentToProcess;
use crate::services::core::ServiceCore;

/// Processing request built by the caller: which actions/classes to run and
/// any extra payload merged verbatim at the top level.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentRequest {
    pub actions: Vec<String>,
    pub classes: Vec<String>,
    /// JSON array, forwarded as `kSimilarMetadata`.
    pub similar_metadata: Option<Value>,
    /// JSON object merged into the payload, key by key.
    pub extra_payload: Option<Value>,
}

impl EnrichmentRequest {
    fn process_payload(&self, object_keys: &[String]) -> Value {
        let mut payload = json!({
            "objectKeys": object_keys,
            "actions": self.actions,
            "classes": self.classes,
            "kSimilarMetadata": self.similar_metadata.clone().unwrap_or_else(|| json!([])),
        });
        if let (Some(merged), Some(Value::Object(extra))) =
            (payload.as_object_mut(), self.extra_payload.as_ref())
        {
            for (key, value) in extra {
                merged.insert(key.clone(), value.clone());
            }
        }
        payload
    }
}

#[derive(Debug, Clone)]
pub struct EnrichmentService {
    core: Arc<ServiceCore>,
}

impl EnrichmentService {
    pub fn new(core: Arc<ServiceCore>) -> Self {
        Self { core }
    }

    /// Generic call against the enrichment service.
    pub async fn invoke(
        &self,
        config_name: &str,
        method: &str,
        endpoint: &str,
        payload: Option<&str>,
    ) -> Result<CallResult> {
        self.core
            .invoke(ServiceFamily::Enrichment, config_name, method, endpoint, payload, None)
            .await
    }

    /// Results of a previously submitted processing job.
    pub async fn get_job_result(&self, config_name: &str, job_id: &str) -> Result<CallResult> {
        self.invoke(
            config_name,
            "GET",
            &format!("/api/content/process/{job_id}/results"),
            None,
        )
        .await
    }

    /// Uploads every item (presigned URL + PUT) and submits the processing
    /// request for the items whose upload succeeded. Items that fail their
    /// upload step record their own error and are excluded from the batch;
    /// they do not abort the others.
    pub async fn send_for_enrichment(
        &self,
        config_name: &str,
        items: &mut [ContentToProcess],
        request: &EnrichmentRequest,
    ) -> Result<CallResult> {
        for item in items.iter_mut() {
            self.upload_one(config_name, item).await?;
        }

        let object_keys: Vec<String> = items
            .iter()
            .filter(|item| item.is_processing_success())
            .filter_map(|item| item.object_key().map(|k| k.to_string()))
            .collect();

        let payload = request.process_payload(&object_keys);
        self.invoke(
            config_name,
            "POST",
            "/api/content/process",
            Some(&payload.to_string()),
        )
        .await
    }

    /// Full flow: submit, pull results until the service answers with a
    /// strict 200, then annotate the result with the source-id → object-key
    /// mapping so the caller can recombine per original item even when only
    /// a subset of the batch made it through.
    pub async fn enrich(
        &self,
        config_name: &str,
        items: &mut [ContentToProcess],
        request: &EnrichmentRequest,
    ) -> Result<CallResult> {
        let submitted = self.send_for_enrichment(config_name, items, request).await?;
        if submitted.failed() {
            return Ok(submitted);
        }

        let processing_id = submitted
            .json_str_field("processingId")
            .ok_or_else(|| Error::InvalidJobHandle("no processingId in submit response".into()))?;

        let result = self.pull_results(config_name, &processing_id).await?;
        if result.is_success() {
            return Ok(map_object_keys(result, items));
        }
        Ok(result)
    }

    /// Pulls job results until an actual 200 (a 202 does not carry the full
    /// response). On exhaustion the last observed result comes back as-is.
    pub async fn pull_results(&self, config_name: &str, job_id: &str) -> Result<CallResult> {
        poll_until_terminal(
            self.core.poll_settings(),
            self.core.cancellation(),
            "Enrichment",
            || self.get_job_result(config_name, job_id),
            |result| {
                if result.is_ok() {
                    PollCheck::Terminal
                } else {
                    PollCheck::Pending
                }
            },
        )
        .await
    }

    async fn upload_one(&self, config_name: &str, item: &mut ContentToProcess) -> Result<()> {
        let endpoint = format!(
            "/api/files/upload/presigned-url?contentType={}",
            item.mime_type().replace('/', "%2F")
        );
        let result = self.invoke(config_name, "GET", &endpoint, None).await?;
        if result.failed() {
            let message = format!(
                "Failed getting a presigned URL for content ID <{}>",
                item.source_id()
            );
            error!("{message}");
            item.mark_failed(message);
            return Ok(());
        }

        let (presigned_url, object_key) = match (
            result.json_str_field("presignedUrl"),
            result.json_str_field("objectKey"),
        ) {
            (Some(url), Some(key)) => (url, key),
            _ => {
                let message = format!(
                    "Presigned-URL response for content ID <{}> is missing presignedUrl/objectKey",
                    item.source_id()
                );
                error!("{message}");
                item.mark_failed(message);
                return Ok(());
            }
        };
        item.set_object_key(object_key);

        let bytes = match item.read_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                let message =
                    format!("Cannot read content for content ID <{}>: {e}", item.source_id());
                error!("{message}");
                item.mark_failed(message);
                return Ok(());
            }
        };

        let uploaded = self
            .core
            .invoker()
            .upload_with_put(&presigned_url, item.mime_type(), bytes)
            .await;
        if uploaded.failed() {
            let message = format!("Failed uploading content ID <{}>", item.source_id());
            error!("{message}");
            item.mark_failed(message);
            return Ok(());
        }

        item.mark_uploaded();
        Ok(())
    }
}

/// Correlates the terminal `results` array back to the submitted items.
/// Only items whose object key appears in the results end up in the
/// mapping.
fn map_object_keys(result: CallResult, items: &[ContentToProcess]) -> CallResult {
    let Some(body) = result.json() else {
        return result;
    };
    let Some(results) = body.get("results").and_then(Value::as_array) else {
        return result;
    };

    let mapping: Vec<ObjectKeyMapping> = results
        .iter()
        .filter_map(|one| one.get("objectKey").and_then(Value::as_str))
        .filter_map(|object_key| {
            items
                .iter()
                .find(|item| item.object_key() == Some(object_key))
                .map(|item| ObjectKeyMapping {
                    source_id: item.source_id().to_string(),
                    object_key: object_key.to_string(),
                })
        })
        .collect();

    result.with_object_keys_mapping(mapping)
}
