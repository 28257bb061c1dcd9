//! Ingestion (Content Lake) lookup: check whether a digest is already
//! ingested for a given source/document.

use std::sync::Arc;

use tracing::error;

use crate::error::Result;
use crate::family::ServiceFamily;
use crate::http::CallResult;
use crate::services::core::ServiceCore;

const ENDPOINT_CHECK_DIGEST: &str = "/v1/check-digest";

#[derive(Debug, Clone)]
pub struct IngestionService {
    core: Arc<ServiceCore>,
    default_source_id: Option<String>,
}

impl IngestionService {
    pub fn new(core: Arc<ServiceCore>) -> Self {
        Self {
            core,
            default_source_id: None,
        }
    }

    pub fn with_default_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.default_source_id = Some(source_id.into());
        self
    }

    /// Missing source id is a per-call precondition failure in the result
    /// envelope, not an error — batch callers keep going.
    pub async fn check_digest(
        &self,
        config_name: &str,
        source_id: Option<&str>,
        doc_id: &str,
        digest: &str,
    ) -> Result<CallResult> {
        let source_id = match source_id
            .filter(|s| !s.trim().is_empty())
            .or(self.default_source_id.as_deref())
        {
            Some(source_id) => source_id,
            None => {
                error!("No sourceId available for the check-digest call");
                return Ok(CallResult::precondition_failure("No sourceId available"));
            }
        };
        if digest.trim().is_empty() {
            error!(doc_id, "No digest to check");
            return Ok(CallResult::precondition_failure(format!(
                "No digest for document {doc_id}"
            )));
        }

        let endpoint = format!(
            "{ENDPOINT_CHECK_DIGEST}/{source_id}/{doc_id}?digest={digest}&useContentLake=true"
        );
        self.core
            .invoke(ServiceFamily::Ingestion, config_name, "GET", &endpoint, None, None)
            .await
    }
}
