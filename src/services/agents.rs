//! Agents Builder: agent listing, version lookup and task invocation.
//! Synchronous calls only; no poll loop in this family.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::family::ServiceFamily;
use crate::http::CallResult;
use crate::services::core::ServiceCore;

const VERSION_LATEST: &str = "latest";

#[derive(Debug, Clone)]
pub struct AgentsService {
    core: Arc<ServiceCore>,
}

impl AgentsService {
    pub fn new(core: Arc<ServiceCore>) -> Self {
        Self { core }
    }

    pub async fn get_all_agents(
        &self,
        config_name: &str,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<CallResult> {
        self.core
            .invoke(
                ServiceFamily::Agents,
                config_name,
                "GET",
                "/v1/agents",
                None,
                extra_headers,
            )
            .await
    }

    /// Blank version means `"latest"`.
    pub async fn lookup_agent(
        &self,
        config_name: &str,
        agent_id: &str,
        version_id: Option<&str>,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<CallResult> {
        let version = version_or_latest(version_id);
        self.core
            .invoke(
                ServiceFamily::Agents,
                config_name,
                "GET",
                &format!("/v1/agents/{agent_id}/versions/{version}"),
                None,
                extra_headers,
            )
            .await
    }

    pub async fn invoke_task(
        &self,
        config_name: &str,
        agent_id: &str,
        version_id: Option<&str>,
        payload_json: &str,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<CallResult> {
        let version = version_or_latest(version_id);
        self.core
            .invoke(
                ServiceFamily::Agents,
                config_name,
                "POST",
                &format!("/v1/agents/{agent_id}/versions/{version}/invoke-task"),
                Some(payload_json),
                extra_headers,
            )
            .await
    }
}

fn version_or_latest(version_id: Option<&str>) -> &str {
    version_id
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(VERSION_LATEST)
}
