//! Knowledge Discovery: agent listing and the Q&A workflow — ask a
//! question (202 + questionId), then poll for a non-blank answer.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::family::ServiceFamily;
use crate::http::CallResult;
use crate::poll::{poll_until_terminal, PollCheck};
use crate::services::core::ServiceCore;

#[derive(Debug, Clone)]
pub struct DiscoveryService {
    core: Arc<ServiceCore>,
    default_agent_id: Option<String>,
}

impl DiscoveryService {
    pub fn new(core: Arc<ServiceCore>) -> Self {
        Self {
            core,
            default_agent_id: None,
        }
    }

    /// Agent used when `ask_question` gets no agent id.
    pub fn with_default_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.default_agent_id = Some(agent_id.into());
        self
    }

    pub async fn invoke(
        &self,
        config_name: &str,
        method: &str,
        endpoint: &str,
        payload: Option<&str>,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<CallResult> {
        self.core
            .invoke(
                ServiceFamily::Discovery,
                config_name,
                method,
                endpoint,
                payload,
                extra_headers,
            )
            .await
    }

    pub async fn get_all_agents(
        &self,
        config_name: &str,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<CallResult> {
        self.invoke(config_name, "GET", "/agent/agents", None, extra_headers)
            .await
    }

    /// Submits a question to an agent. A 202 response carries the
    /// `questionId` to poll with.
    pub async fn ask_question(
        &self,
        config_name: &str,
        agent_id: Option<&str>,
        question: &str,
        context_object_ids: &[String],
        extra_payload: Option<&Value>,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<CallResult> {
        let agent_id = agent_id
            .filter(|a| !a.trim().is_empty())
            .or(self.default_agent_id.as_deref())
            .ok_or_else(|| Error::Configuration("No agentId".into()))?;

        let mut payload = json!({
            "question": question,
            "contextObjectIds": context_object_ids,
        });
        if let (Some(merged), Some(Value::Object(extra))) =
            (payload.as_object_mut(), extra_payload)
        {
            for (key, value) in extra {
                merged.insert(key.clone(), value.clone());
            }
        }

        self.invoke(
            config_name,
            "POST",
            &format!("/agent/agents/{agent_id}/questions"),
            Some(&payload.to_string()),
            extra_headers,
        )
        .await
    }

    /// Polls the answer endpoint. Asked too quickly, the service can return
    /// a 200 with a null answer; that counts as "not terminal yet".
    pub async fn get_answer(
        &self,
        config_name: &str,
        question_id: &str,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<CallResult> {
        let endpoint = format!("/qna/questions/{question_id}/answer");
        poll_until_terminal(
            self.core.poll_settings(),
            self.core.cancellation(),
            "Discovery answer",
            || self.invoke(config_name, "GET", &endpoint, None, extra_headers),
            |result| {
                if !result.is_ok() {
                    return PollCheck::Pending;
                }
                let answered = result
                    .json_str_field("answer")
                    .map(|a| !a.trim().is_empty())
                    .unwrap_or(false);
                if answered {
                    PollCheck::Terminal
                } else {
                    PollCheck::Pending
                }
            },
        )
        .await
    }

    /// Submit-then-poll in one call. Anything but a 202 from the submit
    /// step comes back unchanged for the caller to inspect.
    pub async fn ask_question_and_get_answer(
        &self,
        config_name: &str,
        agent_id: Option<&str>,
        question: &str,
        context_object_ids: &[String],
        extra_payload: Option<&Value>,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<CallResult> {
        let submitted = self
            .ask_question(
                config_name,
                agent_id,
                question,
                context_object_ids,
                extra_payload,
                extra_headers,
            )
            .await?;
        if !submitted.is_accepted() {
            return Ok(submitted);
        }

        let question_id = submitted
            .json_str_field("questionId")
            .ok_or_else(|| Error::InvalidJobHandle("no questionId in submit response".into()))?;

        self.get_answer(config_name, &question_id, extra_headers).await
    }
}
