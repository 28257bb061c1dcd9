//! Shared call path for every service family: resolve the named
//! configuration, obtain a bearer token, merge headers and dispatch the
//! verb. Constructed once and injected into the per-family services — no
//! ambient singletons.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::auth::TokenManager;
use crate::config::{ConfigRegistry, ServiceConfiguration};
use crate::error::{Error, Result};
use crate::family::ServiceFamily;
use crate::http::{merge_headers, CallResult, HttpInvoker, HttpMethod};
use crate::poll::PollSettings;

#[derive(Debug)]
pub struct ServiceCore {
    registry: Arc<ConfigRegistry>,
    tokens: Arc<TokenManager>,
    invoker: HttpInvoker,
    poll_settings: PollSettings,
    cancel: CancellationToken,
}

impl ServiceCore {
    pub fn new(registry: Arc<ConfigRegistry>, tokens: Arc<TokenManager>) -> Self {
        Self {
            registry,
            tokens,
            invoker: HttpInvoker::new(),
            poll_settings: PollSettings::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_poll_settings(mut self, settings: PollSettings) -> Self {
        self.poll_settings = settings;
        self
    }

    /// Cancelling this token aborts any in-flight poll sleep early; the
    /// poll then returns its last observed result.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    pub fn invoker(&self) -> &HttpInvoker {
        &self.invoker
    }

    pub fn poll_settings(&self) -> &PollSettings {
        &self.poll_settings
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub async fn config(
        &self,
        family: ServiceFamily,
        config_name: &str,
    ) -> Result<Arc<ServiceConfiguration>> {
        self.registry.resolve(family, config_name).await
    }

    /// Bearer token for the resolved configuration. A blank token means no
    /// authentication is available; that fails the operation here, before
    /// any service call goes out.
    pub async fn bearer(
        &self,
        family: ServiceFamily,
        config: &ServiceConfiguration,
    ) -> Result<String> {
        let bearer = self.tokens.bearer(family, config).await;
        if bearer.is_empty() {
            return Err(Error::Authentication {
                family,
                name: config.name.clone(),
            });
        }
        Ok(bearer)
    }

    /// Generic invocation with a verb given as text, as collaborators
    /// supply it. Verbs other than GET/POST/PUT fail before any network
    /// call.
    pub async fn invoke(
        &self,
        family: ServiceFamily,
        config_name: &str,
        method: &str,
        endpoint: &str,
        payload: Option<&str>,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<CallResult> {
        let method: HttpMethod = method.parse()?;
        self.invoke_method(family, config_name, method, endpoint, payload, extra_headers)
            .await
    }

    pub async fn invoke_method(
        &self,
        family: ServiceFamily,
        config_name: &str,
        method: HttpMethod,
        endpoint: &str,
        payload: Option<&str>,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<CallResult> {
        let config = self.config(family, config_name).await?;
        let bearer = self.bearer(family, &config).await?;

        let url = join_url(&config.service_base_url, endpoint);
        let headers = merge_headers(
            family.base_headers(&config, &bearer, endpoint),
            extra_headers,
        );

        Ok(self.invoker.invoke(method, &url, &headers, payload).await)
    }
}

/// Joins a base URL and an endpoint with exactly one slash between them.
pub(crate) fn join_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{base}{endpoint}")
    } else {
        format!("{base}/{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_join_normalizes_slashes() {
        assert_eq!(join_url("http://a/", "/b"), "http://a/b");
        assert_eq!(join_url("http://a", "b"), "http://a/b");
        assert_eq!(join_url("http://a", "/b"), "http://a/b");
        assert_eq!(join_url("http://a/", "b"), "http://a/b");
    }
}
