//! OAuth2 client-credentials token fetching and caching.
//!
//! One cached token per (service family, configuration name). Refresh is
//! exclusive per key: concurrent callers hitting an expired key serialize on
//! the key's slot, exactly one of them fires the outbound token request, and
//! all of them observe the resulting token (or the resulting failure).

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error};

use crate::auth::token::BearerToken;
use crate::config::ServiceConfiguration;
use crate::family::ServiceFamily;

/// Appended to `auth_base_url` for the token request.
pub const AUTH_ENDPOINT: &str = "/connect/token";

const EXPIRES_IN_DEFAULT: u64 = 3600;

type SlotKey = (ServiceFamily, String);
type TokenSlot = Arc<Mutex<Option<BearerToken>>>;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Debug)]
pub struct TokenManager {
    client: Client,
    slots: RwLock<HashMap<SlotKey, TokenSlot>>,
}

impl Default for TokenManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenManager {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a bearer token for the (family, configuration) pair, fetching
    /// or refreshing it when needed. Returns an empty string when the token
    /// endpoint is unreachable or yields no usable token — callers must
    /// check for blankness and fail the outer operation before issuing an
    /// unauthenticated request.
    pub async fn bearer(&self, family: ServiceFamily, config: &ServiceConfiguration) -> String {
        let slot = self.slot(family, &config.name).await;
        let mut cached = slot.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh() {
                return token.value.clone();
            }
        }

        // The slot lock is held across the fetch: late arrivals wait here
        // and then take the cached result of the single outbound request.
        match self.fetch_token(family, config).await {
            Ok(token) => {
                debug!(
                    family = %family,
                    config = %config.name,
                    expires_at = token.expires_at,
                    "token refreshed"
                );
                let value = token.value.clone();
                *cached = Some(token);
                value
            }
            Err(message) => {
                error!(
                    family = %family,
                    config = %config.name,
                    "token request failed: {message}"
                );
                *cached = None;
                String::new()
            }
        }
    }

    async fn slot(&self, family: ServiceFamily, config_name: &str) -> TokenSlot {
        let key = (family, config_name.to_string());
        {
            let slots = self.slots.read().await;
            if let Some(slot) = slots.get(&key) {
                return slot.clone();
            }
        }
        let mut slots = self.slots.write().await;
        slots.entry(key).or_default().clone()
    }

    async fn fetch_token(
        &self,
        family: ServiceFamily,
        config: &ServiceConfiguration,
    ) -> std::result::Result<BearerToken, String> {
        let url = format!(
            "{}{}",
            config.auth_base_url.trim_end_matches('/'),
            AUTH_ENDPOINT
        );

        let mut form: Vec<(&str, &str)> = vec![
            ("grant_type", config.token_grant_type.as_str()),
            ("scope", config.token_scope.as_str()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ];
        if family.requires_environment() {
            form.push(("environment", config.environment()));
        }

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("token endpoint returned {}", response.status()));
        }

        let parsed: TokenResponse = response.json().await.map_err(|e| e.to_string())?;
        let value = parsed
            .access_token
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| "no access_token in token response".to_string())?;
        let expires_in = parsed.expires_in.unwrap_or(EXPIRES_IN_DEFAULT);

        Ok(BearerToken::new(value, expires_in))
    }
}
