//! Named tenant/environment configuration for one service family.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::family::ServiceFamily;

/// Conventional fallback key: a blank configuration name resolves to this.
pub const CONFIG_DEFAULT: &str = "default";

/// One named tenant/environment profile for one service family.
///
/// A configuration is read-only after construction. It may be registered
/// with missing fields — each missing field is logged once at registration
/// time, and calls made with it fail at the HTTP layer instead of at
/// resolution time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfiguration {
    pub name: String,
    #[serde(default)]
    pub auth_base_url: String,
    #[serde(default)]
    pub service_base_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub token_grant_type: String,
    #[serde(default)]
    pub token_scope: String,
    /// Required by Discovery and Ingestion, unused by the other families.
    #[serde(default)]
    pub environment: Option<String>,
}

impl ServiceConfiguration {
    pub fn environment(&self) -> &str {
        self.environment.as_deref().unwrap_or_default()
    }

    /// Names of the required fields that are blank. `environment` counts
    /// only for families that require it. Never fails; used both at
    /// registration time (to log warnings) and for introspection.
    pub fn missing_fields(&self, family: ServiceFamily) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.auth_base_url.trim().is_empty() {
            missing.push("authBaseUrl");
        }
        if self.service_base_url.trim().is_empty() {
            missing.push("serviceBaseUrl");
        }
        if self.token_grant_type.trim().is_empty() {
            missing.push("tokenGrantType");
        }
        if self.token_scope.trim().is_empty() {
            missing.push("tokenScope");
        }
        if self.client_id.trim().is_empty() {
            missing.push("clientId");
        }
        if self.client_secret.trim().is_empty() {
            missing.push("clientSecret");
        }
        if family.requires_environment() && self.environment().trim().is_empty() {
            missing.push("environment");
        }
        missing
    }

    pub fn has_all_values(&self, family: ServiceFamily) -> bool {
        self.missing_fields(family).is_empty()
    }

    /// One warning per missing field. Calls made with an incomplete
    /// configuration still go out and fail at the HTTP layer.
    pub(crate) fn log_missing_fields(&self, family: ServiceFamily) {
        for field in self.missing_fields(family) {
            warn!(
                "No {} {} provided for configuration '{}', calls to the service will fail.",
                family.label(),
                field,
                self.name
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_blank_required_fields() {
        let cfg = ServiceConfiguration {
            name: "default".into(),
            auth_base_url: "https://auth.example.com".into(),
            service_base_url: "  ".into(),
            client_id: "id".into(),
            client_secret: String::new(),
            token_grant_type: "client_credentials".into(),
            token_scope: "environment_authorization".into(),
            environment: None,
        };

        let missing = cfg.missing_fields(ServiceFamily::Enrichment);
        assert_eq!(missing, vec!["serviceBaseUrl", "clientSecret"]);

        // Same configuration for a family that needs an environment tag.
        let missing = cfg.missing_fields(ServiceFamily::Discovery);
        assert!(missing.contains(&"environment"));
    }

    #[test]
    fn complete_configuration_validates() {
        let cfg = ServiceConfiguration {
            name: "default".into(),
            auth_base_url: "https://auth.example.com".into(),
            service_base_url: "https://ke.example.com".into(),
            client_id: "id".into(),
            client_secret: "secret".into(),
            token_grant_type: "client_credentials".into(),
            token_scope: "environment_authorization".into(),
            environment: Some("prod".into()),
        };
        for family in ServiceFamily::ALL {
            assert!(cfg.has_all_values(family), "{family} should validate");
        }
    }
}
