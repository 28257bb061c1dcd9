//! Service families sharing the client core.
//!
//! Each family keeps independent configurations, tokens and payload shapes;
//! what varies at the HTTP layer is only the fixed header set computed here.

use std::collections::HashMap;
use std::fmt;

use crate::config::ServiceConfiguration;

/// One of the distinct remote APIs reached through this client core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceFamily {
    Enrichment,
    DataCuration,
    Discovery,
    Agents,
    Ingestion,
}

impl ServiceFamily {
    pub const ALL: [ServiceFamily; 5] = [
        ServiceFamily::Enrichment,
        ServiceFamily::DataCuration,
        ServiceFamily::Discovery,
        ServiceFamily::Agents,
        ServiceFamily::Ingestion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceFamily::Enrichment => "Knowledge Enrichment",
            ServiceFamily::DataCuration => "Data Curation",
            ServiceFamily::Discovery => "Knowledge Discovery",
            ServiceFamily::Agents => "Agents Builder",
            ServiceFamily::Ingestion => "Content Lake",
        }
    }

    /// Discovery and Ingestion send an environment discriminator with every
    /// call (and with the token request); the other families have no use
    /// for one.
    pub fn requires_environment(&self) -> bool {
        matches!(self, ServiceFamily::Discovery | ServiceFamily::Ingestion)
    }

    /// Fixed base header set for a call against `endpoint`. Caller-supplied
    /// extra headers are applied on top of these and may override any of
    /// them, including `Authorization`.
    pub fn base_headers(
        &self,
        config: &ServiceConfiguration,
        bearer: &str,
        endpoint: &str,
    ) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "*/*".to_string());
        headers.insert("Authorization".to_string(), format!("Bearer {bearer}"));

        match self {
            ServiceFamily::Enrichment => {
                // Upload steps must not force a JSON content type.
                if endpoint.starts_with("/api/content/process") {
                    headers.insert("Content-Type".to_string(), "application/json".to_string());
                }
            }
            ServiceFamily::DataCuration => {}
            ServiceFamily::Discovery => {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
                headers.insert("Hxp-Environment".to_string(), config.environment().to_string());
                headers.insert("Hxp-App".to_string(), "hxai-discovery".to_string());
            }
            ServiceFamily::Agents => {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
            }
            ServiceFamily::Ingestion => {
                headers.insert("hxp-Environment".to_string(), config.environment().to_string());
            }
        }

        headers
    }
}

impl fmt::Display for ServiceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
