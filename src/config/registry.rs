//! Process-wide registry of named configurations, one namespace per family.
//!
//! Constructed once at startup and injected into every component that needs
//! it; there is no ambient singleton. Mutations are atomic with respect to
//! concurrent resolution.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::descriptor::{ServiceConfiguration, CONFIG_DEFAULT};
use crate::error::{Error, Result};
use crate::family::ServiceFamily;

#[derive(Debug, Default)]
pub struct ConfigRegistry {
    inner: RwLock<HashMap<(ServiceFamily, String), Arc<ServiceConfiguration>>>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank/empty names map to the literal `"default"` key.
    pub fn resolve_name(name: &str) -> &str {
        if name.trim().is_empty() {
            CONFIG_DEFAULT
        } else {
            name
        }
    }

    /// Registers a configuration under its own name for `family`, replacing
    /// any existing one (last write wins). Missing fields are logged once
    /// here; registration itself never fails.
    pub async fn register(&self, family: ServiceFamily, config: ServiceConfiguration) {
        config.log_missing_fields(family);
        let key = (family, config.name.clone());
        let mut map = self.inner.write().await;
        map.insert(key, Arc::new(config));
    }

    pub async fn unregister(&self, family: ServiceFamily, name: &str) {
        let key = (family, Self::resolve_name(name).to_string());
        let mut map = self.inner.write().await;
        map.remove(&key);
    }

    /// Resolves a configuration name (blank means `"default"`). Signals
    /// [`Error::MissingConfiguration`] rather than returning a
    /// partially-populated default.
    pub async fn resolve(
        &self,
        family: ServiceFamily,
        name: &str,
    ) -> Result<Arc<ServiceConfiguration>> {
        let resolved = Self::resolve_name(name);
        let map = self.inner.read().await;
        map.get(&(family, resolved.to_string()))
            .cloned()
            .ok_or_else(|| Error::MissingConfiguration {
                family,
                name: resolved.to_string(),
            })
    }

    /// Registered configuration names for a family, for introspection.
    pub async fn names(&self, family: ServiceFamily) -> Vec<String> {
        let map = self.inner.read().await;
        let mut names: Vec<String> = map
            .keys()
            .filter(|(f, _)| *f == family)
            .map(|(_, n)| n.clone())
            .collect();
        names.sort();
        names
    }

    /// Field validation without registration. Never fails.
    pub fn validate(family: ServiceFamily, config: &ServiceConfiguration) -> Vec<&'static str> {
        config.missing_fields(family)
    }
}
