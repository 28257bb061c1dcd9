//! # Content Intelligence Client Core
//!
//! Shared client layer for a family of remote content-processing services
//! (enrichment, data curation, discovery/Q&A, agents, ingestion lookup).
//! All families authenticate with OAuth2 client-credentials bearer tokens,
//! answer through a uniform call/response envelope, and run their long
//! operations through a submit-then-poll protocol.
//!
//! Modules:
//! - `config` — named tenant configurations and the registry resolving them
//! - `auth` — bearer token fetching, caching and refresh
//! - `http` — the generic GET/POST/PUT wrapper and the `CallResult` envelope
//! - `poll` — the bounded status-polling primitive
//! - `services` — per-family front-ends (enrichment, curation, discovery, agents, ingestion)

pub mod auth;
pub mod config;
pub mod error;
pub mod family;
pub mod helpers;
pub mod http;
pub mod poll;
pub mod services;

#[cfg(test)]
pub mod tests;

pub use crate::auth::TokenManager;
pub use crate::config::{ConfigRegistry, ServiceConfiguration, CONFIG_DEFAULT};
pub use crate::error::{Error, Result};
pub use crate::family::ServiceFamily;
pub use crate::http::{CallResult, HttpInvoker, HttpMethod, ObjectKeyMapping};
pub use crate::poll::PollSettings;
pub use crate::services::ServiceCore;
