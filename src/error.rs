//! Error taxonomy for the client core.
//!
//! Only programming/deployment faults surface as `Err`: an unresolvable
//! configuration name, a token endpoint that yielded no usable token, an
//! unsupported HTTP verb, or a malformed job handle. Transport failures and
//! non-2xx responses are encoded in [`crate::http::CallResult`] so that
//! batch/partial-failure flows can continue past individual failures.

use thiserror::Error;

use crate::family::ServiceFamily;

#[derive(Debug, Error)]
pub enum Error {
    /// No configuration registered under the resolved name.
    #[error("No '{name}' configuration registered for the {family} service")]
    MissingConfiguration { family: ServiceFamily, name: String },

    /// A required field or argument is missing.
    #[error("{0}")]
    Configuration(String),

    /// The token endpoint was unreachable or returned no usable token.
    #[error("No authentication info for calling the {family} service, for configuration '{name}'")]
    Authentication { family: ServiceFamily, name: String },

    /// Verb other than GET, POST or PUT requested.
    #[error("Only GET, POST and PUT are supported, got '{0}'")]
    UnsupportedMethod(String),

    /// A job id, question id or presigned URL expected from a submit
    /// response is blank or absent.
    #[error("Invalid job handle: {0}")]
    InvalidJobHandle(String),
}

pub type Result<T> = std::result::Result<T, Error>;
