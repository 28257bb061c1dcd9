//! Bearer token with its computed absolute expiration.

use crate::helpers::time::now_u64;

/// Tokens are refreshed this many seconds before their actual expiry so a
/// call never goes out with a token about to lapse mid-flight.
pub const SAFETY_MARGIN_SECONDS: u64 = 20;

#[derive(Debug, Clone)]
pub struct BearerToken {
    pub value: String,
    /// UNIX seconds.
    pub expires_at: u64,
}

impl BearerToken {
    pub fn new(value: String, expires_in_seconds: u64) -> Self {
        Self {
            value,
            expires_at: now_u64() + expires_in_seconds,
        }
    }

    /// A token is never handed to a caller past its expiry, and a blank
    /// value means "no authentication available".
    pub fn is_fresh(&self) -> bool {
        !self.value.is_empty() && now_u64() + SAFETY_MARGIN_SECONDS < self.expires_at
    }
}
