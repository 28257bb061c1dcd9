pub mod manager;
pub mod token;

pub use manager::TokenManager;
pub use token::{BearerToken, SAFETY_MARGIN_SECONDS};
