//! Authentication domain types
//!
//! Token pairs and the keys they are stored under, credential payloads
//! for the account endpoints, and the error raised when a token refresh
//! cannot produce a new access token.

mod error;
mod types;

pub use error::RefreshError;
pub use types::{LoginRequest, RegisterRequest, TokenKey, TokenPair, bearer};
