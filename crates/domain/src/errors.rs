//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Slotbook
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SlotbookError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provider {0} not supported")]
    UnsupportedProvider(String),

    #[error("Invalid state parameter")]
    InvalidState(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Failed to get user info: {0}")]
    IdentityFetch(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Slotbook operations
pub type Result<T> = std::result::Result<T, SlotbookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_display_is_stable() {
        // The callback handler surfaces this text verbatim; keep it fixed.
        let err = SlotbookError::InvalidState("state mismatch for google/calendar".into());
        assert_eq!(err.to_string(), "Invalid state parameter");
    }

    #[test]
    fn token_exchange_carries_provider_body() {
        let err = SlotbookError::TokenExchange("invalid_grant".into());
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[test]
    fn errors_round_trip_through_serde() {
        let err = SlotbookError::UnsupportedProvider("slack".into());
        let json = serde_json::to_string(&err).expect("serialize");
        assert!(json.contains("UnsupportedProvider"));
        let back: SlotbookError = serde_json::from_str(&json).expect("deserialize");
        assert!(matches!(back, SlotbookError::UnsupportedProvider(p) if p == "slack"));
    }
}
