//! API error responses
//!
//! Wraps the domain error taxonomy and maps each category onto an HTTP
//! status. Provider failures from the OAuth callback keep the provider's
//! raw error text in the response body; storage and configuration errors
//! are logged and collapsed to a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use slotbook_domain::SlotbookError;

/// Error type returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub SlotbookError);

impl From<SlotbookError> for ApiError {
    fn from(value: SlotbookError) -> Self {
        ApiError(value)
    }
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            SlotbookError::Validation(_)
            | SlotbookError::UnsupportedProvider(_)
            | SlotbookError::InvalidState(_) => StatusCode::BAD_REQUEST,
            SlotbookError::Auth(_) => StatusCode::UNAUTHORIZED,
            SlotbookError::NotFound(_) => StatusCode::NOT_FOUND,
            SlotbookError::TokenExchange(_)
            | SlotbookError::IdentityFetch(_)
            | SlotbookError::Database(_)
            | SlotbookError::Network(_)
            | SlotbookError::Config(_)
            | SlotbookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self.0 {
            SlotbookError::TokenExchange(_) | SlotbookError::IdentityFetch(_) => {
                tracing::warn!(error = %self.0, "provider call failed during OAuth flow");
                format!("Failed to complete OAuth flow: {}", self.0)
            }
            SlotbookError::Database(inner)
            | SlotbookError::Network(inner)
            | SlotbookError::Config(inner)
            | SlotbookError::Internal(inner) => {
                tracing::error!(error = %inner, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        let cases = [
            (SlotbookError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (SlotbookError::UnsupportedProvider("slack".into()), StatusCode::BAD_REQUEST),
            (SlotbookError::InvalidState("s".into()), StatusCode::BAD_REQUEST),
            (SlotbookError::Auth("a".into()), StatusCode::UNAUTHORIZED),
            (SlotbookError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (SlotbookError::TokenExchange("t".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (SlotbookError::IdentityFetch("i".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (SlotbookError::Database("d".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).status_code(), expected);
        }
    }
}
