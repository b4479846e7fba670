//! Bearer-token authentication extractor

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use slotbook_domain::{Organizer, SlotbookError};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated organizer, resolved from `Authorization: Bearer`.
///
/// Every endpoint requires this extractor; all queries are scoped to the
/// resolved organizer's records.
pub struct CurrentOrganizer(pub Organizer);

impl FromRequestParts<AppState> for CurrentOrganizer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError(SlotbookError::Auth("missing Authorization header".into()))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError(SlotbookError::Auth("Authorization header must be a bearer token".into()))
        })?;

        let organizer = state
            .organizers
            .find_by_api_token(token)
            .await?
            .ok_or_else(|| ApiError(SlotbookError::Auth("invalid bearer token".into())))?;

        Ok(CurrentOrganizer(organizer))
    }
}
