//! Video conference integration endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use slotbook_domain::{SlotbookError, VideoIntegration, VideoIntegrationSettings};
use uuid::Uuid;

use crate::auth::CurrentOrganizer;
use crate::error::ApiError;
use crate::state::AppState;

/// Video integration as exposed over the API.
#[derive(Debug, Serialize)]
pub struct VideoIntegrationResponse {
    pub id: Uuid,
    pub provider: String,
    pub provider_display: String,
    pub provider_email: String,
    pub api_calls_today: i64,
    pub is_active: bool,
    pub auto_generate_links: bool,
    pub is_token_expired: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VideoIntegration> for VideoIntegrationResponse {
    fn from(integration: VideoIntegration) -> Self {
        let is_token_expired = integration.is_token_expired(Utc::now());
        Self {
            id: integration.id,
            provider_display: integration.provider_display().to_string(),
            provider: integration.provider,
            provider_email: integration.provider_email,
            api_calls_today: integration.api_calls_today,
            is_active: integration.is_active,
            auto_generate_links: integration.auto_generate_links,
            is_token_expired,
            created_at: integration.created_at,
            updated_at: integration.updated_at,
        }
    }
}

/// `GET /integrations/video`
pub async fn list(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
) -> Result<Json<Vec<VideoIntegrationResponse>>, ApiError> {
    let integrations = state.videos.list(organizer.id).await?;
    Ok(Json(integrations.into_iter().map(Into::into).collect()))
}

/// `GET /integrations/video/{id}`
pub async fn detail(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
) -> Result<Json<VideoIntegrationResponse>, ApiError> {
    let integration = state
        .videos
        .find(organizer.id, id)
        .await?
        .ok_or_else(|| SlotbookError::NotFound("Video integration not found".into()))?;
    Ok(Json(integration.into()))
}

/// `PATCH /integrations/video/{id}`
pub async fn update(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
    Json(settings): Json<VideoIntegrationSettings>,
) -> Result<Json<VideoIntegrationResponse>, ApiError> {
    let integration = state.videos.update_settings(organizer.id, id, &settings).await?;
    Ok(Json(integration.into()))
}

/// `DELETE /integrations/video/{id}`
pub async fn remove(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.videos.delete(organizer.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
