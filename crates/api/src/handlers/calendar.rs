//! Calendar integration endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use slotbook_domain::{
    CalendarIntegration, CalendarIntegrationSettings, SlotbookError, SyncJob, SyncJobType,
};
use uuid::Uuid;

use crate::auth::CurrentOrganizer;
use crate::error::ApiError;
use crate::state::AppState;

/// Calendar integration as exposed over the API. Token material stays
/// server-side.
#[derive(Debug, Serialize)]
pub struct CalendarIntegrationResponse {
    pub id: Uuid,
    pub provider: String,
    pub provider_display: String,
    pub provider_email: String,
    pub calendar_id: String,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub sync_errors: i64,
    pub is_active: bool,
    pub sync_enabled: bool,
    pub is_token_expired: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CalendarIntegration> for CalendarIntegrationResponse {
    fn from(integration: CalendarIntegration) -> Self {
        let is_token_expired = integration.is_token_expired(Utc::now());
        Self {
            id: integration.id,
            provider_display: integration.provider_display().to_string(),
            provider: integration.provider,
            provider_email: integration.provider_email,
            calendar_id: integration.calendar_id,
            last_sync_at: integration.last_sync_at,
            sync_errors: integration.sync_errors,
            is_active: integration.is_active,
            sync_enabled: integration.sync_enabled,
            is_token_expired,
            created_at: integration.created_at,
            updated_at: integration.updated_at,
        }
    }
}

/// `GET /integrations/calendar`
pub async fn list(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
) -> Result<Json<Vec<CalendarIntegrationResponse>>, ApiError> {
    let integrations = state.calendars.list(organizer.id).await?;
    Ok(Json(integrations.into_iter().map(Into::into).collect()))
}

/// `GET /integrations/calendar/{id}`
pub async fn detail(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
) -> Result<Json<CalendarIntegrationResponse>, ApiError> {
    let integration = state
        .calendars
        .find(organizer.id, id)
        .await?
        .ok_or_else(|| SlotbookError::NotFound("Calendar integration not found".into()))?;
    Ok(Json(integration.into()))
}

/// `PATCH /integrations/calendar/{id}`
pub async fn update(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
    Json(settings): Json<CalendarIntegrationSettings>,
) -> Result<Json<CalendarIntegrationResponse>, ApiError> {
    let integration = state.calendars.update_settings(organizer.id, id, &settings).await?;
    Ok(Json(integration.into()))
}

/// `DELETE /integrations/calendar/{id}`
pub async fn remove(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.calendars.delete(organizer.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /integrations/calendar/{id}/refresh`
pub async fn refresh_sync(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    enqueue_sync(&state, &organizer.id, id, false).await?;
    Ok(Json(serde_json::json!({ "message": "Calendar sync refresh initiated" })))
}

/// `POST /integrations/calendar/{id}/force-sync`
pub async fn force_sync(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    enqueue_sync(&state, &organizer.id, id, true).await?;
    Ok(Json(serde_json::json!({ "message": "Force calendar sync initiated" })))
}

/// Hand a sync job to the external worker queue. The request does not wait
/// for, or observe, the outcome.
async fn enqueue_sync(
    state: &AppState,
    organizer_id: &Uuid,
    id: Uuid,
    forced: bool,
) -> Result<(), ApiError> {
    let integration = state
        .calendars
        .find(*organizer_id, id)
        .await?
        .ok_or_else(|| SlotbookError::NotFound("Calendar integration not found".into()))?;

    let job = SyncJob::new(
        SyncJobType::CalendarSync,
        serde_json::json!({
            "integration_id": integration.id,
            "organizer_id": organizer_id,
            "provider": integration.provider,
            "forced": forced,
        }),
    );
    state.jobs.enqueue(&job).await?;

    Ok(())
}
