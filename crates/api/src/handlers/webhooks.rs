//! Webhook integration endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use slotbook_domain::{
    NewWebhookIntegration, SlotbookError, SyncJob, SyncJobType, WebhookIntegration,
    WebhookIntegrationUpdate,
};
use uuid::Uuid;

use crate::auth::CurrentOrganizer;
use crate::error::ApiError;
use crate::state::AppState;

/// Webhook integration as exposed over the API. The secret key and static
/// headers are write-only.
#[derive(Debug, Serialize)]
pub struct WebhookIntegrationResponse {
    pub id: Uuid,
    pub name: String,
    pub webhook_url: String,
    pub events: Vec<String>,
    pub is_active: bool,
    pub retry_failed: bool,
    pub max_retries: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WebhookIntegration> for WebhookIntegrationResponse {
    fn from(webhook: WebhookIntegration) -> Self {
        Self {
            id: webhook.id,
            name: webhook.name,
            webhook_url: webhook.webhook_url,
            events: webhook.events,
            is_active: webhook.is_active,
            retry_failed: webhook.retry_failed,
            max_retries: webhook.max_retries,
            created_at: webhook.created_at,
            updated_at: webhook.updated_at,
        }
    }
}

/// `GET /integrations/webhooks`
pub async fn list(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
) -> Result<Json<Vec<WebhookIntegrationResponse>>, ApiError> {
    let webhooks = state.webhooks.list(organizer.id).await?;
    Ok(Json(webhooks.into_iter().map(Into::into).collect()))
}

/// `POST /integrations/webhooks`
pub async fn create(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Json(webhook): Json<NewWebhookIntegration>,
) -> Result<(StatusCode, Json<WebhookIntegrationResponse>), ApiError> {
    if webhook.name.trim().is_empty() {
        return Err(SlotbookError::Validation("name must not be empty".into()).into());
    }
    if !webhook.webhook_url.starts_with("http://") && !webhook.webhook_url.starts_with("https://")
    {
        return Err(
            SlotbookError::Validation("webhook_url must be an HTTP(S) URL".into()).into()
        );
    }

    let created = state.webhooks.create(organizer.id, &webhook).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// `GET /integrations/webhooks/{id}`
pub async fn detail(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
) -> Result<Json<WebhookIntegrationResponse>, ApiError> {
    let webhook = state
        .webhooks
        .find(organizer.id, id)
        .await?
        .ok_or_else(|| SlotbookError::NotFound("Webhook integration not found".into()))?;
    Ok(Json(webhook.into()))
}

/// `PATCH /integrations/webhooks/{id}`
pub async fn update(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
    Json(update): Json<WebhookIntegrationUpdate>,
) -> Result<Json<WebhookIntegrationResponse>, ApiError> {
    let webhook = state.webhooks.update(organizer.id, id, &update).await?;
    Ok(Json(webhook.into()))
}

/// `DELETE /integrations/webhooks/{id}`
pub async fn remove(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.webhooks.delete(organizer.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /integrations/webhooks/{id}/test`
///
/// Enqueues a synthetic delivery for the external worker; the request does
/// not wait for the delivery to happen.
pub async fn test(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let webhook = state
        .webhooks
        .find(organizer.id, id)
        .await?
        .ok_or_else(|| SlotbookError::NotFound("Webhook integration not found".into()))?;

    let job = SyncJob::new(
        SyncJobType::WebhookDelivery,
        serde_json::json!({
            "webhook_id": webhook.id,
            "event": "test_event",
            "data": {
                "timestamp": Utc::now(),
                "test": true,
                "organizer_email": organizer.email,
            },
        }),
    );
    state.jobs.enqueue(&job).await?;

    Ok(Json(serde_json::json!({ "message": "Test webhook sent successfully" })))
}
