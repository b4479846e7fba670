//! Integration activity log endpoints

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_domain::{IntegrationLog, LogFilter};
use uuid::Uuid;

use crate::auth::CurrentOrganizer;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters of the log listing.
#[derive(Debug, Default, Deserialize)]
pub struct LogListQuery {
    pub log_type: Option<String>,
    pub integration_type: Option<String>,
    /// String-valued flag: `"true"` (any casing) filters to successes,
    /// any other value filters to failures.
    pub success: Option<String>,
}

/// Log entry as exposed over the API.
#[derive(Debug, Serialize)]
pub struct IntegrationLogResponse {
    pub id: Uuid,
    pub log_type: String,
    pub log_type_display: String,
    pub integration_type: String,
    pub booking_id: Option<Uuid>,
    pub message: String,
    pub details: serde_json::Value,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}

impl From<IntegrationLog> for IntegrationLogResponse {
    fn from(log: IntegrationLog) -> Self {
        Self {
            id: log.id,
            log_type: log.log_type.to_string(),
            log_type_display: log.log_type.display().to_string(),
            integration_type: log.integration_type,
            booking_id: log.booking_id,
            message: log.message,
            details: log.details,
            success: log.success,
            created_at: log.created_at,
        }
    }
}

/// `GET /integrations/logs`
pub async fn list(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Query(query): Query<LogListQuery>,
) -> Result<Json<Vec<IntegrationLogResponse>>, ApiError> {
    let filter = LogFilter {
        log_type: query.log_type,
        integration_type: query.integration_type,
        success: query.success.map(|value| value.eq_ignore_ascii_case("true")),
    };

    let logs = state.logs.list(organizer.id, &filter).await?;
    Ok(Json(logs.into_iter().map(Into::into).collect()))
}
