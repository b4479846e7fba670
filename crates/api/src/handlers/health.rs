//! Integration health endpoint

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use slotbook_core::build_health_report;
use slotbook_domain::IntegrationHealthReport;

use crate::auth::CurrentOrganizer;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /integrations/health`
pub async fn report(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
) -> Result<Json<IntegrationHealthReport>, ApiError> {
    let calendars = state.calendars.list(organizer.id).await?;
    let videos = state.videos.list(organizer.id).await?;

    Ok(Json(build_health_report(&organizer, Utc::now(), &calendars, &videos)))
}
