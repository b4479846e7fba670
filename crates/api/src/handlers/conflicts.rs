//! Calendar conflict analysis endpoint

use axum::extract::State;
use axum::Json;
use slotbook_core::detect_conflicts;
use slotbook_domain::{BusyBlockSource, ConflictReport};

use crate::auth::CurrentOrganizer;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /integrations/calendar/conflicts`
///
/// Compares the organizer's active synced busy blocks against manually
/// entered ones and reports overlapping pairs.
pub async fn calendar_conflicts(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
) -> Result<Json<ConflictReport>, ApiError> {
    let manual = state
        .busy_blocks
        .active_by_sources(organizer.id, &[BusyBlockSource::Manual])
        .await?;
    let synced = state
        .busy_blocks
        .active_by_sources(organizer.id, &BusyBlockSource::SYNCED)
        .await?;

    Ok(Json(detect_conflicts(organizer.id, &synced, &manual)))
}
