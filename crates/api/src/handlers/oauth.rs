//! OAuth initiate/callback endpoints

use axum::extract::State;
use axum::Json;
use slotbook_domain::{
    OAuthCallbackRequest, OAuthCallbackResponse, OAuthInitiateRequest, OAuthInitiateResponse,
};

use crate::auth::CurrentOrganizer;
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /integrations/oauth/initiate`
pub async fn initiate(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Json(request): Json<OAuthInitiateRequest>,
) -> Result<Json<OAuthInitiateResponse>, ApiError> {
    let response = state.connect.initiate(&organizer, &request).await?;
    Ok(Json(response))
}

/// `POST /integrations/oauth/callback`
pub async fn callback(
    State(state): State<AppState>,
    CurrentOrganizer(organizer): CurrentOrganizer,
    Json(request): Json<OAuthCallbackRequest>,
) -> Result<Json<OAuthCallbackResponse>, ApiError> {
    let response = state.connect.callback(&organizer, &request).await?;
    Ok(Json(response))
}
