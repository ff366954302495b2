//! Session Routes - Start and stop the periodic tick for a buddy
//!
//! A client activates its buddy when it signs in and deactivates it on
//! sign-out, so only buddies somebody is looking at keep ticking.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use super::{error_response, ApiError};
use crate::models::SessionResponse;
use crate::AppState;

/// Activate the buddy: forced update now, then a tick every interval
#[utoipa::path(
    post,
    path = "/buddy/{id}/session",
    params(("id" = Uuid, Path, description = "Buddy ID")),
    responses(
        (status = 200, description = "Ticker running", body = SessionResponse),
        (status = 404, description = "Buddy not found")
    ),
    tag = "Session"
)]
pub async fn start_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    state.vitals.get(id).await.map_err(error_response)?;
    state.ticker.start(id);

    Ok(Json(SessionResponse {
        buddy_id: id,
        ticking: state.ticker.is_running(id),
    }))
}

/// Deactivate the buddy's ticker
#[utoipa::path(
    delete,
    path = "/buddy/{id}/session",
    params(("id" = Uuid, Path, description = "Buddy ID")),
    responses(
        (status = 200, description = "Ticker stopped", body = SessionResponse)
    ),
    tag = "Session"
)]
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<SessionResponse> {
    state.ticker.stop(id).await;

    Json(SessionResponse {
        buddy_id: id,
        ticking: false,
    })
}

/// Create Session router
pub fn router() -> Router<AppState> {
    Router::new().route("/buddy/:id/session", post(start_session).delete(end_session))
}
