//! Food Routes - Photo feeding and the food journal
//!
//! HTTP handlers that delegate to FoodService for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use uuid::Uuid;

use super::{error_response, vitals_response, ApiError};
use crate::models::{
    feed_message, recognized_labels, ClearJournalResponse, FoodEntryResponse, FoodJournalQuery,
    PhotoFeedRequest, PhotoFeedResponse,
};
use crate::AppState;

const DEFAULT_JOURNAL_LIMIT: usize = 20;

/// Classify a food photo and feed the buddy accordingly
#[utoipa::path(
    post,
    path = "/buddy/{id}/food/photo",
    params(("id" = Uuid, Path, description = "Buddy ID")),
    request_body = PhotoFeedRequest,
    responses(
        (status = 200, description = "Meal classified and eaten", body = PhotoFeedResponse),
        (status = 404, description = "Buddy not found"),
        (status = 422, description = "Image is not valid base64"),
        (status = 502, description = "Classifier unavailable")
    ),
    tag = "Food"
)]
pub async fn feed_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PhotoFeedRequest>,
) -> Result<Json<PhotoFeedResponse>, ApiError> {
    let image = STANDARD.decode(payload.image_base64.trim()).map_err(|e| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("image_base64 is not valid base64: {}", e),
        )
    })?;

    let (vitals, entry) = state
        .food
        .feed_photo(id, &image, payload.image_url)
        .await
        .map_err(error_response)?;

    let (title, reaction) = feed_message(&vitals.name, entry.is_healthy);
    let message = format!("{}\n\n{}", recognized_labels(&entry.labels), reaction);
    let now = state.vitals.now();

    Ok(Json(PhotoFeedResponse {
        title,
        message,
        entry: entry.into(),
        buddy: vitals_response(&state, vitals, now),
    }))
}

/// List the food journal, newest first
#[utoipa::path(
    get,
    path = "/buddy/{id}/food",
    params(
        ("id" = Uuid, Path, description = "Buddy ID"),
        ("limit" = Option<usize>, Query, description = "Maximum entries (default 20, max 100)")
    ),
    responses(
        (status = 200, description = "Journal entries", body = Vec<FoodEntryResponse>),
        (status = 404, description = "Buddy not found")
    ),
    tag = "Food"
)]
pub async fn list_journal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<FoodJournalQuery>,
) -> Result<Json<Vec<FoodEntryResponse>>, ApiError> {
    let entries = state
        .food
        .journal(id, query.limit.unwrap_or(DEFAULT_JOURNAL_LIMIT))
        .await
        .map_err(error_response)?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Delete every journal entry of the buddy
#[utoipa::path(
    delete,
    path = "/buddy/{id}/food",
    params(("id" = Uuid, Path, description = "Buddy ID")),
    responses(
        (status = 200, description = "Journal cleared", body = ClearJournalResponse),
        (status = 404, description = "Buddy not found")
    ),
    tag = "Food"
)]
pub async fn clear_journal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClearJournalResponse>, ApiError> {
    let removed = state
        .food
        .clear_journal(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ClearJournalResponse { removed }))
}

/// Create Food router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/buddy/:id/food", get(list_journal).delete(clear_journal))
        .route("/buddy/:id/food/photo", post(feed_photo))
}
