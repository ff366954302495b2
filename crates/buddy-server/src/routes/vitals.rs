//! Vitals Routes - Buddy creation and vitals updates
//!
//! HTTP handlers that delegate to VitalsService for business logic.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono_tz::Tz;
use uuid::Uuid;

use super::{error_response, optional_json, vitals_response, ApiError};
use crate::models::{
    drink_message, feed_message, outcome_name, sleep_message, ActionResponse, CleanupResponse,
    CreateBuddyRequest, CreateBuddyResponse, DrinkRequest, FeedRequest, StepsRequest,
    TickRequest, TickResponse, VitalsResponse,
};
use crate::AppState;

/// Create a buddy, or return the user's existing one
#[utoipa::path(
    post,
    path = "/buddy",
    request_body = CreateBuddyRequest,
    responses(
        (status = 201, description = "Buddy created", body = CreateBuddyResponse),
        (status = 200, description = "User already has a buddy", body = CreateBuddyResponse),
        (status = 422, description = "Invalid name or timezone")
    ),
    tag = "Buddy"
)]
pub async fn create_buddy(
    State(state): State<AppState>,
    Json(payload): Json<CreateBuddyRequest>,
) -> Result<(StatusCode, Json<CreateBuddyResponse>), ApiError> {
    let timezone = match payload.timezone.as_deref().map(str::trim) {
        None | Some("") => Tz::UTC,
        Some(name) => name.parse::<Tz>().map_err(|_| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown timezone: {}", name),
            )
        })?,
    };

    let (vitals, created) = state
        .vitals
        .create(payload.user_id, payload.name, payload.image_url, timezone)
        .await
        .map_err(error_response)?;

    if created {
        state.ticker.start(vitals.id);
    }

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let now = state.vitals.now();
    Ok((
        status,
        Json(CreateBuddyResponse {
            created,
            buddy: vitals_response(&state, vitals, now),
        }),
    ))
}

/// Get a buddy's vitals with pending decay applied
#[utoipa::path(
    get,
    path = "/buddy/{id}",
    params(("id" = Uuid, Path, description = "Buddy ID")),
    responses(
        (status = 200, description = "Current vitals", body = VitalsResponse),
        (status = 404, description = "Buddy not found")
    ),
    tag = "Buddy"
)]
pub async fn get_buddy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VitalsResponse>, ApiError> {
    let update = state.vitals.tick(id, false).await.map_err(error_response)?;
    let now = state.vitals.now();
    Ok(Json(vitals_response(&state, update.vitals, now)))
}

/// Get the user's buddy
#[utoipa::path(
    get,
    path = "/users/{user_id}/buddy",
    params(("user_id" = Uuid, Path, description = "Owner ID")),
    responses(
        (status = 200, description = "The user's buddy", body = VitalsResponse),
        (status = 404, description = "User has no buddy")
    ),
    tag = "Buddy"
)]
pub async fn get_user_buddy(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<VitalsResponse>, ApiError> {
    let vitals = state
        .vitals
        .get_for_user(user_id)
        .await
        .map_err(error_response)?;
    let now = state.vitals.now();
    Ok(Json(vitals_response(&state, vitals, now)))
}

/// Delete all but the most recently updated buddy of a user
#[utoipa::path(
    post,
    path = "/users/{user_id}/buddy/cleanup",
    params(("user_id" = Uuid, Path, description = "Owner ID")),
    responses(
        (status = 200, description = "Duplicates removed", body = CleanupResponse)
    ),
    tag = "Buddy"
)]
pub async fn cleanup_duplicates(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<CleanupResponse>, ApiError> {
    let removed = state
        .vitals
        .cleanup_duplicates(user_id)
        .await
        .map_err(error_response)?;
    Ok(Json(CleanupResponse { removed }))
}

/// Apply accrued decay now
#[utoipa::path(
    post,
    path = "/buddy/{id}/tick",
    params(("id" = Uuid, Path, description = "Buddy ID")),
    request_body = TickRequest,
    responses(
        (status = 200, description = "Tick result", body = TickResponse),
        (status = 404, description = "Buddy not found"),
        (status = 422, description = "Malformed request body")
    ),
    tag = "Buddy"
)]
pub async fn tick(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<TickResponse>, ApiError> {
    let force = optional_json::<TickRequest>(&body)?.force;
    let update = state.vitals.tick(id, force).await.map_err(error_response)?;
    let now = state.vitals.now();

    Ok(Json(TickResponse {
        outcome: outcome_name(update.outcome).to_string(),
        notifications: update.notifications.into_iter().map(Into::into).collect(),
        buddy: vitals_response(&state, update.vitals, now),
    }))
}

/// Feed the buddy
#[utoipa::path(
    post,
    path = "/buddy/{id}/feed",
    params(("id" = Uuid, Path, description = "Buddy ID")),
    request_body = FeedRequest,
    responses(
        (status = 200, description = "Buddy fed", body = ActionResponse),
        (status = 404, description = "Buddy not found")
    ),
    tag = "Buddy"
)]
pub async fn feed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FeedRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let (vitals, _) = state
        .vitals
        .feed(id, payload.healthy)
        .await
        .map_err(error_response)?;

    let (title, message) = feed_message(&vitals.name, payload.healthy);
    let now = state.vitals.now();
    Ok(Json(ActionResponse {
        title,
        message,
        buddy: vitals_response(&state, vitals, now),
    }))
}

/// Give the buddy water
#[utoipa::path(
    post,
    path = "/buddy/{id}/drink",
    params(("id" = Uuid, Path, description = "Buddy ID")),
    request_body = DrinkRequest,
    responses(
        (status = 200, description = "Buddy drank", body = ActionResponse),
        (status = 404, description = "Buddy not found"),
        (status = 422, description = "Malformed request body")
    ),
    tag = "Buddy"
)]
pub async fn drink(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ActionResponse>, ApiError> {
    let cups = optional_json::<DrinkRequest>(&body)?.cups();
    let vitals = state.vitals.drink(id, cups).await.map_err(error_response)?;

    let (title, message) = drink_message(&vitals.name, cups, vitals.water_consumed);
    let now = state.vitals.now();
    Ok(Json(ActionResponse {
        title,
        message,
        buddy: vitals_response(&state, vitals, now),
    }))
}

/// Put the buddy to sleep or wake it up
#[utoipa::path(
    post,
    path = "/buddy/{id}/sleep",
    params(("id" = Uuid, Path, description = "Buddy ID")),
    responses(
        (status = 200, description = "Sleep toggled", body = ActionResponse),
        (status = 404, description = "Buddy not found")
    ),
    tag = "Buddy"
)]
pub async fn toggle_sleep(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, ApiError> {
    let toggle = state.vitals.toggle_sleep(id).await.map_err(error_response)?;

    let (title, message) = sleep_message(&toggle.vitals.name, toggle.transition);
    let now = state.vitals.now();
    Ok(Json(ActionResponse {
        title,
        message,
        buddy: vitals_response(&state, toggle.vitals, now),
    }))
}

/// Record the pedometer reading
#[utoipa::path(
    put,
    path = "/buddy/{id}/steps",
    params(("id" = Uuid, Path, description = "Buddy ID")),
    request_body = StepsRequest,
    responses(
        (status = 200, description = "Steps recorded", body = VitalsResponse),
        (status = 422, description = "Negative or oversized step count")
    ),
    tag = "Buddy"
)]
pub async fn record_steps(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StepsRequest>,
) -> Result<Json<VitalsResponse>, ApiError> {
    let vitals = state
        .vitals
        .record_steps(id, payload.steps)
        .await
        .map_err(error_response)?;
    let now = state.vitals.now();
    Ok(Json(vitals_response(&state, vitals, now)))
}

/// Create Buddy router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/buddy", post(create_buddy))
        .route("/buddy/:id", get(get_buddy))
        .route("/buddy/:id/tick", post(tick))
        .route("/buddy/:id/feed", post(feed))
        .route("/buddy/:id/drink", post(drink))
        .route("/buddy/:id/sleep", post(toggle_sleep))
        .route("/buddy/:id/steps", put(record_steps))
        .route("/users/:user_id/buddy", get(get_user_buddy))
        .route("/users/:user_id/buddy/cleanup", post(cleanup_duplicates))
}
