//! Buddy API Routes
//!
//! - /buddy - Create a buddy (or get the user's existing one)
//! - /buddy/:id - Vitals, with pending decay applied
//! - /buddy/:id/{tick,feed,drink,sleep,steps} - Vitals updates
//! - /buddy/:id/food - Food journal and photo feeding
//! - /buddy/:id/session - Start/stop the periodic tick
//! - /users/:user_id/buddy - Lookup and duplicate cleanup by owner

pub mod food;
pub mod session;
pub mod swagger;
pub mod vitals;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use buddy::{BuddyVitals, DomainError};

use crate::models::VitalsResponse;
use crate::AppState;

/// Error type returned by every handler
pub type ApiError = (StatusCode, String);

/// Map a domain error to its HTTP status
pub fn error_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        DomainError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(error: DomainError) -> ApiError {
    let status = error_status(&error);
    if status.is_server_error() {
        tracing::error!("❌ {}", error);
    }
    (status, error.to_string())
}

/// Decode a body that may be omitted
///
/// An empty body yields the default request; a body that does not parse is a 422.
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Invalid request body: {}", e),
        )
    })
}

/// Vitals DTO with the configured water goal
pub(crate) fn vitals_response(state: &AppState, vitals: BuddyVitals, now: DateTime<Utc>) -> VitalsResponse {
    let water_goal = state.vitals.engine().config().water_goal_cups;
    VitalsResponse::new(vitals, water_goal, now)
}
