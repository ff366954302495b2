//! Simple API Key Authentication (Bearer Token)

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

/// Configured API key; `None` disables authentication
#[derive(Clone, Default)]
pub struct ApiKey(Option<Arc<str>>);

impl ApiKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.filter(|k| !k.is_empty()).map(Into::into))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    /// Check an Authorization header value against the key
    pub fn authorize(&self, auth_header: Option<&str>) -> Result<(), StatusCode> {
        let Some(api_key) = self.0.as_deref() else {
            return Ok(());
        };

        match auth_header {
            Some(header) => match header.strip_prefix("Bearer ") {
                Some(token) if token == api_key => Ok(()),
                Some(_) => {
                    tracing::warn!("Invalid API key attempted");
                    Err(StatusCode::UNAUTHORIZED)
                }
                None => {
                    tracing::warn!("Invalid Authorization header format");
                    Err(StatusCode::UNAUTHORIZED)
                }
            },
            None => {
                tracing::warn!("Missing Authorization header");
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}

/// Authentication middleware
/// Validates Bearer token against the API key
pub async fn auth_middleware(
    State(api_key): State<ApiKey>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    api_key.authorize(auth_header)?;
    Ok(next.run(request).await)
}
