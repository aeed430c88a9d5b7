//! API middleware

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};

use core_kernel::Actor;

use crate::AppState;

/// Authentication middleware
///
/// Validates the bearer token and inserts the resolved [`Actor`] into the
/// request extensions for handlers to consume.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            warn!("Missing or invalid Authorization header");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let claims = crate::auth::validate_token(token, &state.config.jwt_secret).map_err(|e| {
        warn!("Token validation failed: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;
    let actor = claims.actor().map_err(|e| {
        warn!("Token claims rejected: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

/// Audit logging middleware
///
/// Logs every request with the acting user, for the back-office audit
/// trail.
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let actor = request
        .extensions()
        .get::<Actor>()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    let start = Utc::now();
    let response = next.run(request).await;
    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        actor = %actor,
        status = %status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}
