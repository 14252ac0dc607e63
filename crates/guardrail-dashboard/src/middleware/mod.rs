//! Middleware

use crate::{
    auth::{verify_api_key, verify_token, Claims},
    config::DashboardConfig,
    db::DatabasePool,
    error::DashboardError,
};
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Authentication middleware state
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<DashboardConfig>,
    pub pool: DatabasePool,
}

/// Authentication middleware
pub async fn auth_middleware(
    axum::extract::State(state): axum::extract::State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    // Extract token from Authorization header
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = token {
        match verify_token(token, &state.config.auth.jwt_secret) {
            Ok(claims) => {
                // Add claims to request extensions
                request.extensions_mut().insert(claims);
                return Ok(next.run(request).await);
            }
            Err(_) => {
                return Err((
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token".to_string(),
                ))
            }
        }
    }

    // Check for API key
    if state.config.auth.enable_api_keys {
        let api_key = request
            .headers()
            .get(&state.config.auth.api_key_header)
            .and_then(|value| value.to_str().ok());

        if let Some(api_key) = api_key {
            match verify_api_key(state.pool.inner(), api_key).await {
                Ok(claims) => {
                    // Add claims to request extensions
                    request.extensions_mut().insert(claims);
                    return Ok(next.run(request).await);
                }
                Err(_) => {
                    return Err((
                        StatusCode::UNAUTHORIZED,
                        "Invalid or expired API key".to_string(),
                    ))
                }
            }
        }
    }

    Err((StatusCode::UNAUTHORIZED, "Missing authentication".to_string()))
}

/// Extract claims from request
pub fn extract_claims(request: &Request) -> Result<&Claims, DashboardError> {
    request
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| DashboardError::Authentication("No claims found".to_string()))
}
