//! Authentication middleware for Axum
//!
//! Validates the `Authorization: Bearer sk-xxai-...` header (or a JWT for
//! the admin surface) before processing a request, and resolves
//! `X-OG-Application-ID` auto-discovery (§4.3) for tenant-scoped keys.

use crate::auth::{AuthContext, AuthService};
use crate::middleware::rate_limit::ClientTier;
use crate::config::rate_limit::RateLimitTier;
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use guardrail_store::models::SubscriptionType;
use guardrail_store::repo::tenants;
use sqlx::PgPool;
use std::sync::Arc;

const APPLICATION_HEADER: &str = "x-og-application-id";

/// Authentication middleware layer.
///
/// Extracts the bearer token, resolves it to an [`AuthContext`] via
/// [`AuthService::resolve_api_key`], applies `X-OG-Application-ID`
/// auto-discovery when the context is only tenant-scoped, and stores both
/// the resolved context and a [`ClientTier`] (derived from the tenant's
/// subscription, for the rate-limit middleware) in request extensions.
pub async fn auth_middleware(
    auth_service: Arc<AuthService>,
    pool: PgPool,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    let api_key = match auth_header {
        Some(header) => match header.strip_prefix("Bearer ") {
            Some(key) => key,
            None => return create_unauthorized_response("Invalid authorization header format"),
        },
        None => return create_unauthorized_response("Missing authorization header"),
    };

    let mut ctx = match auth_service.resolve_api_key(api_key).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::warn!("API key validation failed: {}", e);
            return create_unauthorized_response("Invalid or expired API key");
        }
    };

    if matches!(ctx, AuthContext::Tenant { .. }) {
        if let Some(header_value) = request
            .headers()
            .get(APPLICATION_HEADER)
            .and_then(|h| h.to_str().ok())
        {
            match auth_service
                .resolve_application_header(ctx.clone(), header_value)
                .await
            {
                Ok(resolved) => ctx = resolved,
                Err(e) => {
                    tracing::warn!("application auto-discovery failed: {}", e);
                    return create_unauthorized_response("Unknown X-OG-Application-ID");
                }
            }
        }
    }

    let tier = match tenants::subscription(&pool, ctx.tenant_id()).await {
        Ok(sub) => match sub.subscription_type {
            SubscriptionType::Free => RateLimitTier::Free,
            SubscriptionType::Subscribed => RateLimitTier::Pro,
        },
        Err(_) => RateLimitTier::Free,
    };

    request.extensions_mut().insert(ClientTier(tier));
    request.extensions_mut().insert(ctx.clone());

    tracing::debug!(tenant_id = %ctx.tenant_id(), kind = ?ctx.kind(), "authenticated request");

    next.run(request).await
}

/// Create 401 Unauthorized response
fn create_unauthorized_response(message: &str) -> Response {
    let body = serde_json::json!({
        "error": "Unauthorized",
        "message": message,
    });

    (
        StatusCode::UNAUTHORIZED,
        serde_json::to_string(&body).unwrap(),
    )
        .into_response()
}

/// Optional authentication middleware: used by endpoints (e.g. `/v1/models`)
/// that behave the same whether or not a caller is authenticated. If a key
/// resolves, its [`AuthContext`] is attached; otherwise the request proceeds
/// unauthenticated.
pub async fn optional_auth_middleware(
    auth_service: Arc<AuthService>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    if let Some(api_key) = auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        if let Ok(ctx) = auth_service.resolve_api_key(api_key).await {
            tracing::debug!(tenant_id = %ctx.tenant_id(), "authenticated optional request");
            request.extensions_mut().insert(ctx);
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_create_unauthorized_response() {
        let response = create_unauthorized_response("Test message");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
