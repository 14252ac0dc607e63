//! Custom Axum extractors pulling request-scoped context out of extensions
//! and headers: the [`AuthContext`] the auth middleware resolved, the
//! tenant's [`ClientTier`], and the caller's preferred language for
//! template/appeal-page selection (§4.2 step 5, §6 "Appeal").

use crate::auth::AuthContext;
use crate::middleware::rate_limit::ClientTier;
use crate::models::ApiError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use guardrail_core::Error;

/// Pulls the [`AuthContext`] the auth middleware attached to the request.
/// Returns 401 if the middleware was not run for this route (a programming
/// error, not a client error, but safest to surface as auth failure).
#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| Error::auth("no authentication context on request").into())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientTier
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<ClientTier>().cloned().unwrap_or(ClientTier(
            crate::config::rate_limit::RateLimitTier::Free,
        )))
    }
}

/// Caller's preferred language, derived from `Accept-Language` and falling
/// back to the platform default (§4.2 step 5). Only the primary subtag is
/// kept (`zh-CN` -> `zh`) since templates are keyed by a flat language map.
#[derive(Debug, Clone)]
pub struct PreferredLanguage(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for PreferredLanguage
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(axum::http::header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.split(['-', ';']).next())
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "en".to_string());

        Ok(PreferredLanguage(lang))
    }
}

/// `?lang=` query override used by the public appeal page, which has no
/// `Accept-Language` negotiation of its own (it's opened from a link).
pub fn language_from_query(lang: Option<&str>, accept_language: PreferredLanguage) -> String {
    lang.map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .unwrap_or(accept_language.0)
}
