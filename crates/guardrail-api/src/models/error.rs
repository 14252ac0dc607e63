//! API error type (§7 Error Handling Design): ten kinds, a uniform
//! `{error:{message,type,code}}` body shape, and conversions from every
//! lower-layer error type the handlers see.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("authentication error: {0}")]
    Auth(String),

    #[error("authorization error: {0}")]
    Authz(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("policy misconfiguration: {0}")]
    PolicyMisconfiguration(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Authz(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::PolicyMisconfiguration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Auth(_) => "auth_error",
            ApiError::Authz(_) => "authorization_error",
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found_error",
            ApiError::Conflict(_) => "conflict_error",
            ApiError::RateLimited(_) => "rate_limited",
            ApiError::QuotaExceeded(_) => "quota_exceeded",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::PolicyMisconfiguration(_) => "policy_misconfiguration",
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Auth(_) => "AUTH_ERROR",
            ApiError::Authz(_) => "FORBIDDEN",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::RateLimited(_) => "RATE_LIMITED",
            ApiError::QuotaExceeded(_) => "QUOTA_EXCEEDED",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::PolicyMisconfiguration(_) => "POLICY_MISCONFIGURATION",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            message: self.to_string(),
            error_type: self.error_type().to_string(),
            code: self.error_code().to_string(),
        }
    }
}

/// Body shape required by spec.md's external interface contract —
/// third-party gateways consume this exactly, so the top-level `success`
/// field the teacher's `ApiError` used is deliberately dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_error_body(),
        });
        (status, body).into_response()
    }
}

impl From<guardrail_core::Error> for ApiError {
    fn from(err: guardrail_core::Error) -> Self {
        match err {
            guardrail_core::Error::Auth(m) => ApiError::Auth(m),
            guardrail_core::Error::Unauthorized(m) => ApiError::Authz(m),
            guardrail_core::Error::InvalidInput(m) => ApiError::Validation(m),
            guardrail_core::Error::NotFound(m) => ApiError::NotFound(m),
            guardrail_core::Error::Conflict(m) => ApiError::Conflict(m),
            guardrail_core::Error::RateLimited(m) => ApiError::RateLimited(m),
            guardrail_core::Error::QuotaExceeded(m) => ApiError::QuotaExceeded(m),
            guardrail_core::Error::PolicyMisconfiguration(m) => ApiError::PolicyMisconfiguration(m),
            guardrail_core::Error::Scanner { .. } | guardrail_core::Error::Model(_) => {
                ApiError::Upstream(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<guardrail_store::Error> for ApiError {
    fn from(err: guardrail_store::Error) -> Self {
        guardrail_core::Error::from(err).into()
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ApiError::Auth(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<guardrail_anonymize::AnonymizationError> for ApiError {
    fn from(err: guardrail_anonymize::AnonymizationError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
