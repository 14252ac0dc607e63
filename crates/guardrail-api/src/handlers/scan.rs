//! `POST /v1/scan/email` and `POST /v1/scan/webpage` (§6) — single-shot
//! content scans restricted to the E1-E4 scanner family (prompt injection,
//! jailbreak, phishing, malware), sharing the sliding-window scanner engine
//! with the conversational detection API but reporting a simpler
//! risk-level/risk-types shape instead of a full disposition.

use axum::{extract::State, Json};
use guardrail_core::{Message, Role};

use crate::auth::AuthContext;
use crate::extractors::PreferredLanguage;
use crate::models::{ApiError, ScanRequest, ScanResultResponse};
use crate::state::AppState;

/// Scan endpoints run only the E1-E4 scanners (prompt injection, jailbreak,
/// phishing, malware) rather than an application's full conversational set.
const SCAN_SCANNER_TAGS: &[&str] = &["E1", "E2", "E3", "E4"];

async fn run_scan(
    state: &AppState,
    auth: &AuthContext,
    accept_language: &str,
    scan_type: &str,
    content: &str,
) -> Result<ScanResultResponse, ApiError> {
    let tenant_id = auth.tenant_id();
    let application_id = auth
        .application_id()
        .ok_or_else(|| ApiError::Authz("an application-scoped key is required for scan endpoints".to_string()))?;

    let app_config = state.application_config(tenant_id, application_id).await?;
    let scanners: Vec<_> = app_config
        .scanners
        .iter()
        .filter(|s| SCAN_SCANNER_TAGS.contains(&s.definition.tag.as_str()))
        .cloned()
        .collect();

    let messages = vec![Message::new(Role::User, content)];

    let disposition = state
        .disposition
        .resolve(
            &messages,
            &scanners,
            &app_config.sensitivity,
            state.config.detection.max_detection_context_length,
            &[],
            &[],
            &Default::default(),
            &Default::default(),
            None,
            None,
            accept_language,
            false,
        )
        .await;

    let mut risk_types = disposition.dimensions.compliance.categories.clone();
    risk_types.extend(disposition.dimensions.security.categories.clone());
    risk_types.sort();
    risk_types.dedup();

    Ok(ScanResultResponse {
        id: uuid::Uuid::new_v4().to_string(),
        scan_type: scan_type.to_string(),
        risk_level: disposition.overall_risk_level.into(),
        risk_types,
        risk_content: content.to_string(),
        score: disposition.score,
    })
}

pub async fn scan_email(
    State(state): State<AppState>,
    auth: AuthContext,
    lang: PreferredLanguage,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanResultResponse>, ApiError> {
    let result = run_scan(&state, &auth, &lang.0, "email", &request.content).await?;
    Ok(Json(result))
}

pub async fn scan_webpage(
    State(state): State<AppState>,
    auth: AuthContext,
    lang: PreferredLanguage,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanResultResponse>, ApiError> {
    let result = run_scan(&state, &auth, &lang.0, "webpage", &request.content).await?;
    Ok(Json(result))
}
