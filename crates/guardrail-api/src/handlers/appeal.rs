//! `GET`/`POST /v1/appeal/{request_id}` (§6 "Appeal flow") — a public,
//! unauthenticated page showing a blocked request and a submit-appeal
//! form; submitting triggers one lenient AI re-review and, if still
//! blocked, flags the record for human review.

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use guardrail_core::{Message, Role, SuggestAction};
use uuid::Uuid;

use crate::extractors::{language_from_query, PreferredLanguage};
use crate::models::ApiError;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct AppealQuery {
    #[serde(default)]
    pub lang: Option<String>,
}

fn render_page(lang: &str, content: &str, suggest_answer: Option<&str>, request_id: Uuid) -> String {
    let heading = if lang == "zh" { "申诉请求" } else { "Appeal this decision" };
    let label = if lang == "zh" { "被拦截的内容" } else { "Blocked content" };
    let reason_label = if lang == "zh" { "拦截原因" } else { "Reason" };
    let submit_label = if lang == "zh" { "提交申诉" } else { "Submit appeal" };
    format!(
        "<!doctype html><html lang=\"{lang}\"><head><meta charset=\"utf-8\"><title>{heading}</title></head><body>\
         <h1>{heading}</h1>\
         <p><strong>{label}:</strong></p><pre>{content}</pre>\
         <p><strong>{reason_label}:</strong> {reason}</p>\
         <form method=\"post\" action=\"/v1/appeal/{request_id}\">\
         <button type=\"submit\">{submit_label}</button>\
         </form></body></html>",
        content = html_escape(content),
        reason = html_escape(suggest_answer.unwrap_or("")),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub async fn show(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Query(query): Query<AppealQuery>,
    accept_language: PreferredLanguage,
) -> Result<Html<String>, ApiError> {
    let result = guardrail_store::repo::detection::find_by_request_id(&state.pool, request_id).await?;
    let lang = language_from_query(query.lang.as_deref(), accept_language);
    Ok(Html(render_page(&lang, &result.content, result.suggest_answer.as_deref(), request_id)))
}

#[derive(Debug, serde::Serialize)]
pub struct AppealResult {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_verdict: Option<String>,
    pub pending_human_review: bool,
}

/// Re-runs detection on the originally blocked content with loosened
/// sensitivity thresholds, framing the call as a lenient re-evaluation
/// (§6 "Appeal flow").
fn lenient_sensitivity(base: &guardrail_core::SensitivityConfig) -> guardrail_core::SensitivityConfig {
    guardrail_core::SensitivityConfig {
        high_threshold: (base.high_threshold + 0.2).min(0.99),
        medium_threshold: (base.medium_threshold + 0.2).min(0.995),
        low_threshold: (base.low_threshold + 0.04).min(0.999),
        trigger_level: guardrail_core::RiskLevel::HighRisk,
    }
}

pub async fn submit(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<AppealResult>, ApiError> {
    let result = guardrail_store::repo::detection::find_by_request_id(&state.pool, request_id).await?;
    let appeal_config = guardrail_store::repo::detection::appeal_config(&state.pool, result.application_id)
        .await?
        .unwrap_or(guardrail_store::models::AppealConfig {
            id: Uuid::nil(),
            application_id: result.application_id,
            enabled: true,
            require_human_review: false,
        });

    if !appeal_config.enabled {
        return Err(ApiError::PolicyMisconfiguration("appeals are disabled for this application".to_string()));
    }

    let record = guardrail_store::repo::detection::submit_appeal(&state.pool, request_id).await?;

    let app_config = state.application_config(result.tenant_id, result.application_id).await?;
    let sensitivity = lenient_sensitivity(&app_config.sensitivity);
    let messages = vec![Message::new(Role::User, result.content.clone())];

    let disposition = state
        .disposition
        .resolve(
            &messages,
            &app_config.scanners,
            &sensitivity,
            state.config.detection.max_detection_context_length,
            &app_config.whitelists,
            &app_config.blacklists,
            &app_config.data_policy,
            &app_config.gateway_policy,
            None,
            None,
            "en",
            false,
        )
        .await;

    let still_blocked = disposition.suggest_action == SuggestAction::Reject;
    let verdict = if still_blocked { "still_blocked" } else { "overturned" };
    guardrail_store::repo::detection::record_ai_verdict(&state.pool, record.id, verdict).await?;

    let pending_human_review = still_blocked && appeal_config.require_human_review;

    Ok(Json(AppealResult {
        status: if still_blocked { "ai_reviewed".to_string() } else { "overturned".to_string() },
        ai_verdict: Some(verdict.to_string()),
        pending_human_review,
    }))
}
