//! `POST /dify/moderation` (§6) — Dify's moderation plugin contract. `ping`
//! short-circuits with no detection call; `app.moderation.input`/`.output`
//! run the same disposition resolver as the gateway integration API and
//! translate the outcome into Dify's own `flagged`/`action` vocabulary.

use axum::{extract::State, Json};
use guardrail_core::{Message, Role, SuggestAction};
use serde_json::json;

use crate::auth::AuthContext;
use crate::extractors::PreferredLanguage;
use crate::models::{ApiError, DifyModerationRequest, DifyModerationResponse, DifyPoint};
use crate::state::AppState;
use crate::templates::{StaticKbProvider, StaticTemplateProvider};

pub async fn moderation(
    State(state): State<AppState>,
    auth: AuthContext,
    PreferredLanguage(accept_language): PreferredLanguage,
    Json(request): Json<DifyModerationRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.point == DifyPoint::Ping {
        return Ok(Json(json!({ "result": "pong" })));
    }

    let tenant_id = auth.tenant_id();
    let application_id = auth
        .application_id()
        .ok_or_else(|| ApiError::Authz("an application-scoped key is required for dify moderation".to_string()))?;

    let app_config = state.application_config(tenant_id, application_id).await?;
    let kb_provider = StaticKbProvider::new(&app_config.kb_entries);
    let template_provider = StaticTemplateProvider::new(&app_config.templates);

    let role = match request.point {
        DifyPoint::ModerationOutput => Role::Assistant,
        _ => Role::User,
    };
    let content = request
        .params
        .text
        .clone()
        .or_else(|| request.params.query.clone())
        .or_else(|| {
            request
                .params
                .inputs
                .as_ref()
                .and_then(|v| v.as_str().map(|s| s.to_string()))
        })
        .unwrap_or_default();
    let messages = vec![Message::new(role, content.clone())];

    let disposition = state
        .disposition
        .resolve(
            &messages,
            &app_config.scanners,
            &app_config.sensitivity,
            state.config.detection.max_detection_context_length,
            &app_config.whitelists,
            &app_config.blacklists,
            &app_config.data_policy,
            &app_config.gateway_policy,
            Some(&kb_provider),
            Some(&template_provider),
            &accept_language,
            request.point == DifyPoint::ModerationInput,
        )
        .await;

    let response = match disposition.suggest_action {
        SuggestAction::Pass => DifyModerationResponse {
            flagged: false,
            action: "direct_output".to_string(),
            preset_response: None,
            inputs: None,
            query: None,
            text: None,
        },
        SuggestAction::Reject | SuggestAction::Replace => DifyModerationResponse {
            flagged: true,
            action: "direct_output".to_string(),
            preset_response: disposition.suggest_answer,
            inputs: None,
            query: None,
            text: None,
        },
        SuggestAction::ReplaceWithAnonymized => {
            let rewritten = disposition
                .rewritten_messages
                .as_ref()
                .and_then(|m| m.last())
                .map(|m| m.as_text().to_string())
                .unwrap_or(content);
            DifyModerationResponse {
                flagged: true,
                action: "overridden".to_string(),
                preset_response: None,
                inputs: request.params.inputs.is_some().then(|| json!({ "text": rewritten.clone() })),
                query: matches!(request.point, DifyPoint::ModerationInput).then(|| rewritten.clone()),
                text: matches!(request.point, DifyPoint::ModerationOutput).then_some(rewritten),
            }
        }
        SuggestAction::SwitchPrivateModel => DifyModerationResponse {
            flagged: false,
            action: "direct_output".to_string(),
            preset_response: None,
            inputs: None,
            query: None,
            text: None,
        },
    };

    Ok(Json(serde_json::to_value(response).map_err(|e| ApiError::Internal(e.to_string()))?))
}
