//! `POST /v1/gateway/process-input` and `POST /v1/gateway/process-output`
//! (§4.4) — the integration API third-party gateways call directly, instead
//! of sitting behind the reverse proxy. Reuses the same disposition
//! resolver as `/v1/guardrails`, translated into the gateway's own action
//! vocabulary.

use std::time::Instant;

use axum::{extract::State, Json};
use guardrail_core::{Message, Role, SuggestAction};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::extractors::PreferredLanguage;
use crate::handlers::detection::suggest_action_str;
use crate::models::{
    ApiError, DataDimensionResult, DetectedEntityDto, DimensionResult, GatewayAction, GatewayOutputAction,
    GuardrailsResult, ProcessInputRequest, ProcessInputResponse, ProcessOutputRequest, ProcessOutputResponse,
};
use crate::state::AppState;
use crate::templates::{StaticKbProvider, StaticTemplateProvider};

pub async fn process_input(
    State(state): State<AppState>,
    auth: AuthContext,
    PreferredLanguage(accept_language): PreferredLanguage,
    Json(request): Json<ProcessInputRequest>,
) -> Result<Json<ProcessInputResponse>, ApiError> {
    let started = Instant::now();
    let tenant_id = auth.tenant_id();
    let application_id = auth
        .application_id()
        .ok_or_else(|| ApiError::Authz("an application-scoped key is required for gateway integration".to_string()))?;

    let app_config = state.application_config(tenant_id, application_id).await?;
    let kb_provider = StaticKbProvider::new(&app_config.kb_entries);
    let template_provider = StaticTemplateProvider::new(&app_config.templates);

    let disposition = state
        .disposition
        .resolve(
            &request.messages,
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
            true,
        )
        .await;

    let request_id = Uuid::new_v4();
    if state.config.detection.store_detection_results {
        let content = request.messages.last().map(|m| m.as_text().to_string()).unwrap_or_default();
        if let Err(err) = guardrail_store::repo::detection::insert(
            &state.pool,
            request_id,
            application_id,
            tenant_id,
            &content,
            &disposition.dimensions.security.risk_level.to_string(),
            &disposition.dimensions.security.categories,
            &disposition.dimensions.compliance.risk_level.to_string(),
            &disposition.dimensions.compliance.categories,
            &disposition.dimensions.data.risk_level.to_string(),
            &disposition.dimensions.data.categories,
            suggest_action_str(disposition.suggest_action),
            disposition.suggest_answer.as_deref(),
            None,
            disposition.score,
            &[],
        )
        .await
        {
            tracing::warn!(error = %err, %request_id, "failed to persist detection result");
        }
    }

    let detection_result = GuardrailsResult {
        compliance: DimensionResult {
            risk_level: disposition.dimensions.compliance.risk_level,
            categories: disposition.dimensions.compliance.categories.clone(),
        },
        security: DimensionResult {
            risk_level: disposition.dimensions.security.risk_level,
            categories: disposition.dimensions.security.categories.clone(),
        },
        data: DataDimensionResult {
            risk_level: disposition.dimensions.data.risk_level,
            categories: disposition.dimensions.data.categories.clone(),
            detected_entities: disposition.entities.iter().map(DetectedEntityDto::from).collect(),
            anonymized_text: None,
            restore_mapping: disposition.restore_mapping.clone(),
        },
    };

    let response = match disposition.suggest_action {
        SuggestAction::Pass => ProcessInputResponse {
            action: GatewayAction::Pass,
            messages: None,
            session_id: None,
            replacement: None,
            error: None,
            detection_result,
            processing_time_ms: started.elapsed().as_millis() as u64,
        },
        SuggestAction::Reject => ProcessInputResponse {
            action: GatewayAction::Block,
            messages: None,
            session_id: None,
            replacement: disposition.suggest_answer.clone(),
            error: None,
            detection_result,
            processing_time_ms: started.elapsed().as_millis() as u64,
        },
        SuggestAction::Replace => ProcessInputResponse {
            action: GatewayAction::Replace,
            messages: None,
            session_id: None,
            replacement: disposition.suggest_answer.clone(),
            error: None,
            detection_result,
            processing_time_ms: started.elapsed().as_millis() as u64,
        },
        SuggestAction::ReplaceWithAnonymized => ProcessInputResponse {
            action: GatewayAction::Anonymize,
            messages: disposition.rewritten_messages.clone(),
            session_id: disposition.restore_session_id.clone(),
            replacement: None,
            error: None,
            detection_result,
            processing_time_ms: started.elapsed().as_millis() as u64,
        },
        SuggestAction::SwitchPrivateModel => ProcessInputResponse {
            action: GatewayAction::SwitchPrivateModel,
            messages: None,
            session_id: None,
            replacement: None,
            error: None,
            detection_result,
            processing_time_ms: started.elapsed().as_millis() as u64,
        },
    };

    Ok(Json(response))
}

/// Output-side moderation: the gateway hands back one model response chunk
/// at a time; it is treated as a single assistant message and re-run through
/// the same scanner/disposal pipeline used for input.
pub async fn process_output(
    State(state): State<AppState>,
    auth: AuthContext,
    PreferredLanguage(accept_language): PreferredLanguage,
    Json(request): Json<ProcessOutputRequest>,
) -> Result<Json<ProcessOutputResponse>, ApiError> {
    let tenant_id = auth.tenant_id();
    let application_id = auth
        .application_id()
        .ok_or_else(|| ApiError::Authz("an application-scoped key is required for gateway integration".to_string()))?;

    let app_config = state.application_config(tenant_id, application_id).await?;
    let kb_provider = StaticKbProvider::new(&app_config.kb_entries);
    let template_provider = StaticTemplateProvider::new(&app_config.templates);

    let messages = vec![Message::new(Role::Assistant, request.content.clone())];

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
            false,
        )
        .await;

    let response = match disposition.suggest_action {
        SuggestAction::Reject => ProcessOutputResponse {
            action: GatewayOutputAction::Block,
            content: disposition.suggest_answer,
        },
        SuggestAction::Replace => ProcessOutputResponse {
            action: GatewayOutputAction::Replace,
            content: disposition.suggest_answer,
        },
        // Output moderation never anonymizes or switches models on its own;
        // a session_id present means an earlier process-input call left
        // placeholders to restore, otherwise the content passes unchanged.
        SuggestAction::Pass | SuggestAction::ReplaceWithAnonymized | SuggestAction::SwitchPrivateModel => {
            match request.session_id.as_deref() {
                Some(session_id) => {
                    let restored = state.anonymizer.restore(session_id, &request.content).await?;
                    ProcessOutputResponse { action: GatewayOutputAction::Restore, content: Some(restored.restored_text) }
                }
                None => ProcessOutputResponse { action: GatewayOutputAction::Pass, content: Some(request.content) },
            }
        }
    };

    Ok(Json(response))
}

