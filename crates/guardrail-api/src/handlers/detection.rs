//! `POST /v1/guardrails` — the core detection API (§6). Runs the
//! disposition resolver over a conversation and reports every dimension's
//! verdict plus the combined suggested action.

use axum::{extract::State, Json};
use guardrail_core::{DimensionVerdict, SuggestAction};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::extractors::PreferredLanguage;
use crate::models::{
    ApiError, DataDimensionResult, DetectedEntityDto, DimensionResult, GuardrailsRequest, GuardrailsResponse,
    GuardrailsResult,
};
use crate::state::AppState;
use crate::templates::{StaticKbProvider, StaticTemplateProvider};

pub(crate) fn suggest_action_str(action: SuggestAction) -> &'static str {
    match action {
        SuggestAction::Pass => "pass",
        SuggestAction::Reject => "reject",
        SuggestAction::Replace => "replace",
        SuggestAction::ReplaceWithAnonymized => "replace_with_anonymized",
        SuggestAction::SwitchPrivateModel => "switch_private_model",
    }
}

fn dimension_result(verdict: &DimensionVerdict) -> DimensionResult {
    DimensionResult {
        risk_level: verdict.risk_level,
        categories: verdict.categories.clone(),
    }
}

pub async fn guardrails(
    State(state): State<AppState>,
    auth: AuthContext,
    PreferredLanguage(accept_language): PreferredLanguage,
    Json(request): Json<GuardrailsRequest>,
) -> Result<Json<GuardrailsResponse>, ApiError> {
    let tenant_id = auth.tenant_id();
    let application_id = auth
        .application_id()
        .ok_or_else(|| ApiError::Authz("an application-scoped key is required for /v1/guardrails".to_string()))?;

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

    let data_dimension = DataDimensionResult {
        risk_level: disposition.dimensions.data.risk_level,
        categories: disposition.dimensions.data.categories.clone(),
        detected_entities: disposition.entities.iter().map(DetectedEntityDto::from).collect(),
        anonymized_text: disposition.rewritten_messages.as_ref().and_then(|m| m.last()).map(|m| m.as_text().to_string()),
        restore_mapping: disposition.restore_mapping.clone(),
    };

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

    Ok(Json(GuardrailsResponse {
        id: request_id.to_string(),
        result: GuardrailsResult {
            compliance: dimension_result(&disposition.dimensions.compliance),
            security: dimension_result(&disposition.dimensions.security),
            data: data_dimension,
        },
        overall_risk_level: disposition.overall_risk_level,
        suggest_action: disposition.suggest_action,
        suggest_answer: disposition.suggest_answer,
        score: disposition.score,
    }))
}
