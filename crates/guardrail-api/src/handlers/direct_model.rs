//! `POST /v1/model/chat/completions` (§4.3 "direct model access") — a
//! `direct_model_api_key` bypasses detection entirely; the request is
//! forwarded to the tenant's default upstream and only usage-metered.

use axum::{extract::State, response::IntoResponse, response::Response, Json};
use guardrail_store::repo::{model_usage, upstream};

use crate::auth::AuthContext;
use crate::models::{ApiError, ChatCompletionRequest};
use crate::state::AppState;

pub async fn chat_completions(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<ChatCompletionRequest>,
) -> Result<Response, ApiError> {
    let tenant_id = match auth {
        AuthContext::DirectModel { tenant_id } => tenant_id,
        _ => return Err(ApiError::Authz("a direct-model key is required for this endpoint".to_string())),
    };

    let upstream_cfg = upstream::default_private_model(&state.pool, tenant_id)
        .await?
        .ok_or_else(|| ApiError::PolicyMisconfiguration("tenant has no default private model configured".to_string()))?;

    let api_key = state.api_key_cipher.decrypt(&upstream_cfg.encrypted_api_key)?;
    let url = format!("{}/chat/completions", upstream_cfg.base_url.trim_end_matches('/'));

    let body = serde_json::json!({
        "model": request.model,
        "messages": request.messages,
        "stream": false,
    });

    let resp = state
        .http_client
        .post(&url)
        .bearer_auth(&api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(ApiError::Upstream(format!("upstream returned {}", resp.status())));
    }

    let value: serde_json::Value = resp.json().await.map_err(|e| ApiError::Upstream(e.to_string()))?;

    let input_tokens = value["usage"]["prompt_tokens"].as_i64().unwrap_or(0);
    let output_tokens = value["usage"]["completion_tokens"].as_i64().unwrap_or(0);
    if let Err(err) = model_usage::record(&state.pool, tenant_id, &request.model, input_tokens, output_tokens).await {
        tracing::warn!(error = %err, %tenant_id, model = %request.model, "failed to record direct-model usage");
    }

    Ok(Json(value).into_response())
}
