//! OpenAI-compatible reverse proxy (§4.3): `POST /v1/chat/completions`,
//! `POST /v1/completions`, `GET /v1/models`. Runs input detection before
//! forwarding, optionally anonymizes outgoing messages, optionally runs
//! output detection (buffered or streamed), and restores placeholders on
//! the way back out.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
    Json,
};
use futures::stream::{self, Stream, StreamExt};
use guardrail_core::{Message, Role, SuggestAction};
use guardrail_store::models::UpstreamApiConfig;
use guardrail_store::repo::upstream;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::extractors::PreferredLanguage;
use crate::models::{
    ApiError, ChatCompletionChoice, ChatCompletionRequest, ChatCompletionResponse, CompletionRequest,
};
use crate::state::AppState;
use crate::templates::{StaticKbProvider, StaticTemplateProvider};

/// Every N accumulated upstream chunks, streamed output is re-scanned
/// (§4.3 step 6 "periodically invoke detection on the so-far-accumulated
/// content").
const STREAM_DETECTION_INTERVAL: usize = 5;

async fn resolve_upstream(
    state: &AppState,
    tenant_id: Uuid,
    application_id: Uuid,
    model: &str,
) -> Result<UpstreamApiConfig, ApiError> {
    if let Some(route) = upstream::resolve_route(&state.pool, tenant_id, application_id, model).await? {
        return Ok(route);
    }
    upstream::default_private_model(&state.pool, tenant_id)
        .await?
        .ok_or_else(|| ApiError::PolicyMisconfiguration(format!("no upstream configured for model '{model}'")))
}

fn rejected_response(id: Uuid, model: &str, content: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: format!("chatcmpl-{id}"),
        object: "chat.completion".to_string(),
        created: 0,
        model: model.to_string(),
        choices: vec![ChatCompletionChoice {
            index: 0,
            message: Message::new(Role::Assistant, content),
            finish_reason: Some("content_filter".to_string()),
        }],
        usage: None,
    }
}

fn build_upstream_body(
    model: &str,
    messages: &[Message],
    stream: bool,
    extra: &std::collections::HashMap<String, serde_json::Value>,
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": model,
        "messages": messages,
        "stream": stream,
    });
    if let serde_json::Value::Object(map) = &mut body {
        for (k, v) in extra {
            map.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }
    body
}

async fn forward_non_streaming(
    state: &AppState,
    upstream_cfg: &UpstreamApiConfig,
    api_key: &str,
    body: serde_json::Value,
) -> Result<serde_json::Value, ApiError> {
    let url = format!("{}/chat/completions", upstream_cfg.base_url.trim_end_matches('/'));
    let resp = state
        .http_client
        .post(&url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(ApiError::Upstream(format!("upstream returned {}", resp.status())));
    }
    resp.json::<serde_json::Value>().await.map_err(|e| ApiError::Upstream(e.to_string()))
}

pub async fn chat_completions(
    State(state): State<AppState>,
    auth: AuthContext,
    PreferredLanguage(accept_language): PreferredLanguage,
    Json(request): Json<ChatCompletionRequest>,
) -> Result<Response, ApiError> {
    let tenant_id = auth.tenant_id();
    let application_id = auth
        .application_id()
        .ok_or_else(|| ApiError::Authz("an application-scoped key is required for the proxy".to_string()))?;

    let app_config = state.application_config(tenant_id, application_id).await?;
    let kb_provider = StaticKbProvider::new(&app_config.kb_entries);
    let template_provider = StaticTemplateProvider::new(&app_config.templates);

    let mut upstream_cfg = resolve_upstream(&state, tenant_id, application_id, &request.model).await?;

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
    if let Err(err) = guardrail_store::repo::tenants::increment_usage(&state.pool, tenant_id, 1).await {
        tracing::warn!(error = %err, %tenant_id, "failed to record proxy usage");
    }

    // A `reject` verdict only actually blocks when this upstream opts in;
    // otherwise it is logged and the original messages are forwarded.
    if disposition.suggest_action == SuggestAction::Reject && upstream_cfg.block_on_input_risk {
        let content = disposition.suggest_answer.clone().unwrap_or_default();
        if request.stream {
            return Ok(rejected_stream(request_id, request.model.clone(), content).into_response());
        }
        return Ok(Json(rejected_response(request_id, &request.model, &content)).into_response());
    }

    let messages = match disposition.suggest_action {
        SuggestAction::ReplaceWithAnonymized => disposition.rewritten_messages.clone().unwrap_or(request.messages.clone()),
        _ => request.messages.clone(),
    };

    if disposition.suggest_action == SuggestAction::SwitchPrivateModel {
        if let Some(safe) = upstream::resolve_safe_model(&state.pool, tenant_id).await? {
            upstream_cfg = safe;
        }
    }

    let model = upstream_cfg
        .private_model_names
        .0
        .first()
        .cloned()
        .unwrap_or_else(|| request.model.clone());
    let api_key = state.api_key_cipher.decrypt(&upstream_cfg.encrypted_api_key)?;
    let body = build_upstream_body(&model, &messages, request.stream, &request.extra);

    if request.stream {
        return Ok(streaming_response(
            state,
            upstream_cfg,
            api_key,
            body,
            app_config,
            accept_language,
            disposition.restore_mapping.clone(),
        )
        .await?
        .into_response());
    }

    let mut value = forward_non_streaming(&state, &upstream_cfg, &api_key, body).await?;

    if upstream_cfg.block_on_output_risk {
        if let Some(content) = value["choices"][0]["message"]["content"].as_str().map(|s| s.to_string()) {
            let output_messages = vec![Message::new(Role::Assistant, content.clone())];
            let output_disposition = state
                .disposition
                .resolve(
                    &output_messages,
                    &app_config.scanners,
                    &app_config.sensitivity,
                    state.config.detection.max_detection_context_length,
                    &app_config.whitelists,
                    &app_config.blacklists,
                    &app_config.data_policy,
                    &app_config.gateway_policy,
                    None,
                    None,
                    &accept_language,
                    false,
                )
                .await;

            match output_disposition.suggest_action {
                SuggestAction::Reject => {
                    return Ok(Json(rejected_response(
                        request_id,
                        &request.model,
                        &output_disposition.suggest_answer.unwrap_or_default(),
                    ))
                    .into_response());
                }
                _ => {
                    if let Some(mapping) = &disposition.restore_mapping {
                        let restored = state.anonymizer.restore_with_mapping(&content, mapping);
                        value["choices"][0]["message"]["content"] = serde_json::Value::String(restored);
                    }
                }
            }
        }
    } else if let Some(mapping) = &disposition.restore_mapping {
        if let Some(content) = value["choices"][0]["message"]["content"].as_str() {
            let restored = state.anonymizer.restore_with_mapping(content, mapping);
            value["choices"][0]["message"]["content"] = serde_json::Value::String(restored);
        }
    }

    Ok(Json(value).into_response())
}

fn rejected_stream(
    request_id: Uuid,
    model: String,
    content: String,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let chunk = serde_json::json!({
        "id": format!("chatcmpl-{request_id}"),
        "object": "chat.completion.chunk",
        "model": model,
        "choices": [{
            "index": 0,
            "delta": { "role": "assistant", "content": content },
            "finish_reason": "content_filter",
        }],
    });
    let events = vec![
        Ok(Event::default().data(chunk.to_string())),
        Ok(Event::default().data("[DONE]")),
    ];
    Sse::new(stream::iter(events)).keep_alive(axum::response::sse::KeepAlive::default())
}

/// Stream upstream SSE chunks through, periodically re-scanning the
/// accumulated assistant text and restoring placeholders on each emitted
/// delta (§4.3 step 6 "Streaming (SSE)").
async fn streaming_response(
    state: AppState,
    upstream_cfg: UpstreamApiConfig,
    api_key: String,
    body: serde_json::Value,
    app_config: std::sync::Arc<crate::state::ApplicationConfig>,
    accept_language: String,
    restore_mapping: Option<std::collections::HashMap<String, String>>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let url = format!("{}/chat/completions", upstream_cfg.base_url.trim_end_matches('/'));
    let upstream_resp = state
        .http_client
        .post(&url)
        .bearer_auth(&api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    if !upstream_resp.status().is_success() {
        return Err(ApiError::Upstream(format!("upstream returned {}", upstream_resp.status())));
    }

    let byte_stream = upstream_resp.bytes_stream();
    let block_on_output_risk = upstream_cfg.block_on_output_risk;

    let state_stream = stream::unfold(
        (byte_stream.boxed(), String::new(), String::new(), 0usize, false),
        move |(mut bytes, mut line_buf, mut accumulated, mut chunk_count, stopped)| {
            let state = state.clone();
            let app_config = app_config.clone();
            let accept_language = accept_language.clone();
            let restore_mapping = restore_mapping.clone();
            async move {
                if stopped {
                    return None;
                }
                let chunk = match bytes.next().await {
                    Some(Ok(b)) => b,
                    Some(Err(err)) => {
                        tracing::warn!(error = %err, "upstream stream read failed");
                        return Some((Ok(Event::default().data("[DONE]")), (bytes, line_buf, accumulated, chunk_count, true)));
                    }
                    None => return None,
                };

                line_buf.push_str(&String::from_utf8_lossy(&chunk));
                let mut delta_text = String::new();
                while let Some(pos) = line_buf.find("\n\n") {
                    let frame: String = line_buf.drain(..pos + 2).collect();
                    let payload = frame.trim().strip_prefix("data:").unwrap_or(&frame).trim();
                    if payload == "[DONE]" || payload.is_empty() {
                        continue;
                    }
                    if let Ok(v) = serde_json::from_str::<serde_json::Value>(payload) {
                        if let Some(piece) = v["choices"][0]["delta"]["content"].as_str() {
                            delta_text.push_str(piece);
                        }
                    }
                }
                accumulated.push_str(&delta_text);
                chunk_count += 1;

                if block_on_output_risk && chunk_count % STREAM_DETECTION_INTERVAL == 0 && !accumulated.is_empty() {
                    let messages = vec![Message::new(Role::Assistant, accumulated.clone())];
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
                            None,
                            None,
                            &accept_language,
                            false,
                        )
                        .await;
                    if disposition.suggest_action == SuggestAction::Reject {
                        let chunk = serde_json::json!({
                            "object": "chat.completion.chunk",
                            "choices": [{
                                "index": 0,
                                "delta": {},
                                "finish_reason": "content_filter",
                            }],
                        });
                        return Some((
                            Ok(Event::default().data(chunk.to_string())),
                            (bytes, line_buf, accumulated, chunk_count, true),
                        ));
                    }
                }

                let out_text = match &restore_mapping {
                    Some(mapping) => state.anonymizer.restore_with_mapping(&delta_text, mapping),
                    None => delta_text,
                };
                let out_chunk = serde_json::json!({
                    "object": "chat.completion.chunk",
                    "choices": [{ "index": 0, "delta": { "content": out_text }, "finish_reason": null }],
                });
                Some((Ok(Event::default().data(out_chunk.to_string())), (bytes, line_buf, accumulated, chunk_count, false)))
            }
        },
    );

    Ok(Sse::new(state_stream).keep_alive(
        axum::response::sse::KeepAlive::new().interval(Duration::from_secs(15)).text("keep-alive"),
    ))
}

pub async fn completions(
    State(state): State<AppState>,
    auth: AuthContext,
    lang: PreferredLanguage,
    Json(request): Json<CompletionRequest>,
) -> Result<Response, ApiError> {
    let chat_request = ChatCompletionRequest {
        model: request.model,
        messages: vec![Message::new(Role::User, request.prompt)],
        stream: request.stream,
        extra: request.extra,
    };
    chat_completions(State(state), auth, lang, Json(chat_request)).await
}

pub async fn list_models(State(state): State<AppState>, auth: AuthContext) -> Result<Json<serde_json::Value>, ApiError> {
    let tenant_id = auth.tenant_id();
    let configs = upstream::list_for_tenant(&state.pool, tenant_id).await?;

    let mut models: Vec<serde_json::Value> = Vec::new();
    for cfg in &configs {
        if cfg.private_model_names.0.is_empty() {
            models.push(serde_json::json!({ "id": cfg.config_name, "object": "model", "owned_by": cfg.provider }));
        } else {
            for name in &cfg.private_model_names.0 {
                models.push(serde_json::json!({ "id": name, "object": "model", "owned_by": cfg.provider }));
            }
        }
    }

    Ok(Json(serde_json::json!({ "object": "list", "data": models })))
}
