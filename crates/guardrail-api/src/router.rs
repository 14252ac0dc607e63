//! Route tables for the three service processes (§2: admin, detection,
//! proxy). Each builder returns a fully-wired `Router<AppState>` — auth,
//! rate limiting, concurrency limiting, and request metrics layered in the
//! order a request actually passes through them.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::auth::{auth_middleware, optional_auth_middleware};
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::observability;
use crate::state::AppState;

/// Adapts [`auth_middleware`]'s raw `Arc`/`PgPool` parameters to axum's
/// `State<AppState>` convention so it can be used with
/// [`middleware::from_fn_with_state`].
async fn with_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    auth_middleware(state.auth.clone(), state.pool.clone(), request, next).await
}

async fn with_optional_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    optional_auth_middleware(state.auth.clone(), request, next).await
}

async fn with_rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    rate_limit_middleware(state.rate_limiter.clone(), state.concurrent_limiter.clone(), request, next).await
}

/// Records the standard per-request counters/histograms (§4.6). `service`
/// is baked into the closure per router rather than read from state so
/// admin/detection/proxy stay distinguishable in one metrics stream even
/// though they share the same binary's code.
async fn record_metrics(service: &'static str, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    observability::record_request(service, &method, &path, response.status().as_u16(), start.elapsed().as_secs_f64());
    response
}

/// Detection process (~400 concurrent, §2/§4.6): conversational detection,
/// single-shot scans, the gateway integration API, the Dify moderation
/// webhook, and the public appeal flow (it calls the same disposition
/// resolver for its re-review pass).
pub fn detection_router(state: AppState) -> Router {
    let limit = state.config.processes.detection.max_concurrent_requests;

    // Rate limiting keys off the resolved tenant where possible (§4.6), so
    // it must run inside the auth layer, not outside it: `with_auth` wraps
    // `with_rate_limit` here rather than the other way around.
    let protected = Router::new()
        .route("/v1/guardrails", post(handlers::guardrails))
        .route("/v1/scan/email", post(handlers::scan_email))
        .route("/v1/scan/webpage", post(handlers::scan_webpage))
        .route("/v1/gateway/process-input", post(handlers::process_input))
        .route("/v1/gateway/process-output", post(handlers::process_output))
        .route("/dify/moderation", post(handlers::dify_moderation))
        .layer(middleware::from_fn_with_state(state.clone(), with_rate_limit))
        .layer(middleware::from_fn_with_state(state.clone(), with_auth));

    let public = Router::new()
        .route("/v1/appeal/:request_id", get(handlers::appeal_show).post(handlers::appeal_submit))
        .layer(middleware::from_fn_with_state(state.clone(), with_rate_limit));

    Router::new()
        .merge(protected)
        .merge(public)
        .route("/health", get(handlers::health))
        .route("/health/ready", get(handlers::ready))
        .route("/health/live", get(handlers::live))
        .route("/version", get(handlers::version))
        .layer(middleware::from_fn(|req: Request, next: Next| record_metrics("detection", req, next)))
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(limit))
        .with_state(state)
}

/// Proxy process (~300 concurrent, §2/§4.3): the OpenAI-compatible reverse
/// proxy plus the detection-free direct-model endpoint.
pub fn proxy_router(state: AppState) -> Router {
    let limit = state.config.processes.proxy.max_concurrent_requests;

    let protected = Router::new()
        .route("/v1/chat/completions", post(handlers::chat_completions))
        .route("/v1/completions", post(handlers::completions))
        .route("/v1/model/chat/completions", post(handlers::direct_model_chat_completions))
        .layer(middleware::from_fn_with_state(state.clone(), with_rate_limit))
        .layer(middleware::from_fn_with_state(state.clone(), with_auth));

    // Listing models is informative rather than policy-bearing; callers
    // without a key still see a catalogue once resolved via
    // X-OG-Application-ID, matching the teacher's optional-auth pattern.
    let optional = Router::new()
        .route("/v1/models", get(handlers::list_models))
        .layer(middleware::from_fn_with_state(state.clone(), with_rate_limit))
        .layer(middleware::from_fn_with_state(state.clone(), with_optional_auth));

    Router::new()
        .merge(protected)
        .merge(optional)
        .route("/health", get(handlers::health))
        .route("/health/ready", get(handlers::ready))
        .route("/health/live", get(handlers::live))
        .route("/version", get(handlers::version))
        .layer(middleware::from_fn(|req: Request, next: Next| record_metrics("proxy", req, next)))
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(limit))
        .with_state(state)
}

/// Admin process (~50 concurrent, §2/§6 "Admin CRUD"). The CRUD surface
/// itself is not yet implemented (tracked as an open decision); this
/// router currently only exposes health/version so the binary is a
/// runnable, independently-scaled process from day one. `metrics_handle`
/// renders the `/metrics` scrape endpoint (§4.6); pass `None` in tests or
/// when the observability config disables metrics.
pub fn admin_router(state: AppState, metrics_handle: Option<metrics_exporter_prometheus::PrometheusHandle>) -> Router {
    let limit = state.config.processes.admin.max_concurrent_requests;

    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/health/ready", get(handlers::ready))
        .route("/health/live", get(handlers::live))
        .route("/version", get(handlers::version));

    if let Some(handle) = metrics_handle {
        router = router.route("/metrics", get(move || async move { handle.render() }));
    }

    router
        .layer(middleware::from_fn(|req: Request, next: Next| record_metrics("admin", req, next)))
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(limit))
        .with_state(state)
}
