//! Common test utilities

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use guardrail_api::config::AppConfig;
use guardrail_api::state::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Build an `AppState` backed by a lazy (never-connected) pool, suitable
/// for router-wiring tests that never touch the database.
pub fn create_test_state() -> AppState {
    let config = Arc::new(AppConfig::default());
    let pool = sqlx::PgPool::connect_lazy("postgres://localhost/guardrail_test")
        .expect("lazy pool construction does not touch the network");
    let auth_cache = Arc::new(guardrail_api::auth::AuthCache::new(std::time::Duration::from_secs(300), 100));
    let auth = Arc::new(guardrail_api::auth::AuthService::new(pool.clone(), auth_cache, config.jwt.secret.clone()));
    let log_tx = guardrail_api::log_pipeline::spawn(pool.clone(), std::env::temp_dir(), 16);
    AppState::new(config, pool, auth, log_tx)
}

pub async fn get_request(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body_bytes.to_vec()).unwrap();

    (status, body)
}

pub async fn post_request(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body_bytes.to_vec()).unwrap();

    (status, body)
}

pub fn parse_json<T>(body: &str) -> T
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).expect("failed to parse JSON response")
}
