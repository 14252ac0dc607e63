//! Bind-and-serve, generalized across the three binaries (§2: admin,
//! detection, proxy). Each binary builds its own `axum::Router` (see
//! [`crate::router`]) and hands it to [`serve`] along with its own
//! concurrency target.

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::auth::{AuthCache, AuthService};
use crate::config::{self, AppConfig};
use crate::observability;
use crate::state::AppState;

/// Shared startup sequence for all three binaries: load configuration,
/// install the tracing subscriber and Prometheus recorder, open the
/// database pool, and assemble an [`AppState`]. `CONFIG_PATH` is read from
/// the environment when present; otherwise configuration comes entirely
/// from defaults overridden by `GUARDRAIL_API__*` environment variables.
/// The returned [`PrometheusHandle`] renders `/metrics` on the admin
/// surface; detection and proxy binaries simply drop it.
pub async fn bootstrap(service_name: &'static str) -> anyhow::Result<(AppState, Option<PrometheusHandle>)> {
    let config_path = std::env::var("CONFIG_PATH").ok().map(PathBuf::from);
    let config: AppConfig = config::load_config(config_path.as_deref())?;
    let config = Arc::new(config);

    observability::init_tracing(&config.observability, service_name);
    let metrics_handle = observability::init_metrics(&config.observability);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    let auth_cache = Arc::new(AuthCache::new(
        std::time::Duration::from_secs(config.auth.ttl_secs),
        config.auth.max_size,
    ));
    let auth = Arc::new(AuthService::new(pool.clone(), auth_cache, config.jwt.secret.clone()));

    let log_tx = crate::log_pipeline::spawn(
        pool.clone(),
        PathBuf::from(&config.log_pipeline.data_dir),
        config.log_pipeline.channel_capacity,
    );

    Ok((AppState::new(config, pool, auth, log_tx), metrics_handle))
}

/// Bind `addr` and serve `router` until a shutdown signal arrives, logging
/// the service name so admin/detection/proxy are distinguishable in a
/// shared log stream.
pub async fn serve(service_name: &'static str, addr: SocketAddr, router: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(service = service_name, %addr, "listening");

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal(service_name))
        .await?;

    info!(service = service_name, "shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM. In-flight requests are allowed to finish;
/// axum stops accepting new connections as soon as the signal fires.
async fn shutdown_signal(service_name: &'static str) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(service = service_name, "received ctrl-c, shutting down"),
        _ = terminate => info!(service = service_name, "received sigterm, shutting down"),
    }
}
