//! Tracing and metrics initialization for the three service binaries
//! (admin/detection/proxy, §2). Distinct from [`crate::config::observability`],
//! which only holds the config *structs* this module consumes.

use crate::config::ObservabilityConfig;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global `tracing` subscriber. JSON output in production
/// (`format: json`), compact human-readable output otherwise. The env
/// filter defaults to `config.logging.level` but a `RUST_LOG` var always
/// wins, matching how every other service in this stack behaves.
pub fn init_tracing(config: &ObservabilityConfig, service_name: &'static str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let registry = tracing_subscriber::registry().with(filter);

    match config.logging.format {
        crate::config::observability::LogFormat::Json => {
            registry
                .with(fmt::layer().json().with_target(true).with_current_span(true))
                .init();
        }
        crate::config::observability::LogFormat::Pretty => {
            registry
                .with(fmt::layer().with_target(false).compact())
                .init();
        }
    }

    tracing::info!(service = service_name, "tracing initialized");
}

/// Install the process-wide Prometheus recorder and return a handle whose
/// `render()` backs the `/metrics` endpoint on the admin surface (§4.6,
/// `MetricsConfig`).
pub fn init_metrics(config: &ObservabilityConfig) -> Option<PrometheusHandle> {
    if !config.metrics.enabled {
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "failed to install prometheus recorder");
            None
        }
    }
}

/// Record the standard per-request counters/histograms. Called once per
/// completed request from the outermost tower layer of each router.
pub fn record_request(service: &'static str, method: &str, path: &str, status: u16, latency_secs: f64) {
    metrics::counter!("guardrail_http_requests_total", "service" => service, "method" => method.to_string(), "path" => path.to_string(), "status" => status.to_string()).increment(1);
    metrics::histogram!("guardrail_http_request_duration_seconds", "service" => service, "path" => path.to_string()).record(latency_secs);
}
