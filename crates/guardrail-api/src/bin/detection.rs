//! Detection service binary (§2, ~400 concurrent): conversational
//! detection, scans, the gateway integration API, Dify moderation, and the
//! public appeal flow.

use guardrail_api::router::detection_router;
use guardrail_api::server::{bootstrap, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (state, _metrics_handle) = bootstrap("detection").await?;
    let addr = state.config.processes.detection.bind_address().parse()?;
    let router = detection_router(state);
    serve("detection", addr, router).await?;
    Ok(())
}
