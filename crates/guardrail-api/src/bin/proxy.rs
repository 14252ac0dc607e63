//! Proxy service binary (§2, ~300 concurrent): the OpenAI-compatible
//! reverse proxy and the direct-model passthrough endpoint.

use guardrail_api::router::proxy_router;
use guardrail_api::server::{bootstrap, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (state, _metrics_handle) = bootstrap("proxy").await?;
    let addr = state.config.processes.proxy.bind_address().parse()?;
    let router = proxy_router(state);
    serve("proxy", addr, router).await?;
    Ok(())
}
