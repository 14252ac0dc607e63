//! Admin service binary (§2, ~50 concurrent): health/version today, the
//! `/api/v1/...` CRUD surface to follow (see DESIGN.md for scope).

use guardrail_api::router::admin_router;
use guardrail_api::server::{bootstrap, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (state, metrics_handle) = bootstrap("admin").await?;
    let addr = state.config.processes.admin.bind_address().parse()?;
    let router = admin_router(state, metrics_handle);
    serve("admin", addr, router).await?;
    Ok(())
}
