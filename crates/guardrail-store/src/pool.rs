//! Postgres connection pool + embedded migrations.

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::Result;

/// Embedded migration set, run once at startup from each binary's `main.rs`
/// (`guardrail_store::MIGRATOR.run(&pool).await?`).
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Open a pool against `database_url`, sized for the calling binary's
/// expected concurrency (the admin/detection/proxy binaries each pass their
/// own `max_connections` from configuration).
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}
