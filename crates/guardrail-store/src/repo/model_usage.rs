//! Direct-model daily usage aggregation (§3 ModelUsage) — billing metering
//! for `direct_model_api_key` traffic, which never runs detection and so
//! never produces a `DetectionResult` row.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ModelUsage;
use crate::Result;

/// Increment today's `(tenant, model)` aggregate by one request and the
/// given token counts, creating the row if this is the first request of
/// the day.
pub async fn record(
    pool: &PgPool,
    tenant_id: Uuid,
    model: &str,
    input_tokens: i64,
    output_tokens: i64,
) -> Result<ModelUsage> {
    let today = Utc::now().date_naive();
    let row = sqlx::query_as::<_, ModelUsage>(
        "INSERT INTO model_usage (tenant_id, model, usage_date, requests, input_tokens, output_tokens, total_tokens)
         VALUES ($1, $2, $3, 1, $4, $5, $4 + $5)
         ON CONFLICT (tenant_id, model, usage_date) DO UPDATE SET
             requests = model_usage.requests + 1,
             input_tokens = model_usage.input_tokens + EXCLUDED.input_tokens,
             output_tokens = model_usage.output_tokens + EXCLUDED.output_tokens,
             total_tokens = model_usage.total_tokens + EXCLUDED.total_tokens
         RETURNING *",
    )
    .bind(tenant_id)
    .bind(model)
    .bind(today)
    .bind(input_tokens)
    .bind(output_tokens)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn for_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Vec<ModelUsage>> {
    let rows = sqlx::query_as::<_, ModelUsage>(
        "SELECT * FROM model_usage WHERE tenant_id = $1 ORDER BY usage_date DESC, model",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
