//! Tenant and subscription queries (§3 Tenant, TenantSubscription).

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{SubscriptionType, Tenant, TenantSubscription};
use crate::{Error, Result};

pub async fn find_by_api_key(pool: &PgPool, api_key: &str) -> Result<Option<Tenant>> {
    let tenant = sqlx::query_as::<_, Tenant>(
        "SELECT * FROM tenants WHERE tenant_api_key = $1 OR direct_model_api_key = $1",
    )
    .bind(api_key)
    .fetch_optional(pool)
    .await?;
    Ok(tenant)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Tenant>> {
    let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(tenant)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Tenant> {
    sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("tenant {id}")))
}

/// Register a new tenant: creates the tenant row, a free subscription with
/// `usage_reset_at = now + 30 days` (§3 Lifecycle "Tenant registration"),
/// and returns the tenant. The caller creates the default Application and
/// rate-limit config separately (different tables, same transaction in the
/// admin API handler).
pub async fn register(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    tenant_api_key: &str,
) -> Result<Tenant> {
    let mut tx = pool.begin().await?;

    let tenant = sqlx::query_as::<_, Tenant>(
        "INSERT INTO tenants (email, password_hash, tenant_api_key) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(email)
    .bind(password_hash)
    .bind(tenant_api_key)
    .fetch_one(&mut *tx)
    .await?;

    let reset_at = Utc::now() + Duration::days(30);
    sqlx::query(
        "INSERT INTO tenant_subscriptions (tenant_id, subscription_type, monthly_quota, current_month_usage, usage_reset_at)
         VALUES ($1, $2, $3, 0, $4)",
    )
    .bind(tenant.id)
    .bind(SubscriptionType::Free)
    .bind(10_000_i64)
    .bind(reset_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(tenant)
}

pub async fn subscription(pool: &PgPool, tenant_id: Uuid) -> Result<TenantSubscription> {
    sqlx::query_as::<_, TenantSubscription>("SELECT * FROM tenant_subscriptions WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("subscription for tenant {tenant_id}")))
}

/// Increment a tenant's monthly usage counter. Never decrements outside the
/// scheduled reset (§3 invariant 6).
pub async fn increment_usage(pool: &PgPool, tenant_id: Uuid, by: i64) -> Result<()> {
    sqlx::query("UPDATE tenant_subscriptions SET current_month_usage = current_month_usage + $2 WHERE tenant_id = $1")
        .bind(tenant_id)
        .bind(by)
        .execute(pool)
        .await?;
    Ok(())
}

/// Reset every subscription whose `usage_reset_at` has passed, advancing the
/// next reset by 30 days. Intended to be run on a schedule (§3 invariant 6
/// "only decrement path").
pub async fn reset_due_usage(pool: &PgPool) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE tenant_subscriptions
         SET current_month_usage = 0, usage_reset_at = usage_reset_at + INTERVAL '30 days'
         WHERE usage_reset_at <= now()",
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
