//! Upstream API config and model-route resolution (§3 UpstreamApiConfig,
//! ModelRoute, ModelRouteApplication).

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::UpstreamApiConfig;
use crate::{Error, Result};

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<UpstreamApiConfig> {
    sqlx::query_as::<_, UpstreamApiConfig>("SELECT * FROM upstream_api_configs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("upstream api config {id}")))
}

pub async fn list_for_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Vec<UpstreamApiConfig>> {
    let rows = sqlx::query_as::<_, UpstreamApiConfig>(
        "SELECT * FROM upstream_api_configs WHERE tenant_id = $1 ORDER BY created_at",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Resolve the `UpstreamApiConfig` a requested `model` name should route to
/// for `application_id` (§3 ModelRoute/ModelRouteApplication): exact-match
/// routes win over prefix-match routes, ties broken by `priority` descending,
/// scoped to routes that list this application (or list none, meaning
/// tenant-wide).
pub async fn resolve_route(
    pool: &PgPool,
    tenant_id: Uuid,
    application_id: Uuid,
    model: &str,
) -> Result<Option<UpstreamApiConfig>> {
    let row: Option<UpstreamApiConfig> = sqlx::query_as(
        "SELECT uac.* FROM model_routes r
         JOIN upstream_api_configs uac ON uac.id = r.upstream_api_config_id
         WHERE r.tenant_id = $1
           AND (
               (r.match_type = 'exact' AND r.model_pattern = $2)
               OR (r.match_type = 'prefix' AND $2 LIKE r.model_pattern || '%')
           )
           AND (
               NOT EXISTS (SELECT 1 FROM model_route_applications mra WHERE mra.model_route_id = r.id)
               OR EXISTS (
                   SELECT 1 FROM model_route_applications mra
                   WHERE mra.model_route_id = r.id AND mra.application_id = $3
               )
           )
         ORDER BY (r.match_type = 'exact') DESC, r.priority DESC
         LIMIT 1",
    )
    .bind(tenant_id)
    .bind(model)
    .bind(application_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Pick a "safe" (data-safe-labeled) upstream for a tenant, highest
/// `safe_model_priority` first, used when `DataDisposalAction::SwitchPrivateModel`
/// fires (§4.2 step 4).
pub async fn resolve_safe_model(pool: &PgPool, tenant_id: Uuid) -> Result<Option<UpstreamApiConfig>> {
    let row: Option<UpstreamApiConfig> = sqlx::query_as(
        "SELECT * FROM upstream_api_configs
         WHERE tenant_id = $1 AND is_data_safe = true
         ORDER BY safe_model_priority DESC
         LIMIT 1",
    )
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn default_private_model(pool: &PgPool, tenant_id: Uuid) -> Result<Option<UpstreamApiConfig>> {
    let row: Option<UpstreamApiConfig> = sqlx::query_as(
        "SELECT * FROM upstream_api_configs
         WHERE tenant_id = $1 AND is_default_private_model = true
         LIMIT 1",
    )
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    tenant_id: Uuid,
    config_name: &str,
    provider: &str,
    base_url: &str,
    encrypted_api_key: &str,
    is_data_safe: bool,
    is_default_private_model: bool,
) -> Result<UpstreamApiConfig> {
    let row = sqlx::query_as::<_, UpstreamApiConfig>(
        "INSERT INTO upstream_api_configs
            (tenant_id, config_name, provider, base_url, encrypted_api_key, is_data_safe, is_default_private_model)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(tenant_id)
    .bind(config_name)
    .bind(provider)
    .bind(base_url)
    .bind(encrypted_api_key)
    .bind(is_data_safe)
    .bind(is_default_private_model)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
