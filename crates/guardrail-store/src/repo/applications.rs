//! Application queries and creation lifecycle (§3 Application, §3 Lifecycle
//! "Application create").

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Application, LanguageText};
use crate::repo::scanners::effective_scanner_rows;
use crate::{Error, Result};

pub async fn find_by_api_key(pool: &PgPool, api_key: &str) -> Result<Option<Application>> {
    let app = sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE application_api_key = $1")
        .bind(api_key)
        .fetch_optional(pool)
        .await?;
    Ok(app)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Application> {
    sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("application {id}")))
}

/// Find the application owned by `tenant_id` named exactly `name` — used by
/// the `X-OG-Application-ID` auto-discovery path's tenant-key branch (§4.3).
pub async fn find_by_tenant_and_external_id(
    pool: &PgPool,
    tenant_id: Uuid,
    external_app_id: &str,
) -> Result<Option<Application>> {
    let app = sqlx::query_as::<_, Application>(
        "SELECT * FROM applications WHERE tenant_id = $1 AND id::text = $2",
    )
    .bind(tenant_id)
    .bind(external_app_id)
    .fetch_optional(pool)
    .await?;
    Ok(app)
}

/// Atomically create an Application plus every row its effective scanner set
/// needs: default RiskTypeConfig, data-leakage/gateway policy rows, an
/// ApplicationScannerConfig per available scanner, and a ResponseTemplate
/// for every scanner in the effective set (§3 Lifecycle "Application create").
pub async fn create(pool: &PgPool, tenant_id: Uuid, name: &str, api_key: &str) -> Result<Application> {
    let mut tx = pool.begin().await?;

    let app = sqlx::query_as::<_, Application>(
        "INSERT INTO applications (tenant_id, name, application_api_key) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(tenant_id)
    .bind(name)
    .bind(api_key)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO risk_type_configs (application_id, enabled_flags) VALUES ($1, $2)",
    )
    .bind(app.id)
    .bind(sqlx::types::Json(json!([true; 21])))
    .execute(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO application_data_leakage_policies (application_id) VALUES ($1)")
        .bind(app.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO application_gateway_policies (application_id) VALUES ($1)")
        .bind(app.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO appeal_configs (application_id) VALUES ($1)")
        .bind(app.id)
        .execute(&mut *tx)
        .await?;

    let scanners = effective_scanner_rows(pool, tenant_id, app.id).await?;
    for scanner in &scanners {
        sqlx::query(
            "INSERT INTO application_scanner_configs (application_id, scanner_id, is_enabled) VALUES ($1, $2, true)
             ON CONFLICT (application_id, scanner_id) DO NOTHING",
        )
        .bind(app.id)
        .bind(scanner.id)
        .execute(&mut *tx)
        .await?;

        let default_content = LanguageText {
            en: format!("This request was blocked ({}).", scanner.name),
            zh: Some(format!("该请求已被拦截（{}）。", scanner.name)),
            other: Default::default(),
        };
        sqlx::query(
            "INSERT INTO response_templates (application_id, scanner_type, scanner_identifier, content)
             VALUES ($1, 'scanner', $2, $3)
             ON CONFLICT (application_id, scanner_type, scanner_identifier) DO NOTHING",
        )
        .bind(app.id)
        .bind(&scanner.tag)
        .bind(sqlx::types::Json(default_content))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(app)
}

/// Deactivate an application in place (soft delete of the config boundary,
/// not a row delete — detection logs and historical configs stay intact).
pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("UPDATE applications SET active = false WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("application {id}")));
    }
    Ok(())
}
