//! Scanner, package, and application-scanner-config queries (§3 Scanner,
//! ScannerPackage, ApplicationScannerConfig, CustomScanner; invariant 3
//! "effective scanner set").

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{PackageType, RiskLevelColumn, ScannerRow};
use crate::{Error, Result};
use guardrail_core::{Dimension, RiskLevel, ScannerDefinition, ScannerKind, ScannerOverride};

fn risk_level_from_column(level: RiskLevelColumn) -> RiskLevel {
    match level {
        RiskLevelColumn::HighRisk => RiskLevel::HighRisk,
        RiskLevelColumn::MediumRisk => RiskLevel::MediumRisk,
        RiskLevelColumn::LowRisk => RiskLevel::LowRisk,
    }
}

fn scanner_kind_from_column(kind: crate::models::ScannerType) -> ScannerKind {
    match kind {
        crate::models::ScannerType::Genai => ScannerKind::Genai,
        crate::models::ScannerType::Regex => ScannerKind::Regex,
        crate::models::ScannerType::Keyword => ScannerKind::Keyword,
    }
}

fn dimension_from_str(s: &str) -> Dimension {
    match s {
        "security" => Dimension::Security,
        "data" => Dimension::Data,
        _ => Dimension::Compliance,
    }
}

pub fn to_core_definition(row: &ScannerRow) -> ScannerDefinition {
    ScannerDefinition {
        tag: row.tag.clone(),
        name: row.name.clone(),
        description: row.description.clone(),
        kind: scanner_kind_from_column(row.scanner_type),
        definition: row.definition.clone(),
        dimension: dimension_from_str(&row.dimension),
        default_risk_level: risk_level_from_column(row.default_risk_level),
        default_scan_prompt: row.default_scan_prompt,
        default_scan_response: row.default_scan_response,
        active: row.active,
    }
}

/// The rows composing an application's effective scanner set (§3 invariant
/// 3): built-in scanners ∪ scanners in purchased-and-approved premium
/// packages (or every premium package for super-admins) ∪ custom scanners
/// owned by this application.
pub async fn effective_scanner_rows(
    pool: &PgPool,
    tenant_id: Uuid,
    application_id: Uuid,
) -> Result<Vec<ScannerRow>> {
    let is_super_admin: bool = sqlx::query_scalar("SELECT is_super_admin FROM tenants WHERE id = $1")
        .bind(tenant_id)
        .fetch_optional(pool)
        .await?
        .unwrap_or(false);

    let rows = if is_super_admin {
        sqlx::query_as::<_, ScannerRow>(
            "SELECT s.* FROM scanners s
             LEFT JOIN scanner_packages p ON p.id = s.package_id
             WHERE s.active = true
               AND (p.package_type IS NULL OR p.package_type IN ('builtin', 'purchasable'))
             UNION
             SELECT s.* FROM scanners s
             JOIN custom_scanners cs ON cs.scanner_id = s.id
             WHERE cs.application_id = $1 AND s.active = true",
        )
        .bind(application_id)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, ScannerRow>(
            "SELECT s.* FROM scanners s
             LEFT JOIN scanner_packages p ON p.id = s.package_id
             WHERE s.active = true AND (p.package_type IS NULL OR p.package_type = 'builtin')
             UNION
             SELECT s.* FROM scanners s
             JOIN scanner_packages p ON p.id = s.package_id
             JOIN package_purchases pp ON pp.package_id = p.id
             WHERE pp.tenant_id = $1 AND pp.status = 'approved' AND s.active = true
             UNION
             SELECT s.* FROM scanners s
             JOIN custom_scanners cs ON cs.scanner_id = s.id
             WHERE cs.application_id = $2 AND s.active = true",
        )
        .bind(tenant_id)
        .bind(application_id)
        .fetch_all(pool)
        .await?
    };

    Ok(rows)
}

/// Load the application's effective scanner set, merged with its
/// per-application overrides, ready for `ScannerEngine::evaluate`.
pub async fn effective_scanners(
    pool: &PgPool,
    tenant_id: Uuid,
    application_id: Uuid,
) -> Result<Vec<guardrail_core::EffectiveScanner>> {
    let rows = effective_scanner_rows(pool, tenant_id, application_id).await?;

    let overrides: Vec<(Uuid, bool, Option<RiskLevelColumn>, Option<bool>, Option<bool>)> = sqlx::query_as(
        "SELECT scanner_id, is_enabled, risk_level_override, scan_prompt_override, scan_response_override
         FROM application_scanner_configs WHERE application_id = $1",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await?;

    let overrides: std::collections::HashMap<Uuid, ScannerOverride> = overrides
        .into_iter()
        .map(|(scanner_id, is_enabled, risk, prompt, response)| {
            (
                scanner_id,
                ScannerOverride {
                    is_enabled,
                    risk_level: risk.map(risk_level_from_column),
                    scan_prompt: prompt,
                    scan_response: response,
                },
            )
        })
        .collect();

    let effective = rows
        .into_iter()
        .map(|row| {
            let over = overrides.get(&row.id);
            let def = to_core_definition(&row);
            guardrail_core::EffectiveScanner::from_definition(def, over)
        })
        .collect();

    Ok(effective)
}

/// Soft-delete a scanner: rename its tag with a `_deleted_<unix_ts>` suffix
/// and flip `active` false in the same statement, preserving the unique tag
/// index (§3 "Soft-deletion"). `ApplicationScannerConfig` rows are left in
/// place intentionally.
pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<()> {
    let ts = Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE scanners SET tag = tag || '_deleted_' || $2::text, active = false WHERE id = $1 AND active = true",
    )
    .bind(id)
    .bind(ts)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("active scanner {id}")));
    }
    Ok(())
}

pub async fn find_package_by_name(pool: &PgPool, name: &str) -> Result<Option<crate::models::ScannerPackage>> {
    let pkg = sqlx::query_as::<_, crate::models::ScannerPackage>("SELECT * FROM scanner_packages WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(pkg)
}

/// Idempotently upsert a built-in scanner package at startup (§3
/// "loaded from JSON at startup and idempotently upserted").
pub async fn upsert_builtin_package(pool: &PgPool, name: &str, description: &str) -> Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO scanner_packages (name, package_type, description) VALUES ($1, $2, $3)
         ON CONFLICT (name) DO UPDATE SET description = EXCLUDED.description
         RETURNING id",
    )
    .bind(name)
    .bind(PackageType::Builtin)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

#[allow(clippy::too_many_arguments)]
pub async fn upsert_scanner(
    pool: &PgPool,
    package_id: Option<Uuid>,
    definition: &ScannerDefinition,
) -> Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO scanners (package_id, tag, name, description, scanner_type, definition, dimension,
                                default_risk_level, default_scan_prompt, default_scan_response, active)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, true)
         ON CONFLICT (tag) DO UPDATE SET
             name = EXCLUDED.name, description = EXCLUDED.description, definition = EXCLUDED.definition,
             default_risk_level = EXCLUDED.default_risk_level,
             default_scan_prompt = EXCLUDED.default_scan_prompt,
             default_scan_response = EXCLUDED.default_scan_response
         RETURNING id",
    )
    .bind(package_id)
    .bind(&definition.tag)
    .bind(&definition.name)
    .bind(&definition.description)
    .bind(match definition.kind {
        ScannerKind::Genai => crate::models::ScannerType::Genai,
        ScannerKind::Regex => crate::models::ScannerType::Regex,
        ScannerKind::Keyword => crate::models::ScannerType::Keyword,
    })
    .bind(&definition.definition)
    .bind(match definition.dimension {
        Dimension::Compliance => "compliance",
        Dimension::Security => "security",
        Dimension::Data => "data",
    })
    .bind(match definition.default_risk_level {
        RiskLevel::HighRisk => RiskLevelColumn::HighRisk,
        RiskLevel::MediumRisk => RiskLevelColumn::MediumRisk,
        RiskLevel::LowRisk | RiskLevel::NoRisk => RiskLevelColumn::LowRisk,
    })
    .bind(definition.default_scan_prompt)
    .bind(definition.default_scan_response)
    .fetch_one(pool)
    .await?;
    Ok(id)
}
