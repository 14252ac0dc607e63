//! Data-leakage and gateway policy resolution (§3 Tenant/Application
//! DataLeakagePolicy, Tenant/Application GatewayPolicy): an application's
//! policy falls back tier-by-tier to its tenant's policy, then to the
//! hardcoded platform default (§4.2 `DataLeakagePolicy`/`GatewayPolicy`
//! `Default` impls), per field.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{DataDisposalActionColumn, GatewayDisposalActionColumn, TriggerLevel};
use crate::Result;
use guardrail_core::{DataDisposalAction, GatewayDisposalAction, RiskLevel};
use guardrail_scanners::disposition::{DataLeakagePolicy, GatewayPolicy};

fn trigger_level(t: TriggerLevel) -> RiskLevel {
    match t {
        TriggerLevel::Low => RiskLevel::LowRisk,
        TriggerLevel::Medium => RiskLevel::MediumRisk,
        TriggerLevel::High => RiskLevel::HighRisk,
    }
}

fn data_action(c: DataDisposalActionColumn) -> DataDisposalAction {
    match c {
        DataDisposalActionColumn::Block => DataDisposalAction::Block,
        DataDisposalActionColumn::SwitchPrivateModel => DataDisposalAction::SwitchPrivateModel,
        DataDisposalActionColumn::Anonymize => DataDisposalAction::Anonymize,
        DataDisposalActionColumn::Pass => DataDisposalAction::Pass,
    }
}

fn gateway_action(c: GatewayDisposalActionColumn) -> GatewayDisposalAction {
    match c {
        GatewayDisposalActionColumn::Block => GatewayDisposalAction::Block,
        GatewayDisposalActionColumn::Replace => GatewayDisposalAction::Replace,
        GatewayDisposalActionColumn::Pass => GatewayDisposalAction::Pass,
    }
}

/// Resolve the effective `DataLeakagePolicy` for `application_id`: each of
/// high/medium/low is taken from the application override if set, else the
/// tenant policy, else the platform default. Also returns the resolved safe
/// model id, same fallback order (application override, then tenant).
pub async fn data_leakage_policy(
    pool: &PgPool,
    tenant_id: Uuid,
    application_id: Uuid,
) -> Result<(DataLeakagePolicy, Option<Uuid>)> {
    let tenant_row: Option<(DataDisposalActionColumn, DataDisposalActionColumn, DataDisposalActionColumn, Option<Uuid>)> =
        sqlx::query_as(
            "SELECT high, medium, low, safe_model_id FROM tenant_data_leakage_policies WHERE tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_optional(pool)
        .await?;

    let app_row: Option<(
        Option<DataDisposalActionColumn>,
        Option<DataDisposalActionColumn>,
        Option<DataDisposalActionColumn>,
        Option<Uuid>,
    )> = sqlx::query_as(
        "SELECT high, medium, low, safe_model_id FROM application_data_leakage_policies WHERE application_id = $1",
    )
    .bind(application_id)
    .fetch_optional(pool)
    .await?;

    let default = DataLeakagePolicy::default();
    let tenant = tenant_row.as_ref();

    let high = app_row
        .as_ref()
        .and_then(|r| r.0)
        .map(data_action)
        .or_else(|| tenant.map(|t| data_action(t.0)))
        .unwrap_or(default.high);
    let medium = app_row
        .as_ref()
        .and_then(|r| r.1)
        .map(data_action)
        .or_else(|| tenant.map(|t| data_action(t.1)))
        .unwrap_or(default.medium);
    let low = app_row
        .as_ref()
        .and_then(|r| r.2)
        .map(data_action)
        .or_else(|| tenant.map(|t| data_action(t.2)))
        .unwrap_or(default.low);

    let safe_model_id = app_row
        .and_then(|r| r.3)
        .or_else(|| tenant.and_then(|t| t.3));

    Ok((DataLeakagePolicy { high, medium, low }, safe_model_id))
}

/// Resolve the effective `GatewayPolicy` for `application_id`, same
/// application-then-tenant-then-default fallback as `data_leakage_policy`.
pub async fn gateway_policy(
    pool: &PgPool,
    tenant_id: Uuid,
    application_id: Uuid,
) -> Result<GatewayPolicy> {
    let tenant_row: Option<(GatewayDisposalActionColumn, GatewayDisposalActionColumn, GatewayDisposalActionColumn)> =
        sqlx::query_as("SELECT high, medium, low FROM tenant_gateway_policies WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_optional(pool)
            .await?;

    let app_row: Option<(
        Option<GatewayDisposalActionColumn>,
        Option<GatewayDisposalActionColumn>,
        Option<GatewayDisposalActionColumn>,
    )> = sqlx::query_as("SELECT high, medium, low FROM application_gateway_policies WHERE application_id = $1")
        .bind(application_id)
        .fetch_optional(pool)
        .await?;

    let default = GatewayPolicy::default();
    let tenant = tenant_row.as_ref();

    let high = app_row
        .as_ref()
        .and_then(|r| r.0)
        .map(gateway_action)
        .or_else(|| tenant.map(|t| gateway_action(t.0)))
        .unwrap_or(default.high);
    let medium = app_row
        .as_ref()
        .and_then(|r| r.1)
        .map(gateway_action)
        .or_else(|| tenant.map(|t| gateway_action(t.1)))
        .unwrap_or(default.medium);
    let low = app_row
        .as_ref()
        .and_then(|r| r.2)
        .map(gateway_action)
        .or_else(|| tenant.map(|t| gateway_action(t.2)))
        .unwrap_or(default.low);

    Ok(GatewayPolicy { high, medium, low })
}

/// Resolve the RiskTypeConfig-derived `SensitivityConfig` for an application
/// (§3 RiskTypeConfig thresholds + trigger level).
pub async fn sensitivity_config(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<guardrail_core::SensitivityConfig> {
    let row: Option<(f32, f32, f32, TriggerLevel)> = sqlx::query_as(
        "SELECT high_threshold, medium_threshold, low_threshold, trigger_level FROM risk_type_configs WHERE application_id = $1",
    )
    .bind(application_id)
    .fetch_optional(pool)
    .await?;

    let default = guardrail_core::SensitivityConfig::default();
    Ok(match row {
        Some((high_threshold, medium_threshold, low_threshold, level)) => guardrail_core::SensitivityConfig {
            high_threshold,
            medium_threshold,
            low_threshold,
            trigger_level: trigger_level(level),
        },
        None => default,
    })
}
