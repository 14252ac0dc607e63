//! Detection result log (§3 DetectionResult, invariant 5 "immutable,
//! unique per request_id") and appeal records (§3 AppealRecord, AppealConfig).

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AppealConfig, AppealRecord, AppealStatus, DetectionResult};
use crate::{Error, Result};

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    pool: &PgPool,
    request_id: Uuid,
    application_id: Uuid,
    tenant_id: Uuid,
    content: &str,
    security_risk_level: &str,
    security_categories: &[String],
    compliance_risk_level: &str,
    compliance_categories: &[String],
    data_risk_level: &str,
    data_categories: &[String],
    suggest_action: &str,
    suggest_answer: Option<&str>,
    model_response: Option<&str>,
    score: Option<f32>,
    image_paths: &[String],
) -> Result<()> {
    // ON CONFLICT DO NOTHING preserves the one-row-per-request invariant
    // under retry: the gateway may re-submit the same request_id after a
    // timeout without risking a duplicate log entry.
    sqlx::query(
        "INSERT INTO detection_results
            (request_id, application_id, tenant_id, content,
             security_risk_level, security_categories,
             compliance_risk_level, compliance_categories,
             data_risk_level, data_categories,
             suggest_action, suggest_answer, model_response, score, image_paths)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         ON CONFLICT (request_id) DO NOTHING",
    )
    .bind(request_id)
    .bind(application_id)
    .bind(tenant_id)
    .bind(content)
    .bind(security_risk_level)
    .bind(sqlx::types::Json(security_categories.to_vec()))
    .bind(compliance_risk_level)
    .bind(sqlx::types::Json(compliance_categories.to_vec()))
    .bind(data_risk_level)
    .bind(sqlx::types::Json(data_categories.to_vec()))
    .bind(suggest_action)
    .bind(suggest_answer)
    .bind(model_response)
    .bind(score)
    .bind(sqlx::types::Json(image_paths.to_vec()))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_request_id(pool: &PgPool, request_id: Uuid) -> Result<DetectionResult> {
    sqlx::query_as::<_, DetectionResult>("SELECT * FROM detection_results WHERE request_id = $1")
        .bind(request_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("detection result {request_id}")))
}

pub async fn list_for_application(
    pool: &PgPool,
    application_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<DetectionResult>> {
    let rows = sqlx::query_as::<_, DetectionResult>(
        "SELECT * FROM detection_results WHERE application_id = $1
         ORDER BY created_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(application_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn appeal_config(pool: &PgPool, application_id: Uuid) -> Result<Option<AppealConfig>> {
    let cfg = sqlx::query_as::<_, AppealConfig>("SELECT * FROM appeal_configs WHERE application_id = $1")
        .bind(application_id)
        .fetch_optional(pool)
        .await?;
    Ok(cfg)
}

pub async fn submit_appeal(pool: &PgPool, request_id: Uuid) -> Result<AppealRecord> {
    let record = sqlx::query_as::<_, AppealRecord>(
        "INSERT INTO appeal_records (request_id, status) VALUES ($1, $2) RETURNING *",
    )
    .bind(request_id)
    .bind(AppealStatus::Pending)
    .fetch_one(pool)
    .await?;
    Ok(record)
}

pub async fn record_ai_verdict(pool: &PgPool, id: Uuid, verdict: &str) -> Result<()> {
    sqlx::query("UPDATE appeal_records SET status = $2, ai_verdict = $3 WHERE id = $1")
        .bind(id)
        .bind(AppealStatus::AiReviewed)
        .bind(verdict)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn record_human_verdict(pool: &PgPool, id: Uuid, verdict: &str) -> Result<()> {
    sqlx::query("UPDATE appeal_records SET status = $2, human_verdict = $3 WHERE id = $1")
        .bind(id)
        .bind(AppealStatus::HumanReviewed)
        .bind(verdict)
        .execute(pool)
        .await?;
    Ok(())
}
