//! Response-template and knowledge-base queries (§3 ResponseTemplate,
//! KnowledgeBase; §4.2 step 5 "Knowledge Base... static response templates").

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{KnowledgeBase, LanguageText, ResponseTemplate};
use crate::Result;

/// Every response template for `application_id`, keyed by `scanner_identifier`
/// (a scanner tag or blacklist name) so the disposition resolver's
/// `TemplateProvider` can look categories up by name directly.
pub async fn templates_for_application(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<HashMap<String, LanguageText>> {
    let rows = sqlx::query_as::<_, ResponseTemplate>(
        "SELECT * FROM response_templates WHERE application_id = $1",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| (row.scanner_identifier, row.content.0)).collect())
}

pub async fn upsert_template(
    pool: &PgPool,
    application_id: Uuid,
    scanner_type: &str,
    scanner_identifier: &str,
    content: &LanguageText,
) -> Result<ResponseTemplate> {
    let row = sqlx::query_as::<_, ResponseTemplate>(
        "INSERT INTO response_templates (application_id, scanner_type, scanner_identifier, content)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (application_id, scanner_type, scanner_identifier)
         DO UPDATE SET content = EXCLUDED.content
         RETURNING *",
    )
    .bind(application_id)
    .bind(scanner_type)
    .bind(scanner_identifier)
    .bind(sqlx::types::Json(content.clone()))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Knowledge bases bound to `application_id`, plus every KB marked
/// `is_global` (shared across applications).
pub async fn knowledge_bases_for_application(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<Vec<KnowledgeBase>> {
    let rows = sqlx::query_as::<_, KnowledgeBase>(
        "SELECT * FROM knowledge_bases WHERE application_id = $1 OR is_global = true",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
