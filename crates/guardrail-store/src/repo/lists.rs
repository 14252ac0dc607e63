//! Blacklist/Whitelist CRUD and the disposition-resolver feed (§3 Blacklist,
//! Whitelist), converting rows into the plain structs
//! `guardrail_scanners::disposition` consumes.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Blacklist, Whitelist};
use crate::{Error, Result};
use guardrail_scanners::disposition::{BlacklistEntry, WhitelistEntry};

pub async fn whitelists_for_application(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<Vec<WhitelistEntry>> {
    let rows = sqlx::query_as::<_, Whitelist>(
        "SELECT * FROM whitelists WHERE application_id = $1 AND active = true",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .flat_map(|row| row.keywords.0.into_iter().map(|keyword| WhitelistEntry { keyword }))
        .collect())
}

pub async fn blacklists_for_application(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<Vec<BlacklistEntry>> {
    let rows = sqlx::query_as::<_, Blacklist>(
        "SELECT * FROM blacklists WHERE application_id = $1 AND active = true",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| BlacklistEntry { list_name: row.name, keywords: row.keywords.0 })
        .collect())
}

pub async fn create_whitelist(
    pool: &PgPool,
    application_id: Uuid,
    name: &str,
    keywords: &[String],
) -> Result<Whitelist> {
    let row = sqlx::query_as::<_, Whitelist>(
        "INSERT INTO whitelists (application_id, name, keywords) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(application_id)
    .bind(name)
    .bind(sqlx::types::Json(keywords.to_vec()))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn create_blacklist(
    pool: &PgPool,
    application_id: Uuid,
    name: &str,
    keywords: &[String],
) -> Result<Blacklist> {
    let row = sqlx::query_as::<_, Blacklist>(
        "INSERT INTO blacklists (application_id, name, keywords) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(application_id)
    .bind(name)
    .bind(sqlx::types::Json(keywords.to_vec()))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn deactivate_whitelist(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("UPDATE whitelists SET active = false WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("whitelist {id}")));
    }
    Ok(())
}

pub async fn deactivate_blacklist(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("UPDATE blacklists SET active = false WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("blacklist {id}")));
    }
    Ok(())
}
