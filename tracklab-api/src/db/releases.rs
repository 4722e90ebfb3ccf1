//! Release database operations
//!
//! Every read or mutation that acts on behalf of a caller filters by
//! `guid AND owner_guid` in one step, so a missing release and a release
//! owned by someone else are indistinguishable to the caller.

use super::decode_err;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracklab_common::db::models::{Release, ReleaseStatus};
use uuid::Uuid;

pub async fn insert_release(pool: &SqlitePool, release: &Release) -> Result<(), sqlx::Error> {
    let metadata = release
        .metadata
        .as_ref()
        .map(|m| m.to_string());

    sqlx::query(
        r#"
        INSERT INTO releases
            (guid, title, artist, status, cover_url, audio_url, metadata, owner_guid, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(release.guid.to_string())
    .bind(&release.title)
    .bind(&release.artist)
    .bind(release.status.as_str())
    .bind(&release.cover_url)
    .bind(&release.audio_url)
    .bind(metadata)
    .bind(release.owner_guid.to_string())
    .bind(release.created_at.to_rfc3339())
    .bind(release.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_by_owner(pool: &SqlitePool, owner: Uuid) -> Result<Vec<Release>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT guid, title, artist, status, cover_url, audio_url, metadata, owner_guid, created_at, updated_at
        FROM releases
        WHERE owner_guid = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(release_from_row).collect()
}

pub async fn get_owned(
    pool: &SqlitePool,
    guid: Uuid,
    owner: Uuid,
) -> Result<Option<Release>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT guid, title, artist, status, cover_url, audio_url, metadata, owner_guid, created_at, updated_at
        FROM releases
        WHERE guid = ? AND owner_guid = ?
        "#,
    )
    .bind(guid.to_string())
    .bind(owner.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(release_from_row).transpose()
}

/// Owner-scoped status/metadata update. Returns false when no owned row
/// matched. The owner reference itself is immutable and never updated.
pub async fn update_owned(
    pool: &SqlitePool,
    guid: Uuid,
    owner: Uuid,
    status: ReleaseStatus,
    metadata: Option<&serde_json::Value>,
) -> Result<bool, sqlx::Error> {
    let touched = sqlx::query(
        r#"
        UPDATE releases
        SET status = ?, metadata = ?, updated_at = ?
        WHERE guid = ? AND owner_guid = ?
        "#,
    )
    .bind(status.as_str())
    .bind(metadata.map(|m| m.to_string()))
    .bind(Utc::now().to_rfc3339())
    .bind(guid.to_string())
    .bind(owner.to_string())
    .execute(pool)
    .await?
    .rows_affected();

    Ok(touched > 0)
}

/// Owner-scoped deletion; split entries cascade via the foreign key.
pub async fn delete_owned(
    pool: &SqlitePool,
    guid: Uuid,
    owner: Uuid,
) -> Result<bool, sqlx::Error> {
    let touched = sqlx::query("DELETE FROM releases WHERE guid = ? AND owner_guid = ?")
        .bind(guid.to_string())
        .bind(owner.to_string())
        .execute(pool)
        .await?
        .rows_affected();

    Ok(touched > 0)
}

fn release_from_row(row: sqlx::sqlite::SqliteRow) -> Result<Release, sqlx::Error> {
    let guid_str: String = row.get("guid");
    let guid = Uuid::parse_str(&guid_str).map_err(|e| decode_err("guid", e))?;

    let owner_str: String = row.get("owner_guid");
    let owner_guid = Uuid::parse_str(&owner_str).map_err(|e| decode_err("owner_guid", e))?;

    let status_str: String = row.get("status");
    let status = ReleaseStatus::parse(&status_str)
        .ok_or_else(|| decode_err("status", format!("unknown status {status_str:?}")))?;

    let metadata: Option<String> = row.get("metadata");
    let metadata = metadata
        .map(|m| serde_json::from_str(&m).map_err(|e| decode_err("metadata", e)))
        .transpose()?;

    let created_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_str)
        .map_err(|e| decode_err("created_at", e))?
        .with_timezone(&Utc);

    let updated_str: String = row.get("updated_at");
    let updated_at = DateTime::parse_from_rfc3339(&updated_str)
        .map_err(|e| decode_err("updated_at", e))?
        .with_timezone(&Utc);

    Ok(Release {
        guid,
        title: row.get("title"),
        artist: row.get("artist"),
        status,
        cover_url: row.get("cover_url"),
        audio_url: row.get("audio_url"),
        metadata,
        owner_guid,
        created_at,
        updated_at,
    })
}
