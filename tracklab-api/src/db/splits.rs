//! Royalty split entry queries
//!
//! Read side only; insertion happens inside the ledger transaction in
//! [`crate::ledger`].

use super::decode_err;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracklab_common::db::models::RoyaltySplit;
use tracklab_common::SharePercent;
use uuid::Uuid;

/// All entries for a release in insertion order (rowid ascending).
pub async fn list_for_release(
    pool: &SqlitePool,
    release_guid: Uuid,
) -> Result<Vec<RoyaltySplit>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, release_guid, recipient, share_hundredths, created_at
        FROM royalty_splits
        WHERE release_guid = ?
        ORDER BY id ASC
        "#,
    )
    .bind(release_guid.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(split_from_row).collect()
}

fn split_from_row(row: sqlx::sqlite::SqliteRow) -> Result<RoyaltySplit, sqlx::Error> {
    let release_str: String = row.get("release_guid");
    let release_guid =
        Uuid::parse_str(&release_str).map_err(|e| decode_err("release_guid", e))?;

    let created_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_str)
        .map_err(|e| decode_err("created_at", e))?
        .with_timezone(&Utc);

    Ok(RoyaltySplit {
        id: row.get("id"),
        release_guid,
        recipient: row.get("recipient"),
        share_percentage: SharePercent::from_hundredths(row.get("share_hundredths")),
        created_at,
    })
}
