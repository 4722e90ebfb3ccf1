//! Royalty split ledger
//!
//! Maintains, per release, a set of percentage allocations whose total
//! never exceeds 100.00%, and rejects any addition that would violate that
//! bound. Entries are add-only; they disappear only when the parent
//! release is deleted.
//!
//! Concurrency: `add_split` runs its read-compute-write sequence inside a
//! single transaction whose FIRST statement is a write on the release row.
//! SQLite grants one write lock per database, so concurrent additions to
//! the same release serialize and the second writer always observes the
//! first writer's committed total. The same statement doubles as the
//! existence/ownership check.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracklab_common::db::models::RoyaltySplit;
use tracklab_common::validate::is_email_shaped;
use tracklab_common::SharePercent;
use uuid::Uuid;

/// Ledger operation failures
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Share must lie in (0, 100]
    #[error("share percentage must be greater than 0 and at most 100, got {0}")]
    ShareOutOfRange(SharePercent),

    /// Recipient is not email-shaped
    #[error("recipient must be a valid email address: {0:?}")]
    InvalidRecipient(String),

    /// Addition would push the per-release total past 100.00%.
    /// Carries the committed total so the caller can compute headroom.
    #[error("adding this split would exceed 100%; current total is {current_total}%")]
    ExceedsTotal { current_total: SharePercent },

    /// Release does not exist, or exists but is not owned by the caller.
    /// Deliberately a single undistinguished outcome.
    #[error("release not found or not permitted")]
    NotFound,

    /// Underlying persistence failure
    #[error("storage error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Add a split entry to a release owned by `owner_guid`.
///
/// All-or-nothing: either the entry is persisted with the per-release sum
/// still at or below 100.00%, or nothing changes.
pub async fn add_split(
    pool: &SqlitePool,
    release_guid: Uuid,
    owner_guid: Uuid,
    recipient: &str,
    share: SharePercent,
) -> Result<RoyaltySplit, LedgerError> {
    if !share.is_valid_entry() {
        return Err(LedgerError::ShareOutOfRange(share));
    }
    if !is_email_shaped(recipient) {
        return Err(LedgerError::InvalidRecipient(recipient.to_string()));
    }

    let mut tx = pool.begin().await?;
    let now = Utc::now();

    // Write first: takes the database write lock, serializing concurrent
    // adds against this release, and checks existence + ownership in one
    // owner-scoped filter.
    let touched = sqlx::query(
        "UPDATE releases SET updated_at = ? WHERE guid = ? AND owner_guid = ?",
    )
    .bind(now.to_rfc3339())
    .bind(release_guid.to_string())
    .bind(owner_guid.to_string())
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if touched == 0 {
        // Transaction rolls back on drop
        return Err(LedgerError::NotFound);
    }

    let current: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(share_hundredths), 0) FROM royalty_splits WHERE release_guid = ?",
    )
    .bind(release_guid.to_string())
    .fetch_one(&mut *tx)
    .await?;
    let current_total = SharePercent::from_hundredths(current);

    match current_total.checked_add(share) {
        Some(total) if total <= SharePercent::FULL => {}
        _ => return Err(LedgerError::ExceedsTotal { current_total }),
    }

    let id = sqlx::query(
        r#"
        INSERT INTO royalty_splits (release_guid, recipient, share_hundredths, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(release_guid.to_string())
    .bind(recipient)
    .bind(share.hundredths())
    .bind(now.to_rfc3339())
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    tx.commit().await?;

    Ok(RoyaltySplit {
        id,
        release_guid,
        recipient: recipient.to_string(),
        share_percentage: share,
        created_at: now,
    })
}

/// List all split entries for a release in insertion order.
///
/// Read-only; returns an empty vec when no entries exist. Ownership is
/// checked by the HTTP boundary before calling.
pub async fn list_splits(
    pool: &SqlitePool,
    release_guid: Uuid,
) -> Result<Vec<RoyaltySplit>, LedgerError> {
    crate::db::splits::list_for_release(pool, release_guid)
        .await
        .map_err(LedgerError::Database)
}

/// Sum of persisted shares for a release (0.00 when no entries exist).
pub async fn current_total(
    pool: &SqlitePool,
    release_guid: Uuid,
) -> Result<SharePercent, LedgerError> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(share_hundredths), 0) FROM royalty_splits WHERE release_guid = ?",
    )
    .bind(release_guid.to_string())
    .fetch_one(pool)
    .await?;
    Ok(SharePercent::from_hundredths(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracklab_common::auth::hash_password;
    use tracklab_common::db::models::{Release, ReleaseStatus, UserRole};
    use tracklab_common::db::init_memory_database;

    async fn seed_release(pool: &SqlitePool) -> (Uuid, Uuid) {
        let owner = Uuid::new_v4();
        crate::db::users::insert_user(
            pool,
            owner,
            "owner@example.com",
            &hash_password("password123").unwrap(),
            UserRole::MusicCreator,
        )
        .await
        .unwrap();

        let release = Release {
            guid: Uuid::new_v4(),
            title: "First Light".into(),
            artist: "Night Bus".into(),
            status: ReleaseStatus::Draft,
            cover_url: None,
            audio_url: None,
            metadata: None,
            owner_guid: owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        crate::db::releases::insert_release(pool, &release)
            .await
            .unwrap();
        (release.guid, owner)
    }

    fn pct(s: &str) -> SharePercent {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn add_and_list() {
        let pool = init_memory_database().await.unwrap();
        let (release, owner) = seed_release(&pool).await;

        let entry = add_split(&pool, release, owner, "payee@example.com", pct("35.50"))
            .await
            .unwrap();
        assert_eq!(entry.share_percentage, pct("35.50"));

        let splits = list_splits(&pool, release).await.unwrap();
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].recipient, "payee@example.com");
    }

    #[tokio::test]
    async fn exact_fill_then_reject() {
        let pool = init_memory_database().await.unwrap();
        let (release, owner) = seed_release(&pool).await;

        add_split(&pool, release, owner, "a@example.com", pct("100.00"))
            .await
            .unwrap();

        let err = add_split(&pool, release, owner, "b@example.com", pct("0.01"))
            .await
            .unwrap_err();
        match err {
            LedgerError::ExceedsTotal { current_total } => {
                assert_eq!(current_total, SharePercent::FULL);
            }
            other => panic!("expected ExceedsTotal, got {other:?}"),
        }
        assert_eq!(list_splits(&pool, release).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn boundary_just_over_and_exact() {
        let pool = init_memory_database().await.unwrap();
        let (release, owner) = seed_release(&pool).await;

        add_split(&pool, release, owner, "a@example.com", pct("60.00"))
            .await
            .unwrap();

        let err = add_split(&pool, release, owner, "b@example.com", pct("40.01"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ExceedsTotal { current_total } if current_total == pct("60.00")));

        add_split(&pool, release, owner, "b@example.com", pct("40.00"))
            .await
            .unwrap();
        assert_eq!(current_total(&pool, release).await.unwrap(), SharePercent::FULL);
    }

    #[tokio::test]
    async fn out_of_range_shares_rejected_without_state_change() {
        let pool = init_memory_database().await.unwrap();
        let (release, owner) = seed_release(&pool).await;

        let zero = add_split(&pool, release, owner, "a@example.com", pct("0")).await;
        assert!(matches!(zero, Err(LedgerError::ShareOutOfRange(_))));

        let over = add_split(&pool, release, owner, "a@example.com", pct("100.01")).await;
        assert!(matches!(over, Err(LedgerError::ShareOutOfRange(_))));

        assert!(list_splits(&pool, release).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_recipient_rejected() {
        let pool = init_memory_database().await.unwrap();
        let (release, owner) = seed_release(&pool).await;

        let err = add_split(&pool, release, owner, "not-an-email", pct("10.00"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRecipient(_)));
        assert!(list_splits(&pool, release).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ownership_isolation() {
        let pool = init_memory_database().await.unwrap();
        let (release, _owner) = seed_release(&pool).await;
        let stranger = Uuid::new_v4();

        let err = add_split(&pool, release, stranger, "a@example.com", pct("10.00"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound));
        assert!(list_splits(&pool, release).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_release_matches_foreign_ownership() {
        let pool = init_memory_database().await.unwrap();
        let (_release, owner) = seed_release(&pool).await;

        let err = add_split(&pool, Uuid::new_v4(), owner, "a@example.com", pct("10.00"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound));
    }

    #[tokio::test]
    async fn list_is_idempotent_and_insertion_ordered() {
        let pool = init_memory_database().await.unwrap();
        let (release, owner) = seed_release(&pool).await;

        for (recipient, share) in [
            ("first@example.com", "10.00"),
            ("second@example.com", "20.00"),
            ("third@example.com", "30.00"),
        ] {
            add_split(&pool, release, owner, recipient, pct(share))
                .await
                .unwrap();
        }

        let once = list_splits(&pool, release).await.unwrap();
        let twice = list_splits(&pool, release).await.unwrap();
        let recipients: Vec<_> = once.iter().map(|s| s.recipient.as_str()).collect();
        assert_eq!(
            recipients,
            ["first@example.com", "second@example.com", "third@example.com"]
        );
        assert_eq!(once.len(), twice.len());
        assert!(once
            .iter()
            .zip(&twice)
            .all(|(a, b)| a.id == b.id && a.share_percentage == b.share_percentage));
    }

    #[tokio::test]
    async fn deleting_release_cascades_entries() {
        let pool = init_memory_database().await.unwrap();
        let (release, owner) = seed_release(&pool).await;

        add_split(&pool, release, owner, "a@example.com", pct("50.00"))
            .await
            .unwrap();
        assert!(crate::db::releases::delete_owned(&pool, release, owner)
            .await
            .unwrap());

        let orphans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM royalty_splits WHERE release_guid = ?")
                .bind(release.to_string())
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(orphans, 0);
    }
}
