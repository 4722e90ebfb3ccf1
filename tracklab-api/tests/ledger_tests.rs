//! Ledger property tests against a file-backed database
//!
//! The in-source ledger tests cover the single-writer boundaries; these
//! tests exercise the properties that need a real pool with multiple
//! connections, above all the two-concurrent-writers property.

use chrono::Utc;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tracklab_api::ledger::{self, LedgerError};
use tracklab_common::auth::hash_password;
use tracklab_common::db::models::{Release, ReleaseStatus, UserRole};
use tracklab_common::SharePercent;
use uuid::Uuid;

async fn setup_db() -> (SqlitePool, TempDir) {
    let tmp = TempDir::new().expect("temp dir");
    let pool = tracklab_common::db::init_database(&tmp.path().join("tracklab.db"))
        .await
        .expect("file-backed database");
    (pool, tmp)
}

async fn seed_release(pool: &SqlitePool) -> (Uuid, Uuid) {
    let owner = Uuid::new_v4();
    tracklab_api::db::users::insert_user(
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
        status: ReleaseStatus::Uploaded,
        cover_url: None,
        audio_url: None,
        metadata: None,
        owner_guid: owner,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    tracklab_api::db::releases::insert_release(pool, &release)
        .await
        .unwrap();
    (release.guid, owner)
}

fn pct(s: &str) -> SharePercent {
    s.parse().unwrap()
}

#[tokio::test]
async fn concurrent_adds_serialize_exactly_one_winner() {
    let (pool, _tmp) = setup_db().await;
    let (release, owner) = seed_release(&pool).await;

    // Two writers each asking for 60.00 on an empty release: together they
    // would exceed 100.00, so exactly one must win.
    let a = {
        let pool = pool.clone();
        tokio::spawn(async move {
            ledger::add_split(&pool, release, owner, "left@example.com", pct("60.00")).await
        })
    };
    let b = {
        let pool = pool.clone();
        tokio::spawn(async move {
            ledger::add_split(&pool, release, owner, "right@example.com", pct("60.00")).await
        })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one concurrent writer must win");

    let loser = results.iter().find(|r| r.is_err()).unwrap();
    match loser {
        Err(LedgerError::ExceedsTotal { current_total }) => {
            assert_eq!(*current_total, pct("60.00"));
        }
        other => panic!("loser should see ExceedsTotal, got {other:?}"),
    }

    // The persisted total never exceeded the bound
    assert_eq!(
        ledger::current_total(&pool, release).await.unwrap(),
        pct("60.00")
    );
    assert_eq!(ledger::list_splits(&pool, release).await.unwrap().len(), 1);
}

#[tokio::test]
async fn invariant_holds_across_mixed_sequences() {
    let (pool, _tmp) = setup_db().await;
    let (release, owner) = seed_release(&pool).await;

    // Interleave additions that fit with additions that must be rejected;
    // after every step the persisted sum stays at or below 100.00 exactly.
    let attempts = [
        ("a@example.com", "33.33", true),
        ("b@example.com", "33.33", true),
        ("c@example.com", "33.35", false), // would reach 100.01
        ("c@example.com", "33.34", true),  // exact fill to 100.00
        ("d@example.com", "0.01", false),
    ];

    for (recipient, share, should_succeed) in attempts {
        let result = ledger::add_split(&pool, release, owner, recipient, pct(share)).await;
        assert_eq!(
            result.is_ok(),
            should_succeed,
            "add of {share} expected success={should_succeed}, got {result:?}"
        );

        let total = ledger::current_total(&pool, release).await.unwrap();
        assert!(total <= SharePercent::FULL, "total exceeded 100%: {total}");
    }

    assert_eq!(
        ledger::current_total(&pool, release).await.unwrap(),
        SharePercent::FULL
    );
}

#[tokio::test]
async fn independent_releases_do_not_contend() {
    let (pool, _tmp) = setup_db().await;
    let (release_a, owner) = seed_release(&pool).await;

    let release_b = Release {
        guid: Uuid::new_v4(),
        title: "Second Sight".into(),
        artist: "Night Bus".into(),
        status: ReleaseStatus::Uploaded,
        cover_url: None,
        audio_url: None,
        metadata: None,
        owner_guid: owner,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    tracklab_api::db::releases::insert_release(&pool, &release_b)
        .await
        .unwrap();

    // Each release has its own 100% budget
    for release in [release_a, release_b.guid] {
        ledger::add_split(&pool, release, owner, "payee@example.com", pct("100.00"))
            .await
            .unwrap();
    }

    assert_eq!(
        ledger::current_total(&pool, release_a).await.unwrap(),
        SharePercent::FULL
    );
    assert_eq!(
        ledger::current_total(&pool, release_b.guid).await.unwrap(),
        SharePercent::FULL
    );
}
