//! Database models
//!
//! Plain data records; relationships are resolved with query-by-foreign-key
//! in the per-entity query modules, never with in-memory object graphs.

use crate::SharePercent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    MusicCreator,
    BookAuthor,
    ElearningInstructor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::MusicCreator => "music_creator",
            UserRole::BookAuthor => "book_author",
            UserRole::ElearningInstructor => "elearning_instructor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "music_creator" => Some(UserRole::MusicCreator),
            "book_author" => Some(UserRole::BookAuthor),
            "elearning_instructor" => Some(UserRole::ElearningInstructor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub guid: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Release lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    Draft,
    PendingUpload,
    Uploaded,
    InReview,
    Distributing,
    Published,
}

impl ReleaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseStatus::Draft => "draft",
            ReleaseStatus::PendingUpload => "pending_upload",
            ReleaseStatus::Uploaded => "uploaded",
            ReleaseStatus::InReview => "in_review",
            ReleaseStatus::Distributing => "distributing",
            ReleaseStatus::Published => "published",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ReleaseStatus::Draft),
            "pending_upload" => Some(ReleaseStatus::PendingUpload),
            "uploaded" => Some(ReleaseStatus::Uploaded),
            "in_review" => Some(ReleaseStatus::InReview),
            "distributing" => Some(ReleaseStatus::Distributing),
            "published" => Some(ReleaseStatus::Published),
            _ => None,
        }
    }
}

/// A content item owned by a user, distributed to external platforms.
///
/// `owner_guid` is set at creation and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub guid: Uuid,
    pub title: String,
    pub artist: String,
    pub status: ReleaseStatus,
    pub cover_url: Option<String>,
    pub audio_url: Option<String>,
    /// Arbitrary key-value metadata, stored as a JSON object
    pub metadata: Option<serde_json::Value>,
    pub owner_guid: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One recipient's percentage allocation of a release's royalties.
///
/// Add-only: entries are never updated in place and are removed only by
/// the cascade when the parent release is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoyaltySplit {
    pub id: i64,
    pub release_guid: Uuid,
    /// Payee key, email-shaped; not required to be a registered user
    pub recipient: String,
    pub share_percentage: SharePercent,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            ReleaseStatus::Draft,
            ReleaseStatus::PendingUpload,
            ReleaseStatus::Uploaded,
            ReleaseStatus::InReview,
            ReleaseStatus::Distributing,
            ReleaseStatus::Published,
        ] {
            assert_eq!(ReleaseStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReleaseStatus::parse("deleted"), None);
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User {
            guid: Uuid::new_v4(),
            email: "artist@example.com".into(),
            password_hash: "$argon2id$...".into(),
            role: UserRole::MusicCreator,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "music_creator");
    }
}
