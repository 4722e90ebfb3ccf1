//! Release CRUD endpoints
//!
//! Every operation is owner-scoped: a release belonging to another user is
//! indistinguishable from a missing one (404).

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use tracklab_common::db::models::{Release, ReleaseStatus, RoyaltySplit};
use uuid::Uuid;

use super::auth_middleware::AuthUser;
use crate::{db, ApiError, AppState};

/// Release plus its split entries, as returned by the API
#[derive(Debug, Serialize)]
pub struct ReleaseWithSplits {
    #[serde(flatten)]
    pub release: Release,
    pub royalty_splits: Vec<RoyaltySplit>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReleaseRequest {
    pub status: Option<ReleaseStatus>,
    /// Top-level keys are merged into the existing metadata object
    pub metadata: Option<Map<String, Value>>,
}

/// POST /music/releases
///
/// Multipart form: `title` and `artist` text fields, optional
/// `cover_image` and `audio_file` file fields. Media is written to the
/// content-addressed store before the record is created.
pub async fn create_release(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ReleaseWithSplits>), ApiError> {
    let mut title: Option<String> = None;
    let mut artist: Option<String> = None;
    let mut cover_url: Option<String> = None;
    let mut audio_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                title = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("unreadable title field: {e}"))
                })?);
            }
            "artist" => {
                artist = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("unreadable artist field: {e}"))
                })?);
            }
            "cover_image" | "audio_file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("unreadable upload {name}: {e}"))
                })?;
                if bytes.is_empty() {
                    return Err(ApiError::BadRequest(format!("empty upload: {name}")));
                }
                let url = state.media.store(&file_name, &bytes)?;
                if name == "cover_image" {
                    cover_url = Some(url);
                } else {
                    audio_url = Some(url);
                }
            }
            // Unknown fields are ignored
            _ => {}
        }
    }

    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("title must not be empty".to_string()))?;
    let artist = artist
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("artist must not be empty".to_string()))?;

    let status = match (&cover_url, &audio_url) {
        (Some(_), Some(_)) => ReleaseStatus::Uploaded,
        (None, None) => ReleaseStatus::Draft,
        _ => ReleaseStatus::PendingUpload,
    };

    let now = Utc::now();
    let release = Release {
        guid: Uuid::new_v4(),
        title,
        artist,
        status,
        cover_url,
        audio_url,
        metadata: None,
        owner_guid: user.guid,
        created_at: now,
        updated_at: now,
    };
    db::releases::insert_release(&state.db, &release).await?;

    info!(
        "Created release {} ({}) for user {}",
        release.guid,
        release.status.as_str(),
        user.guid
    );

    Ok((
        StatusCode::CREATED,
        Json(ReleaseWithSplits {
            release,
            royalty_splits: Vec::new(),
        }),
    ))
}

/// GET /music/releases
pub async fn list_releases(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ReleaseWithSplits>>, ApiError> {
    let releases = db::releases::list_by_owner(&state.db, user.guid).await?;

    let mut out = Vec::with_capacity(releases.len());
    for release in releases {
        let royalty_splits = db::splits::list_for_release(&state.db, release.guid).await?;
        out.push(ReleaseWithSplits {
            release,
            royalty_splits,
        });
    }

    Ok(Json(out))
}

/// GET /music/releases/:id
pub async fn get_release(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReleaseWithSplits>, ApiError> {
    let release = db::releases::get_owned(&state.db, id, user.guid)
        .await?
        .ok_or_else(not_found)?;
    let royalty_splits = db::splits::list_for_release(&state.db, release.guid).await?;

    Ok(Json(ReleaseWithSplits {
        release,
        royalty_splits,
    }))
}

/// PATCH /music/releases/:id
///
/// Status transition and/or metadata merge. The owner reference is
/// immutable; there is no way to reassign a release.
pub async fn update_release(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateReleaseRequest>,
) -> Result<Json<ReleaseWithSplits>, ApiError> {
    let current = db::releases::get_owned(&state.db, id, user.guid)
        .await?
        .ok_or_else(not_found)?;

    let status = req.status.unwrap_or(current.status);

    let metadata = match req.metadata {
        Some(patch) => {
            let mut merged = match current.metadata {
                Some(Value::Object(existing)) => existing,
                _ => Map::new(),
            };
            for (key, value) in patch {
                merged.insert(key, value);
            }
            Some(Value::Object(merged))
        }
        None => current.metadata,
    };

    let updated = db::releases::update_owned(&state.db, id, user.guid, status, metadata.as_ref())
        .await?;
    if !updated {
        // Deleted between the read and the write
        return Err(not_found());
    }

    let release = db::releases::get_owned(&state.db, id, user.guid)
        .await?
        .ok_or_else(not_found)?;
    let royalty_splits = db::splits::list_for_release(&state.db, release.guid).await?;

    Ok(Json(ReleaseWithSplits {
        release,
        royalty_splits,
    }))
}

/// DELETE /music/releases/:id
///
/// Deleting a release cascades deletion of all its split entries.
pub async fn delete_release(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = db::releases::delete_owned(&state.db, id, user.guid).await?;
    if !deleted {
        return Err(not_found());
    }
    info!("Deleted release {} for user {}", id, user.guid);
    Ok(StatusCode::NO_CONTENT)
}

fn not_found() -> ApiError {
    ApiError::NotFound("release not found or not permitted".to_string())
}
