//! Royalty split endpoints
//!
//! Thin transport boundary over [`crate::ledger`]; ledger outcomes are
//! mapped to status codes here and nowhere else.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracklab_common::db::models::RoyaltySplit;
use tracklab_common::SharePercent;
use uuid::Uuid;

use super::auth_middleware::AuthUser;
use crate::ledger::{self, LedgerError};
use crate::{db, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateSplitRequest {
    pub recipient: String,
    pub share_percentage: SharePercent,
}

/// Created entry as returned by the API
#[derive(Debug, Serialize)]
pub struct SplitResponse {
    pub id: i64,
    pub recipient: String,
    pub share_percentage: SharePercent,
}

impl From<RoyaltySplit> for SplitResponse {
    fn from(split: RoyaltySplit) -> Self {
        Self {
            id: split.id,
            recipient: split.recipient,
            share_percentage: split.share_percentage,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound => {
                ApiError::NotFound("release not found or not permitted".to_string())
            }
            LedgerError::ShareOutOfRange(_)
            | LedgerError::InvalidRecipient(_)
            | LedgerError::ExceedsTotal { .. } => ApiError::BadRequest(err.to_string()),
            LedgerError::Database(e) => ApiError::Database(e),
        }
    }
}

/// POST /music/releases/:id/splits
pub async fn add_split(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateSplitRequest>,
) -> Result<(StatusCode, Json<SplitResponse>), ApiError> {
    let entry = ledger::add_split(
        &state.db,
        id,
        user.guid,
        &req.recipient,
        req.share_percentage,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// GET /music/releases/:id/splits
pub async fn list_splits(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SplitResponse>>, ApiError> {
    // Owner-scoped existence check; collapsed 404 as everywhere else
    db::releases::get_owned(&state.db, id, user.guid)
        .await?
        .ok_or_else(|| ApiError::NotFound("release not found or not permitted".to_string()))?;

    let splits = ledger::list_splits(&state.db, id).await?;
    Ok(Json(splits.into_iter().map(SplitResponse::from).collect()))
}
