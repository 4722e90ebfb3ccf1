//! Bearer-token authentication middleware
//!
//! Verifies the JWT from the `Authorization` header, confirms the account
//! still exists, and hands handlers a verified owner identifier via a
//! request extension. Handlers never touch the raw credential.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::{db, ApiError, AppState};

/// Verified caller identity, inserted by [`require_user`]
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub guid: Uuid,
}

/// Authentication middleware for protected routes.
///
/// All failure modes collapse into a generic 401 so the response does not
/// reveal whether a token was malformed, expired, or referenced a deleted
/// account.
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let unauthorized = || ApiError::Unauthorized("missing or invalid credentials".to_string());

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(unauthorized)?;

    let token = header.strip_prefix("Bearer ").ok_or_else(unauthorized)?;

    let claims = tracklab_common::auth::verify_token(&state.config.jwt_secret, token)
        .map_err(|e| {
            debug!("Token verification failed: {}", e);
            unauthorized()
        })?;

    // The token may outlive the account
    let user = db::users::get_by_guid(&state.db, claims.sub)
        .await?
        .ok_or_else(unauthorized)?;

    request.extensions_mut().insert(AuthUser { guid: user.guid });

    Ok(next.run(request).await)
}
