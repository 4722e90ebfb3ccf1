//! Registration and login endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracklab_common::auth::{hash_password, issue_token, verify_password};
use tracklab_common::db::models::{User, UserRole};
use tracklab_common::validate::is_email_shaped;
use uuid::Uuid;

use crate::{db, ApiError, AppState};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued on successful login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if !is_email_shaped(&req.email) {
        return Err(ApiError::BadRequest("malformed email address".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = hash_password(&req.password)?;
    let role = req.role.unwrap_or(UserRole::MusicCreator);

    // No read-then-insert: the UNIQUE constraint on email is the only
    // duplicate check, so two concurrent registrations cannot both pass.
    let user =
        match db::users::insert_user(&state.db, Uuid::new_v4(), &req.email, &password_hash, role)
            .await
        {
            Ok(user) => user,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(ApiError::Conflict("email already registered".to_string()));
            }
            Err(err) => return Err(err.into()),
        };

    info!("Registered user {} as {}", user.guid, role.as_str());
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login
///
/// Unknown email and wrong password yield the same generic 401.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("invalid email or password".to_string());

    let user = db::users::get_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = issue_token(
        &state.config.jwt_secret,
        user.guid,
        state.config.token_ttl_minutes,
    )?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}
