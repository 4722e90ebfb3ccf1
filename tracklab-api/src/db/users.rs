//! User database operations

use super::decode_err;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracklab_common::db::models::{User, UserRole};
use uuid::Uuid;

pub async fn insert_user(
    pool: &SqlitePool,
    guid: Uuid,
    email: &str,
    password_hash: &str,
    role: UserRole,
) -> Result<User, sqlx::Error> {
    let created_at = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO users (guid, email, password_hash, role, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(guid.to_string())
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(User {
        guid,
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role,
        created_at,
    })
}

pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT guid, email, password_hash, role, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(user_from_row).transpose()
}

pub async fn get_by_guid(pool: &SqlitePool, guid: Uuid) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT guid, email, password_hash, role, created_at FROM users WHERE guid = ?",
    )
    .bind(guid.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(user_from_row).transpose()
}

fn user_from_row(row: sqlx::sqlite::SqliteRow) -> Result<User, sqlx::Error> {
    let guid_str: String = row.get("guid");
    let guid = Uuid::parse_str(&guid_str).map_err(|e| decode_err("guid", e))?;

    let role_str: String = row.get("role");
    let role = UserRole::parse(&role_str)
        .ok_or_else(|| decode_err("role", format!("unknown role {role_str:?}")))?;

    let created_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_str)
        .map_err(|e| decode_err("created_at", e))?
        .with_timezone(&Utc);

    Ok(User {
        guid,
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role,
        created_at,
    })
}
