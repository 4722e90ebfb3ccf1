//! tracklab-api library - content distribution HTTP service
//!
//! User registration/login, release CRUD with media upload, and the
//! royalty split ledger. Handlers stay thin; ledger semantics live in
//! [`ledger`] and are mapped to transport codes at the boundary only.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod media;

pub use config::ApiConfig;
pub use error::ApiError;

/// Largest accepted multipart upload (cover + audio), bytes
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolved service configuration, injected at startup
    pub config: Arc<ApiConfig>,
    /// Content-addressed media storage under the root folder
    pub media: media::MediaStore,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, config: ApiConfig) -> Self {
        let media = media::MediaStore::new(&config.root_folder);
        Self {
            db,
            config: Arc::new(config),
            media,
        }
    }
}

/// Build application router
///
/// `/health` and `/auth/*` are public; everything under `/music` requires
/// a bearer token.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let protected = Router::new()
        .route(
            "/music/releases",
            post(api::releases::create_release).get(api::releases::list_releases),
        )
        .route(
            "/music/releases/:id",
            get(api::releases::get_release)
                .patch(api::releases::update_release)
                .delete(api::releases::delete_release),
        )
        .route(
            "/music/releases/:id/splits",
            post(api::splits::add_split).get(api::splits::list_splits),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware::require_user,
        ));

    let public = Router::new()
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .merge(api::health::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
