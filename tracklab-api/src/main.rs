//! tracklab-api - Content distribution HTTP service
//!
//! User accounts, music releases with media upload, and the royalty split
//! ledger behind a bearer-token API.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracklab_api::{build_router, ApiConfig, AppState};
use tracklab_common::config::{ensure_root_folder, TomlConfig};

#[derive(Debug, Parser)]
#[command(name = "tracklab-api", version, about = "Tracklab content distribution API")]
struct Cli {
    /// Root data folder (database and uploaded media)
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:5740
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Tracklab API (tracklab-api) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let cli = Cli::parse();
    let toml_config = TomlConfig::load()?;
    let config = ApiConfig::resolve(
        cli.root_folder.as_deref(),
        cli.bind.as_deref(),
        &toml_config,
    )?;

    let db_path = ensure_root_folder(&config.root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = tracklab_common::db::init_database(&db_path).await?;
    info!("Database connection established");

    let bind_address = config.bind_address.clone();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("tracklab-api listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
