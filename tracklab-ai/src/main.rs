//! tracklab-ai - AI content generation service
//!
//! Lyrics, marketing descriptions, and text analysis backed by an
//! OpenAI-compatible chat completions API.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracklab_ai::{build_router, AiConfig, AppState};
use tracklab_common::config::TomlConfig;

#[derive(Debug, Parser)]
#[command(name = "tracklab-ai", version, about = "Tracklab AI generation service")]
struct Cli {
    /// Listen address, e.g. 127.0.0.1:5741
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
        "Starting Tracklab AI (tracklab-ai) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let cli = Cli::parse();
    let toml_config = TomlConfig::load()?;
    let config = AiConfig::resolve(cli.bind, &toml_config);

    info!(model = %config.model, "Upstream model configured");

    let bind_address = config.bind_address.clone();
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("tracklab-ai listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
