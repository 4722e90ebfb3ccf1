//! Service configuration for tracklab-api
//!
//! Resolved once in `main` and injected into [`crate::AppState`]; handlers
//! never read the environment themselves.

use std::path::{Path, PathBuf};
use tracklab_common::config::{self, TomlConfig};
use tracklab_common::Result;

const DEFAULT_BIND: &str = "127.0.0.1:5740";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 1440;

/// Resolved configuration for the API service
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Data root; the database and uploaded media live under here
    pub root_folder: PathBuf,
    /// Listen address, e.g. "127.0.0.1:5740"
    pub bind_address: String,
    /// HS256 signing secret for access tokens
    pub jwt_secret: String,
    /// Access token lifetime
    pub token_ttl_minutes: i64,
}

impl ApiConfig {
    /// Resolve configuration: CLI > environment > TOML > default.
    ///
    /// The JWT secret has no compiled default; startup fails if it is not
    /// configured anywhere.
    pub fn resolve(
        cli_root: Option<&Path>,
        cli_bind: Option<&str>,
        toml_config: &TomlConfig,
    ) -> Result<Self> {
        let root_folder = config::resolve_root_folder(cli_root, toml_config);

        let bind_address = match cli_bind {
            Some(bind) => bind.to_string(),
            None => config::resolve_setting(
                "bind_address",
                "TRACKLAB_BIND",
                toml_config.bind_address.as_deref(),
                Some(DEFAULT_BIND),
            )?,
        };

        let jwt_secret = config::resolve_setting(
            "jwt_secret",
            "TRACKLAB_JWT_SECRET",
            toml_config.jwt_secret.as_deref(),
            None,
        )?;

        let token_ttl_minutes = match std::env::var("TRACKLAB_TOKEN_TTL_MINUTES") {
            Ok(v) => v.parse().map_err(|_| {
                tracklab_common::Error::Config(format!(
                    "TRACKLAB_TOKEN_TTL_MINUTES is not an integer: {v}"
                ))
            })?,
            Err(_) => toml_config
                .token_ttl_minutes
                .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES),
        };

        Ok(Self {
            root_folder,
            bind_address,
            jwt_secret,
            token_ttl_minutes,
        })
    }
}
