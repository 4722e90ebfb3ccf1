//! Configuration loading and root folder resolution
//!
//! Services build an explicit config struct once at startup and pass it by
//! injection; there is no ambient global. Resolution priority for every
//! value is the same 4-tier order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming the root data folder.
pub const ROOT_FOLDER_ENV: &str = "TRACKLAB_ROOT";

/// Values read from the optional TOML config file.
///
/// Missing file or missing keys are not errors; every field falls through
/// to the next resolution tier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<String>,
    pub bind_address: Option<String>,
    pub jwt_secret: Option<String>,
    pub token_ttl_minutes: Option<i64>,
    pub ai_api_key: Option<String>,
    pub ai_base_url: Option<String>,
    pub ai_model: Option<String>,
}

impl TomlConfig {
    /// Load the TOML config file if one exists, otherwise defaults.
    ///
    /// Looks for `~/.config/tracklab/config.toml`, then
    /// `/etc/tracklab/config.toml` on Linux.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
            }
            None => Ok(Self::default()),
        }
    }
}

fn find_config_file() -> Option<PathBuf> {
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("tracklab").join("config.toml")) {
        if user_config.exists() {
            return Some(user_config);
        }
    }
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/tracklab/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }
    None
}

/// Resolve the root data folder (database and uploaded media live here).
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        return PathBuf::from(path);
    }
    if let Some(path) = &toml_config.root_folder {
        return PathBuf::from(path);
    }
    default_root_folder()
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tracklab"))
        .unwrap_or_else(|| PathBuf::from("./tracklab_data"))
}

/// Resolve a single string setting through ENV → TOML → default.
///
/// Warns when the value is present in multiple sources, since a stale
/// lower-priority copy is a common misconfiguration.
pub fn resolve_setting(
    name: &str,
    env_var: &str,
    toml_value: Option<&str>,
    default: Option<&str>,
) -> Result<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| !v.is_empty());
    let toml_value = toml_value.filter(|v| !v.is_empty());

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML config; using environment (higher priority)",
            name
        );
    }

    env_value
        .or_else(|| toml_value.map(String::from))
        .or_else(|| default.map(String::from))
        .ok_or_else(|| {
            Error::Config(format!(
                "{name} not configured (set {env_var} or `{name}` in config.toml)"
            ))
        })
}

/// Create the root folder if missing and return the database path inside it.
pub fn ensure_root_folder(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)?;
    Ok(root.join("tracklab.db"))
}
