//! Layered configuration loader for Guriri.
//!
//! Resolution order, later wins:
//! 1. built-in defaults ([`DispatchConfig::with_data_dir`])
//! 2. `{data_dir}/config.toml`
//! 3. environment (`OLLAMA_HOST`, `OLLAMA_MODEL`, `GURIRI_ADMIN_TOKEN`)
//!
//! A missing or malformed config file is logged and skipped.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use guriri_types::config::{ConfigFile, DispatchConfig};

pub const DATA_DIR_ENV: &str = "GURIRI_DATA_DIR";
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";
pub const OLLAMA_MODEL_ENV: &str = "OLLAMA_MODEL";
pub const ADMIN_TOKEN_ENV: &str = "GURIRI_ADMIN_TOKEN";

/// Resolve the data directory.
///
/// An explicit path wins, then `GURIRI_DATA_DIR`, then `~/.guriri`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".guriri")
        })
}

/// Read `{data_dir}/config.toml`, returning an empty file on any failure.
pub async fn load_config_file(data_dir: &Path) -> ConfigFile {
    let config_path = DispatchConfig::config_file_path(data_dir);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ConfigFile::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ConfigFile::default();
        }
    };

    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ConfigFile::default()
        }
    }
}

/// Overlay environment overrides using `lookup` (normally `std::env::var`).
pub fn apply_env_overrides<F>(mut config: DispatchConfig, lookup: F) -> DispatchConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(host) = non_empty(OLLAMA_HOST_ENV) {
        config.ollama_host = host;
    }
    if let Some(model) = non_empty(OLLAMA_MODEL_ENV) {
        config.ollama_model = model;
    }
    if let Some(token) = non_empty(ADMIN_TOKEN_ENV) {
        config.admin_token = SecretString::from(token);
    }
    config
}

/// Full resolution: defaults, then the config file, then the process environment.
pub async fn load_config(data_dir: PathBuf) -> DispatchConfig {
    let file = load_config_file(&data_dir).await;
    let config = DispatchConfig::with_data_dir(data_dir).merge_file(file);
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Create the data, upload, and log directories.
pub async fn ensure_directories(config: &DispatchConfig) -> std::io::Result<()> {
    if let Some(db_dir) = config.database_path().parent() {
        tokio::fs::create_dir_all(db_dir).await?;
    }
    tokio::fs::create_dir_all(config.upload_dir()).await?;
    tokio::fs::create_dir_all(config.log_dir()).await?;
    Ok(())
}
