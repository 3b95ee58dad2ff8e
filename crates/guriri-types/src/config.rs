//! Runtime configuration for the dispatch backend.
//!
//! [`ConfigFile`] mirrors the optional `config.toml` in the data directory;
//! every field may be omitted. [`DispatchConfig`] is the resolved runtime
//! configuration with defaults suitable for local development only.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::room::DEFAULT_PRIVILEGED_ROOM;

pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "dolphin-mistral:7b-v2.6-dpo-laser-q8_0";
/// Development-only admin credential. Production deployments must override it.
pub const DEFAULT_ADMIN_TOKEN: &str = "changeme_admin_token";
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Contents of `{data_dir}/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub ollama_host: Option<String>,
    #[serde(default)]
    pub ollama_model: Option<String>,
    #[serde(default)]
    pub admin_token: Option<String>,
    #[serde(default)]
    pub privileged_room: Option<String>,
    #[serde(default)]
    pub completion_timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Resolved configuration.
///
/// Does not derive Clone: the admin token is a [`SecretString`] and the
/// config is shared behind an `Arc` instead.
#[derive(Debug)]
pub struct DispatchConfig {
    pub data_dir: PathBuf,
    pub ollama_host: String,
    pub ollama_model: String,
    pub admin_token: SecretString,
    pub privileged_room: String,
    pub completion_timeout: Duration,
    pub max_tokens: u32,
}

impl DispatchConfig {
    /// Defaults rooted at `data_dir`.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            admin_token: SecretString::from(DEFAULT_ADMIN_TOKEN.to_string()),
            privileged_room: DEFAULT_PRIVILEGED_ROOM.to_string(),
            completion_timeout: Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Overlay values present in a config file.
    pub fn merge_file(mut self, file: ConfigFile) -> Self {
        if let Some(host) = file.ollama_host {
            self.ollama_host = host;
        }
        if let Some(model) = file.ollama_model {
            self.ollama_model = model;
        }
        if let Some(token) = file.admin_token {
            self.admin_token = SecretString::from(token);
        }
        if let Some(room) = file.privileged_room {
            self.privileged_room = room;
        }
        if let Some(secs) = file.completion_timeout_secs {
            self.completion_timeout = Duration::from_secs(secs);
        }
        if let Some(max_tokens) = file.max_tokens {
            self.max_tokens = max_tokens;
        }
        self
    }

    /// `{data_dir}/data/guriri.db`
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("data").join("guriri.db")
    }

    /// `{data_dir}/uploads`
    pub fn upload_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    /// `{data_dir}/logs`
    pub fn log_dir(&self) -> PathBuf {
        Self::log_dir_in(&self.data_dir)
    }

    /// Log directory for a data directory, before the config is loaded.
    pub fn log_dir_in(data_dir: &Path) -> PathBuf {
        data_dir.join("logs")
    }

    /// `{data_dir}/config.toml`
    pub fn config_file_path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    /// True when the development admin token is still in use.
    pub fn uses_default_admin_token(&self) -> bool {
        self.admin_token.expose_secret() == DEFAULT_ADMIN_TOKEN
    }
}
