//! Persistent settings stored as `config.toml` in the application directory.
//!
//! Config sections (TOML): `store`, `estimator`, `query`. Every key is optional;
//! missing keys fall back to the defaults below.

mod io;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::estimator::{EstimatorOptions, UserQuery};

pub use io::{config_path, load_from_path, load_or_default, save, save_to_path};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable that overrides `store.password`.
pub const PASSWORD_ENV: &str = "AELENS_STORE_PASSWORD";

/// Errors that may occur while loading or saving app configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        /// Directory path that failed to create.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub estimator: EstimatorOptions,
    /// Values prefilled into the query fields.
    #[serde(default)]
    pub query: UserQuery,
}

impl AppSettings {
    pub(crate) fn normalized(self) -> Self {
        Self {
            store: self.store,
            estimator: self.estimator.normalized(),
            query: self.query,
        }
    }
}

/// Which document store implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Arango,
    JsonDir,
}

/// Connection settings for the document store.
///
/// Config keys: `backend`, `url`, `database`, `username`, `password`, `data_dir`.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_store_url")]
    pub url: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    /// Root folder for the `json_dir` backend.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StoreSettings {
    /// Password from [`PASSWORD_ENV`] when set, else the configured value.
    pub fn resolved_password(&self) -> String {
        std::env::var(PASSWORD_ENV).unwrap_or_else(|_| self.password.clone())
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: default_store_url(),
            database: default_database(),
            username: default_username(),
            password: default_password(),
            data_dir: None,
        }
    }
}

impl std::fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSettings")
            .field("backend", &self.backend)
            .field("url", &self.url)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("data_dir", &self.data_dir)
            .finish_non_exhaustive()
    }
}

fn default_store_url() -> String {
    "http://127.0.0.1:8529".to_string()
}

fn default_database() -> String {
    "AE_Items".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "password".to_string()
}
