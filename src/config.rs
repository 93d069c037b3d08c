//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::loader::{ContainerIds, Endpoints, ASSIGNMENT_CONTAINER, ASSIGNMENT_PATH, TIPS_CONTAINER, TIPS_PATH};
use crate::storage::{FileStore, TOKEN_KEY};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub page: PageConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Resource paths on the backend
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_assignment_path")]
    pub assignment: String,

    #[serde(default = "default_tips_path")]
    pub tips: String,
}

fn default_assignment_path() -> String {
    ASSIGNMENT_PATH.to_string()
}

fn default_tips_path() -> String {
    TIPS_PATH.to_string()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            assignment: default_assignment_path(),
            tips: default_tips_path(),
        }
    }
}

/// Container ids looked up in the page
#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_assignment_container")]
    pub assignment_container: String,

    #[serde(default = "default_tips_container")]
    pub tips_container: String,
}

fn default_assignment_container() -> String {
    ASSIGNMENT_CONTAINER.to_string()
}

fn default_tips_container() -> String {
    TIPS_CONTAINER.to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            assignment_container: default_assignment_container(),
            tips_container: default_tips_container(),
        }
    }
}

/// Persistent client storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage file; defaults to the platform data directory
    pub path: Option<String>,

    #[serde(default = "default_token_key")]
    pub token_key: String,
}

fn default_token_key() -> String {
    TOKEN_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            token_key: default_token_key(),
        }
    }
}

impl StorageConfig {
    pub fn store(&self) -> FileStore {
        match &self.path {
            Some(path) => FileStore::new(path),
            None => FileStore::new(FileStore::default_path()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from the first default location that exists, or from the
    /// environment when none does.
    ///
    /// Returns the file the config came from. A file that exists but cannot
    /// be read or parsed is an error, not a silent fallback to defaults.
    pub fn load_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("secret-snake").join("config.toml")),
            Some(PathBuf::from("/etc/secret-snake/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(paths: &[PathBuf]) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Ok((Self::load_with_env(path)?, Some(path.clone()))),
            None => Ok((Self::from_env(), None)),
        }
    }

    /// Loader endpoint paths
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            assignment: self.endpoints.assignment.clone(),
            tips: self.endpoints.tips.clone(),
        }
    }

    /// Loader container ids
    pub fn containers(&self) -> ContainerIds {
        ContainerIds {
            assignment: self.page.assignment_container.clone(),
            tips: self.page.tips_container.clone(),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SECRET_SNAKE_API_URL") {
            self.api.base_url = url;
        }

        if let Some(path) = var("SECRET_SNAKE_STORAGE_PATH") {
            self.storage.path = Some(path);
        }

        if let Some(level) = var("SECRET_SNAKE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SECRET_SNAKE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Secret Snake Configuration
#
# Environment variables override these settings:
# - SECRET_SNAKE_API_URL
# - SECRET_SNAKE_STORAGE_PATH
# - SECRET_SNAKE_LOG_LEVEL
# - SECRET_SNAKE_LOG_FORMAT

[api]
# Backend base URL
base_url = "http://localhost:8000"

[endpoints]
# Current user's assignment
assignment = "/users/assignment"

# Current user's tips
tips = "/tips/me"

[page]
# Element ids the loader renders into
assignment_container = "assignment-container"
tips_container = "tips-container"

[storage]
# Client storage file (default: platform data directory)
# path = "~/.local/share/secret-snake/storage.json"

# Key holding the bearer token
token_key = "token"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
