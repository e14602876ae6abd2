//! Client configuration.
//!
//! Settings are read from an optional JSON file. Every field has a default, so
//! a partial file (or no file at all) is valid. The service address can also be
//! overridden through the `RECOMMENDER_BASE_URL` environment variable.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "fashion-recommender";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding [`ClientConfig::base_url`].
pub const BASE_URL_ENV: &str = "RECOMMENDER_BASE_URL";

/// Default recommendation service address
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default recommendation endpoint path
const DEFAULT_RECOMMEND_PATH: &str = "/recommend";

/// Default multipart field carrying the image
const DEFAULT_UPLOAD_FIELD: &str = "image";

/// Default size of each streamed body chunk (64KB)
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Settings for talking to the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port of the service
    pub base_url: String,

    /// Path of the upload endpoint
    pub recommend_path: String,

    /// Name of the multipart field holding the image
    pub upload_field: String,

    /// Inserted between the base URL and each recommended path when building
    /// image URLs
    pub image_path_prefix: String,

    /// Request timeout; `None` leaves the transport default in place
    pub timeout_secs: Option<u64>,

    /// Size of each streamed body chunk; one progress report per chunk
    pub chunk_size: usize,

    /// Log verbosity level
    pub log_level: LogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            recommend_path: DEFAULT_RECOMMEND_PATH.to_string(),
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
            image_path_prefix: String::new(),
            timeout_secs: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            log_level: LogLevel::default(),
        }
    }
}

impl ClientConfig {
    /// Platform location of the configuration file, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn from_json(text: &str) -> AppResult<Self> {
        serde_json::from_str(text).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load from an explicit path. A missing file is an error.
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Load from `path` when it points at an existing file, defaults otherwise.
    pub fn load_optional(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(base_url) = value.filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }
        self
    }

    /// Full URL of the upload endpoint.
    pub fn endpoint_url(&self) -> String {
        join_url(&self.base_url, &self.recommend_path)
    }

    /// URL of a recommended image returned by the service.
    pub fn image_url(&self, image_path: &str) -> String {
        let prefixed = if self.image_path_prefix.is_empty() {
            image_path.to_string()
        } else {
            join_url(&self.image_path_prefix, image_path)
        };
        join_url(&self.base_url, &prefixed)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint_url(), "http://localhost:5000/recommend");
        assert_eq!(config.upload_field, "image");
        assert_eq!(config.chunk_size, 64 * 1024);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            ClientConfig::from_json(r#"{"base_url": "http://10.0.0.2:8080/", "timeout_secs": 30}"#)
                .unwrap();
        assert_eq!(config.endpoint_url(), "http://10.0.0.2:8080/recommend");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.upload_field, "image");
    }

    #[test]
    fn log_level_parses_lowercase() {
        let config = ClientConfig::from_json(r#"{"log_level": "trace"}"#).unwrap();
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Trace);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let error = ClientConfig::from_json("{not json").unwrap_err();
        assert!(matches!(error, AppError::Config(_)));
    }

    #[test]
    fn missing_optional_file_yields_defaults() {
        let path = std::env::temp_dir().join("fashion-recommender-missing-config.json");
        let config = ClientConfig::load_optional(Some(&path)).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(ClientConfig::load(&path).is_err());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "fashion-recommender-config-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{"recommend_path": "/api/recommend"}"#).unwrap();
        let config = ClientConfig::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.endpoint_url(), "http://localhost:5000/api/recommend");
    }

    #[test]
    fn base_url_override_replaces_configured_value() {
        let config = ClientConfig::default()
            .with_base_url_override(Some(" http://recommender:5000 ".to_string()));
        assert_eq!(config.base_url, "http://recommender:5000");

        let config = ClientConfig::default().with_base_url_override(Some(String::new()));
        assert_eq!(config.base_url, "http://localhost:5000");
    }

    #[test]
    fn image_urls_join_without_duplicate_slashes() {
        let mut config = ClientConfig::default();
        assert_eq!(config.image_url("a.jpg"), "http://localhost:5000/a.jpg");

        config.image_path_prefix = "image/".to_string();
        assert_eq!(config.image_url("/a.jpg"), "http://localhost:5000/image/a.jpg");
    }
}
