//! Application configuration, read from a RON file.
//!
//! Every field has a default, so a partial file (or no file at all) is valid.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use checker_engine::{PreviewSettings, SubmitSettings};
use checker_logging::{checker_info, LogDestination};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILENAME: &str = "image_checker.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogTarget {
    #[default]
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the classification service.
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub preview_max_dimension: u32,
    pub log: LogTarget,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let submit = SubmitSettings::default();
        Self {
            endpoint: submit.endpoint,
            connect_timeout_secs: submit.connect_timeout.as_secs(),
            request_timeout_secs: submit.request_timeout.as_secs(),
            max_response_bytes: submit.max_response_bytes,
            preview_max_dimension: PreviewSettings::default().max_dimension,
            log: LogTarget::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn submit_settings(&self) -> SubmitSettings {
        SubmitSettings {
            endpoint: self.endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_response_bytes: self.max_response_bytes,
        }
    }

    pub fn preview_settings(&self) -> PreviewSettings {
        PreviewSettings {
            max_dimension: self.preview_max_dimension,
        }
    }

    /// Unknown level names fall back to `Info`.
    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(self.log_level.trim()).unwrap_or(LevelFilter::Info)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Loads the configuration at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config: AppConfig = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    checker_info!("Loaded configuration from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.endpoint, "http://127.0.0.1:8080");
        assert_eq!(config.log_level(), LevelFilter::Info);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(endpoint: "https://checker.example.com", request_timeout_secs: 5, log: Both, log_level: "debug")"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.endpoint, "https://checker.example.com");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log, LogTarget::Both);
        assert_eq!(config.log_level(), LevelFilter::Debug);
        assert_eq!(config.preview_max_dimension, 256);

        let submit = config.submit_settings();
        assert_eq!(submit.request_timeout, Duration::from_secs(5));
        assert_eq!(submit.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&path, "(endpoint: 42").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn directory_path_is_a_read_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config(temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = AppConfig {
            log_level: "chatty".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.log_level(), LevelFilter::Info);
    }
}
