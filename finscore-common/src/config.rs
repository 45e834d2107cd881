//! Configuration file location and shared sections.
//!
//! # Resolution order
//!
//! 1. `FINSCORE_CONFIG` (path, `~` expanded)
//! 2. `~/.finscore/config.json`
//! 3. Default values
//!
//! Individual values can then be overridden with `FINSCORE_*` variables,
//! see [`ObservabilityConfig::apply_env_overrides`] and the engine's
//! scoring section.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FINSCORE_CONFIG";

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".finscore"),
        |dirs| dirs.home_dir().join(".finscore"),
    )
}

/// Get the configuration file path, honouring `FINSCORE_CONFIG`.
pub fn config_path() -> PathBuf {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(raw) if !raw.trim().is_empty() => expand_path(raw.trim()),
        _ => config_dir().join("config.json"),
    }
}

/// Expand `~` and environment variables in a user supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(raw),
    }
}

/// Read and deserialize a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Read a JSON config document, or fall back to defaults when the file is absent.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        return Ok(T::default());
    }
    read_json(path)
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to set to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

impl ObservabilityConfig {
    /// Apply `FINSCORE_LOG_LEVEL` / `FINSCORE_LOG_FORMAT`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("FINSCORE_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Ok(format) = std::env::var("FINSCORE_LOG_FORMAT") {
            self.log_format = format;
        }
    }
}

/// Parse an optional numeric environment override.
pub fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_dir_ends_with_finscore() {
        assert!(config_dir().ends_with(".finscore"));
    }

    #[test]
    fn test_read_json_observability() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"level": "debug"}}"#).unwrap();

        let config: ObservabilityConfig = read_json(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, "pretty");
        assert!(config.excluded_targets.is_empty());
    }

    #[test]
    fn test_read_json_reports_path_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = read_json::<ObservabilityConfig>(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_read_json_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config: ObservabilityConfig =
            read_json_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, ObservabilityConfig::default());
    }

    #[test]
    fn test_expand_path_plain() {
        assert_eq!(expand_path("/tmp/finscore.json"), PathBuf::from("/tmp/finscore.json"));
    }
}
