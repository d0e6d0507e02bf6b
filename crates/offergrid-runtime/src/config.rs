#![forbid(unsafe_code)]

//! Grid configuration.
//!
//! JSON loading is always available (the browser host passes config as a
//! JSON string). TOML and file loading require the `config` feature.
//!
//! # Example (TOML)
//!
//! ```toml
//! storage_key = "offers-grid-layout"
//! direction = "rtl"
//! log_format = "json"
//!
//! [metrics]
//! cell_width = 240
//! cell_height = 160
//! gap = 8
//! ```

#[cfg(feature = "config")]
use std::path::Path;
use std::path::PathBuf;

use offergrid_layout::{FlowDirection, GridMetrics};
use serde::{Deserialize, Serialize};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "offers-grid-layout";

/// Log line format for the optional global subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Top-level grid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Key the assignment is persisted under.
    pub storage_key: String,
    /// File backing `GridConfig::file_storage` on native hosts.
    pub storage_path: Option<PathBuf>,
    /// Initial flow direction.
    pub direction: FlowDirection,
    /// Pixel track sizes for hit-testing.
    pub metrics: GridMetrics,
    pub log_format: LogFormat,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            storage_path: None,
            direction: FlowDirection::Ltr,
            metrics: GridMetrics::default(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl GridConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Returns every problem found; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.storage_key.trim().is_empty() {
            errors.push("storage_key must not be empty".into());
        }
        if self.metrics.cell_width == 0 {
            errors.push("metrics.cell_width must be > 0".into());
        }
        if self.metrics.cell_height == 0 {
            errors.push("metrics.cell_height must be > 0".into());
        }
        if let Some(path) = &self.storage_path
            && path.as_os_str().is_empty()
        {
            errors.push("storage_path must not be empty when set".into());
        }

        errors
    }

    /// Parse and validate in one step.
    pub fn from_json_str_validated(s: &str) -> Result<Self, ConfigError> {
        let config = Self::from_json_str(s)?;
        config.into_validated()
    }

    fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// File backend at `storage_path`.
    #[cfg(feature = "file-storage")]
    pub fn file_storage(&self) -> Result<crate::FileStorage, ConfigError> {
        match &self.storage_path {
            Some(path) if !path.as_os_str().is_empty() => Ok(crate::FileStorage::new(path.clone())),
            _ => Err(ConfigError::Validation(vec![
                "storage_path is required for file storage".into(),
            ])),
        }
    }

    /// Parse TOML and validate in one step.
    #[cfg(feature = "config")]
    pub fn from_toml_str_validated(s: &str) -> Result<Self, ConfigError> {
        Self::from_toml_str(s)?.into_validated()
    }
}

/// Errors from loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = GridConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn json_partial_uses_defaults() {
        let config = GridConfig::from_json_str(r#"{"direction": "rtl"}"#).expect("parses");
        assert_eq!(config.direction, FlowDirection::Rtl);
        assert_eq!(config.metrics, GridMetrics::default());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn json_metrics_partial_override() {
        let config =
            GridConfig::from_json_str(r#"{"metrics": {"gap": 4}}"#).expect("parses");
        assert_eq!(config.metrics.gap, 4);
        assert_eq!(config.metrics.cell_width, GridMetrics::default().cell_width);
    }

    #[test]
    fn validate_reports_every_problem() {
        let config = GridConfig {
            storage_key: "  ".into(),
            metrics: GridMetrics::new(0, 0, 0),
            ..GridConfig::default()
        };
        assert_eq!(config.validate().len(), 3);
    }

    #[test]
    fn validated_constructor_rejects_bad_config() {
        let err = GridConfig::from_json_str_validated(r#"{"storage_key": ""}"#)
            .expect_err("empty key");
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().starts_with("validation errors:"));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            GridConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[cfg(feature = "file-storage")]
    #[test]
    fn file_storage_requires_a_path() {
        let err = GridConfig::default().file_storage().expect_err("no path");
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));

        let config = GridConfig {
            storage_path: Some(PathBuf::from("/tmp/offergrid/state.json")),
            ..GridConfig::default()
        };
        let storage = config.file_storage().expect("path set");
        assert_eq!(storage.path(), std::path::Path::new("/tmp/offergrid/state.json"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_round_trip() {
        let config = GridConfig::from_toml_str(
            r#"
            storage_key = "custom"
            direction = "rtl"
            log_format = "json"

            [metrics]
            cell_width = 240
            cell_height = 160
            gap = 8
            "#,
        )
        .expect("parses");
        assert_eq!(config.storage_key, "custom");
        assert_eq!(config.direction, FlowDirection::Rtl);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.metrics, GridMetrics::new(240, 160, 8));
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_file_missing_is_io_error() {
        let err = GridConfig::from_toml_file("/nonexistent/offergrid.toml").expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
