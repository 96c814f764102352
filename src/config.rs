//! Search configuration
//!
//! Tuning knobs for the fuzzy match engine. Loaded from a JSON file, either
//! an explicit path or `<config_dir>/catalog-filters/config.json`; every
//! field is optional and falls back to its default.

use crate::error::AppError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name under the platform config dir
const CONFIG_DIR_NAME: &str = "catalog-filters";

/// Fuzzy matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Match tolerance in [0, 1]; 0 requires an exact match, 1 matches anything
    pub threshold: f64,
    /// Character offset where a fuzzy match is expected to start
    pub location: usize,
    /// How far from `location` a match may drift before it scores 1.0
    pub distance: usize,
    /// Score fuzzy matches on errors only, ignoring where they start
    pub ignore_location: bool,
    /// Do not favour matches in shorter values
    pub ignore_field_norm: bool,
    pub case_sensitive: bool,
    /// Compare with diacritics stripped (café == cafe)
    pub ignore_diacritics: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            location: 0,
            distance: 100,
            ignore_location: false,
            ignore_field_norm: false,
            case_sensitive: false,
            ignore_diacritics: false,
        }
    }
}

impl SearchConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(AppError::InvalidConfig(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Default location of the configuration file
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join("config.json"))
}

/// Load and validate the search configuration
///
/// An explicit path must exist. The default path is optional: when it is
/// missing (or no config directory exists) the defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    let path = match path {
        Some(explicit) => explicit.to_path_buf(),
        None => match config_path() {
            Ok(default) if default.exists() => default,
            _ => {
                debug!("No config file found, using default search configuration");
                return Ok(SearchConfig::default());
            }
        },
    };

    let data = fs::read_to_string(&path)
        .map_err(AppError::from)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = parse_config(&data)
        .with_context(|| format!("Failed to load config file {}", path.display()))?;

    info!("Loaded search configuration from {}", path.display());
    Ok(config)
}

/// Parse and validate a JSON configuration document
pub fn parse_config(data: &str) -> Result<SearchConfig, AppError> {
    let config: SearchConfig = serde_json::from_str(data)
        .map_err(|e| AppError::InvalidConfig(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.threshold, 0.2);
        assert_eq!(config.distance, 100);
        assert_eq!(config.location, 0);
        assert!(!config.ignore_location);
        assert!(!config.case_sensitive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = parse_config(r#"{ "threshold": 0.4, "ignoreLocation": true }"#).unwrap();
        assert_eq!(config.threshold, 0.4);
        assert!(config.ignore_location);
        assert_eq!(config.distance, 100);
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let err = parse_config(r#"{ "threshold": 1.5 }"#).unwrap_err();
        assert_eq!(err.error_code(), "invalid_config");

        assert!(SearchConfig::default().with_threshold(-0.1).validate().is_err());
        assert!(SearchConfig::default().with_threshold(f64::NAN).validate().is_err());
        assert!(SearchConfig::default().with_threshold(0.0).validate().is_ok());
        assert!(SearchConfig::default().with_threshold(1.0).validate().is_ok());
    }

    #[test]
    fn test_malformed_json_is_invalid_config() {
        let err = parse_config("threshold = 0.3").unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "distance": 10, "caseSensitive": true }"#).unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.distance, 10);
        assert!(config.case_sensitive);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert_eq!(AppError::from(err).error_code(), "not_found");
    }
}
