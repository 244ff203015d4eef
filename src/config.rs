//! YAML Configuration File Support for Docflow
//!
//! Loads every stage configuration (file admission, identity resolution,
//! version ledger) plus logging settings from a single YAML file. Sections
//! that are left out take their defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # Docflow Configuration
//! version: "1.0"
//! name: "obra-centro"
//!
//! ingest:
//!   version: 1
//!   max_size_bytes: 10485760
//!   accepted_extensions: [".dwg", ".pdf"]
//!   strip_control_chars: true
//!
//! identity:
//!   normalize_unicode: true
//!   version_markers: ["version", "v"]
//!
//! ledger:
//!   version_id_namespace: "6ba7b812-9dad-11d1-80b4-00c04fd430c8"
//!
//! logging:
//!   level: "info"
//!   json: false
//! ```

use std::fs;
use std::path::Path;

use canonical::IdentityConfig;
use index::LedgerConfig;
use ingest::IngestConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for a Docflow deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DocflowConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// File admission rules
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Document identity resolution
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Version ledger
    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DocflowConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: DocflowConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.ingest
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("ingest: {e}")))?;
        self.identity
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("identity: {e}")))?;
        self.logging.validate()?;

        Ok(())
    }
}

impl Default for DocflowConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            ingest: IngestConfig::default(),
            identity: IdentityConfig::default(),
            ledger: LedgerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging YAML configuration, consumed by the `docflow` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&self.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigLoadError::Validation(format!(
                "logging.level must be one of: {valid_levels:?}"
            )));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
