//! Configuration types for upload admission.
//!
//! This module defines [`IngestConfig`], which controls which uploads the
//! [`FileValidator`](crate::FileValidator) admits. It is cheap to clone and
//! deserializes from JSON, TOML or YAML.
//!
//! # Quick Start
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig::default();
//! assert_eq!(config.max_size_bytes, 10_485_760);
//! config.validate().expect("defaults are valid");
//! ```
//!
//! # Production Configuration
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig {
//!     version: 1,
//!     max_size_bytes: 50 * 1024 * 1024, // 50 MiB plotted sheets
//!     accepted_extensions: vec![".dwg".into(), ".dxf".into(), ".pdf".into()],
//!     strip_control_chars: true,
//! };
//!
//! // Always validate at startup
//! if let Err(e) = config.validate() {
//!     eprintln!("Configuration error: {}", e);
//!     std::process::exit(1);
//! }
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound for a single upload: 10 MiB.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10_485_760;

/// Runtime configuration for upload admission.
///
/// # Serialization
///
/// ```json
/// {
///   "version": 1,
///   "max_size_bytes": 10485760,
///   "accepted_extensions": [".dwg", ".pdf"],
///   "strip_control_chars": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Version of the admission rules.
    ///
    /// Default: `1`
    pub version: u32,

    /// Largest accepted upload in bytes (inclusive).
    ///
    /// Default: `10_485_760` (10 MiB)
    pub max_size_bytes: u64,

    /// Accepted extensions, leading dot included. Compared
    /// case-insensitively against the text after the last `.` of the name.
    ///
    /// Default: `[".dwg", ".pdf"]`
    pub accepted_extensions: Vec<String>,

    /// Whether to strip control characters from file names before checking
    /// them. With this off, a name containing control characters is rejected
    /// as [`InvalidName`](crate::RejectReason::InvalidName) instead.
    ///
    /// Default: `true`
    pub strip_control_chars: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            version: 1,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            accepted_extensions: vec![".dwg".into(), ".pdf".into()],
            strip_control_chars: true,
        }
    }
}

/// Errors that can occur when validating an [`IngestConfig`].
///
/// These are start-up issues, never request-time ones.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// `version` 0 is reserved.
    #[error("ingest config version must be >= 1")]
    InvalidVersion,

    /// A zero limit would reject every upload.
    #[error("max_size_bytes must be greater than zero")]
    ZeroMaxSize,

    /// No extension accepted means no upload accepted.
    #[error("accepted_extensions must list at least one extension")]
    NoAcceptedExtensions,

    /// The entry is not of the form `.ext`.
    #[error("accepted extension {0:?} must be a single '.' followed by a name, e.g. \".pdf\"")]
    MalformedExtension(String),
}

impl IngestConfig {
    /// Validates internal consistency of this configuration.
    ///
    /// Checks are in-memory and O(n) in the number of extensions.
    ///
    /// ```rust
    /// use ingest::{ConfigError, IngestConfig};
    ///
    /// let bad = IngestConfig {
    ///     accepted_extensions: vec!["pdf".into()],
    ///     ..Default::default()
    /// };
    /// assert_eq!(bad.validate(), Err(ConfigError::MalformedExtension("pdf".into())));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 {
            return Err(ConfigError::InvalidVersion);
        }
        if self.max_size_bytes == 0 {
            return Err(ConfigError::ZeroMaxSize);
        }
        if self.accepted_extensions.is_empty() {
            return Err(ConfigError::NoAcceptedExtensions);
        }
        for ext in &self.accepted_extensions {
            let well_formed = ext.len() > 1
                && ext.starts_with('.')
                && !ext[1..].contains('.')
                && !ext.chars().any(|c| c.is_whitespace() || c.is_control());
            if !well_formed {
                return Err(ConfigError::MalformedExtension(ext.clone()));
            }
        }
        Ok(())
    }
}
