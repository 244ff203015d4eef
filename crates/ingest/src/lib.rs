//! Docflow ingest admission layer.
//!
//! This is where an upload is first looked at. Given the name, size and
//! declared content type a client reported, we decide whether the file may
//! enter the document ledger at all.
//!
//! ## What we check, in order
//!
//! 1. **Name** - non-empty after control-character stripping and trimming,
//!    and a plain file name rather than a path
//! 2. **Extension** - in the configured accepted set (`.dwg` and `.pdf` by default)
//! 3. **Size** - more than zero bytes and no more than `max_size_bytes`
//!
//! The first failing rule decides the [`RejectReason`].
//!
//! ## Pure function guarantee
//!
//! Validation has no side effects and performs no I/O: the same arguments
//! always produce the same result.
//!
//! ## Example
//!
//! ```
//! use ingest::{FileValidator, IngestConfig, RejectReason};
//!
//! let validator = FileValidator::new(IngestConfig::default()).unwrap();
//!
//! let admitted = validator.validate("planta_baixa_v2.DWG", 2_000_000, "application/dwg").unwrap();
//! assert_eq!(admitted.extension, ".dwg");
//!
//! let rejected = validator.validate("sketch.exe", 500_000, "application/octet-stream");
//! assert!(matches!(rejected, Err(RejectReason::InvalidExtension { .. })));
//! ```
use std::collections::HashSet;

mod config;
mod error;
mod name;
mod types;

use crate::name::{extension_of, sanitize_file_name};

pub use crate::config::{ConfigError, IngestConfig, DEFAULT_MAX_SIZE_BYTES};
pub use crate::error::RejectReason;
pub use crate::types::{AdmittedFile, FileDescriptor, DEFAULT_CONTENT_TYPE};

/// Applies [`IngestConfig`] admission rules to candidate uploads.
#[derive(Debug, Clone)]
pub struct FileValidator {
    config: IngestConfig,
    extensions: HashSet<String>,
}

impl FileValidator {
    /// Build a validator after validating `config`.
    pub fn new(config: IngestConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_checked(config))
    }

    // Callers must have run `config.validate()` (or hold a known-good config).
    fn from_checked(config: IngestConfig) -> Self {
        let extensions = config
            .accepted_extensions
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect();
        Self { config, extensions }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Check one candidate upload.
    pub fn validate(
        &self,
        file_name: &str,
        size_bytes: u64,
        declared_content_type: &str,
    ) -> Result<AdmittedFile, RejectReason> {
        let file_name = sanitize_file_name(file_name, self.config.strip_control_chars)
            .ok_or(RejectReason::InvalidName)?;

        let extension = match extension_of(&file_name) {
            Some(ext) if self.extensions.contains(&ext) => ext,
            other => {
                return Err(RejectReason::InvalidExtension {
                    extension: other.unwrap_or_default(),
                })
            }
        };

        if size_bytes == 0 {
            return Err(RejectReason::EmptyFile);
        }
        if size_bytes > self.config.max_size_bytes {
            return Err(RejectReason::TooLarge {
                size_bytes,
                max_bytes: self.config.max_size_bytes,
            });
        }

        let content_type = match declared_content_type.trim() {
            "" => DEFAULT_CONTENT_TYPE.to_string(),
            declared => declared.to_string(),
        };

        Ok(AdmittedFile {
            file_name,
            extension,
            size_bytes,
            content_type,
        })
    }

    /// Convenience wrapper over [`validate`](Self::validate) for a descriptor.
    pub fn validate_descriptor(&self, file: &FileDescriptor) -> Result<AdmittedFile, RejectReason> {
        self.validate(&file.name, file.size_bytes, &file.content_type)
    }
}

impl Default for FileValidator {
    fn default() -> Self {
        // The default config is covered by `default_config_is_valid`.
        Self::from_checked(IngestConfig::default())
    }
}
