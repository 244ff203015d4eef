//! Rejection reasons produced by upload admission.
//!
//! Every reason is an expected, recoverable outcome. A rejected file is
//! reported back to the uploader next to its accepted siblings; it never
//! aborts the rest of the batch.
//!
//! # Reasons
//!
//! | Reason | Code | HTTP |
//! |--------|------|------|
//! | [`InvalidName`](RejectReason::InvalidName) | `invalid_name` | 400 |
//! | [`InvalidExtension`](RejectReason::InvalidExtension) | `invalid_extension` | 415 |
//! | [`EmptyFile`](RejectReason::EmptyFile) | `empty_file` | 400 |
//! | [`TooLarge`](RejectReason::TooLarge) | `too_large` | 413 |
//!
//! # Examples
//!
//! ```rust
//! use ingest::RejectReason;
//!
//! fn message(reason: &RejectReason) -> String {
//!     match reason {
//!         RejectReason::TooLarge { max_bytes, .. } => {
//!             format!("files are limited to {} MiB", max_bytes / 1024 / 1024)
//!         }
//!         other => other.to_string(),
//!     }
//! }
//!
//! let reason = RejectReason::TooLarge { size_bytes: 11_000_000, max_bytes: 10_485_760 };
//! assert_eq!(message(&reason), "files are limited to 10 MiB");
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a candidate upload was not admitted.
///
/// The enum is `#[non_exhaustive]`; include a catch-all arm when matching.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
#[non_exhaustive]
pub enum RejectReason {
    /// The name is empty after trimming, or is a path rather than a plain
    /// file name.
    #[error("file name is empty or not a plain file name")]
    InvalidName,

    /// The extension is not in the accepted set. `extension` holds what was
    /// found, lowercased, or an empty string when the name has none.
    #[error("extension {extension:?} is not accepted")]
    InvalidExtension { extension: String },

    /// Zero-byte upload.
    #[error("file is empty")]
    EmptyFile,

    /// Larger than the configured limit.
    #[error("file size {size_bytes} exceeds limit of {max_bytes} bytes")]
    TooLarge { size_bytes: u64, max_bytes: u64 },
}

impl RejectReason {
    /// Stable snake_case label, identical to the serialized `code` tag.
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::InvalidName => "invalid_name",
            RejectReason::InvalidExtension { .. } => "invalid_extension",
            RejectReason::EmptyFile => "empty_file",
            RejectReason::TooLarge { .. } => "too_large",
        }
    }

    /// Suggested HTTP status for hosts that expose uploads over HTTP.
    ///
    /// ```rust
    /// use ingest::RejectReason;
    ///
    /// assert_eq!(RejectReason::EmptyFile.http_status_code(), 400);
    /// ```
    pub fn http_status_code(&self) -> u16 {
        match self {
            RejectReason::TooLarge { .. } => 413,
            RejectReason::InvalidExtension { .. } => 415,
            _ => 400,
        }
    }
}
