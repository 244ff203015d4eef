//! Data model for candidate uploads.
//!
//! ```text
//! FileDescriptor                AdmittedFile
//! ├── name          ──validate──▶ ├── file_name     (sanitized)
//! ├── size_bytes                  ├── extension     (lowercased, with dot)
//! └── content_type                ├── size_bytes
//!                                 └── content_type  (defaulted when blank)
//! ```
use serde::{Deserialize, Serialize};

/// Content type recorded when the uploader's client declared none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A raw file as described by the uploading client. The bytes themselves
/// never pass through this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub size_bytes: u64,
    #[serde(default)]
    pub content_type: String,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size_bytes: u64, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            content_type: content_type.into(),
        }
    }
}

/// A file that passed admission, with its name sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmittedFile {
    pub file_name: String,
    pub extension: String,
    pub size_bytes: u64,
    pub content_type: String,
}
