//! Configuration types for identity resolution.
//!
//! [`IdentityConfig`] controls how an uploaded file name is reduced to the
//! normalized base name that groups every version of "the same" document.
//!
//! # Stability
//!
//! Identity keys are compared across uploads that may be weeks apart, so a
//! configuration must not change while a ledger built with it is live. A
//! change to `version_markers` or `normalize_unicode` splits existing lineages.
//!
//! # Examples
//!
//! ```rust
//! use canonical::IdentityConfig;
//!
//! let config = IdentityConfig::default();
//! assert!(config.normalize_unicode);
//! assert_eq!(config.version_markers, vec!["version".to_string(), "v".to_string()]);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Accepting revision suffixes
//!
//! ```rust
//! use canonical::IdentityConfig;
//!
//! let config = IdentityConfig {
//!     version_markers: vec!["version".into(), "rev".into(), "v".into()],
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for [`IdentityResolver`](crate::IdentityResolver).
///
/// # Fields
///
/// - `normalize_unicode`: apply NFKC before lowercasing, so composed and
///   decomposed accents (`"Caf\u{e9}"` vs `"Cafe\u{301}"`) resolve alike
/// - `version_markers`: words that may precede the trailing version digits,
///   tried longest first (`"version"` before `"v"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Apply Unicode NFKC normalization to the file name.
    ///
    /// Default: `true`
    pub normalize_unicode: bool,

    /// Markers recognised in a trailing version token (`planta_v2`,
    /// `memorial-version3`). Matched case-insensitively.
    ///
    /// Default: `["version", "v"]`
    pub version_markers: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            version_markers: vec!["version".into(), "v".into()],
        }
    }
}

impl IdentityConfig {
    /// Checks that every marker is a non-empty run of ASCII letters.
    ///
    /// Digits or separators inside a marker would let the version token
    /// swallow part of the base name, so they are rejected up front.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version_markers.is_empty() {
            return Err(CanonicalError::InvalidConfig(
                "version_markers must contain at least one marker".into(),
            ));
        }
        for marker in &self.version_markers {
            if marker.is_empty() || !marker.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(CanonicalError::InvalidConfig(format!(
                    "version marker {marker:?} must be non-empty ASCII letters"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_marker_list_rejected() {
        let cfg = IdentityConfig {
            version_markers: vec![],
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(CanonicalError::InvalidConfig(_))));
    }

    #[test]
    fn marker_with_digits_rejected() {
        let cfg = IdentityConfig {
            version_markers: vec!["v2".into()],
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("v2"));
    }
}
