//! Hashing utilities for document identities.
//!
//! # Identity Key
//!
//! ```text
//! SHA-256(project_id_bytes || 0x00 || base_name_bytes)
//! ```
//!
//! The `0x00` separator keeps `("ab", "c")` and `("a", "bc")` apart. Neither
//! part can contain a NUL after resolution, since control characters never
//! survive file-name validation.
//!
//! # Examples
//!
//! ```rust
//! use canonical::hash_identity_parts;
//!
//! let key = hash_identity_parts("P1", "planta_baixa");
//! assert_eq!(key.len(), 64);
//! assert_ne!(key, hash_identity_parts("P2", "planta_baixa"));
//! ```

use sha2::{Digest, Sha256};

/// Compute the stable lineage key for a `(project, base name)` pair.
///
/// Returns a 64-character lowercase hex SHA-256 digest.
pub fn hash_identity_parts(project_id: &str, base_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(project_id.as_bytes());
    hasher.update([0]);
    hasher.update(base_name.as_bytes());
    hex::encode(hasher.finalize())
}
