//! The logical identity shared by every version of one document.
//!
//! A [`DocumentIdentity`] is never stored as mutable state: it is recomputed
//! from `(project_id, file_name)` by [`IdentityResolver`](crate::IdentityResolver)
//! on every upload and used as the lineage key in the version ledger.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::hash_identity_parts;

/// `(project_id, normalized_base_name)` pair grouping a version lineage.
///
/// Ordering is by project, then base name, which keeps per-project listings
/// stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentIdentity {
    project_id: String,
    base_name: String,
}

impl DocumentIdentity {
    pub(crate) fn new(project_id: &str, base_name: String) -> Self {
        Self {
            project_id: project_id.to_owned(),
            base_name,
        }
    }

    /// Project the document belongs to, exactly as supplied by the caller.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Lowercased base name with extension, version token and separator
    /// noise removed.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Stable hex digest of this identity, suitable as an opaque storage key.
    pub fn key(&self) -> String {
        hash_identity_parts(&self.project_id, &self.base_name)
    }
}

impl fmt::Display for DocumentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project_id, self.base_name)
    }
}
