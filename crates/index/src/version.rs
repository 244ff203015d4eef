//! Document versions: one record per uploaded artifact.

use canonical::DocumentIdentity;
use chrono::{DateTime, Utc};
use review::{transition, ApprovalError, ApprovalStatus, Decision};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-supplied facts about an upload, handed to
/// [`VersionLedger::append`](crate::VersionLedger::append).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDraft {
    pub file_name: String,
    pub uploader_id: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub submitted_at: DateTime<Utc>,
}

/// One uploaded occurrence of a document.
///
/// Everything except the review fields is fixed when the ledger creates the
/// version. `reviewed_by`, `reviewed_at` and `review_note` are filled in by
/// [`decide`](Self::decide) and stay `None` while the version is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentVersion {
    /// UUIDv5 of the identity key and version number; stable across restores, which
    /// refuse snapshots whose ids were derived under another namespace.
    pub version_id: Uuid,
    pub identity: DocumentIdentity,
    /// 1-based, gap-free within the identity's lineage.
    pub version_number: u64,
    /// Name as uploaded, after sanitization.
    pub file_name: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub uploader_id: String,
    pub submitted_at: DateTime<Utc>,
    pub status: ApprovalStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_note: Option<String>,
}

impl DocumentVersion {
    /// Record a reviewer's decision on this version.
    ///
    /// Fails with [`ApprovalError::InvalidTransition`] when the version is
    /// already approved or rejected; the version is left untouched in that
    /// case.
    pub fn decide(
        &mut self,
        decision: Decision,
        reviewer_id: &str,
        decided_at: DateTime<Utc>,
        note: Option<String>,
    ) -> Result<(), ApprovalError> {
        self.status = transition(self.status, decision)?;
        self.reviewed_by = Some(reviewer_id.to_string());
        self.reviewed_at = Some(decided_at);
        self.review_note = note;
        Ok(())
    }

    /// Seconds between submission and decision, once decided.
    pub fn review_latency_secs(&self) -> Option<i64> {
        self.reviewed_at
            .map(|at| (at - self.submitted_at).num_seconds())
    }
}

pub(crate) fn derive_version_id(
    namespace: &Uuid,
    identity: &DocumentIdentity,
    version_number: u64,
) -> Uuid {
    let mut name = identity.key();
    name.push('\0');
    name.push_str(&version_number.to_string());
    Uuid::new_v5(namespace, name.as_bytes())
}
