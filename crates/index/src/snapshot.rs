//! Serializable ledger state for hand-off to a persistence layer.
//!
//! The ledger itself never touches disk. A host that wants durability takes a
//! [`LedgerSnapshot`], stores it however it likes (the JSON helpers here are
//! one option), and later rebuilds a ledger with
//! [`VersionLedger::restore`](crate::VersionLedger::restore).

use std::collections::HashSet;

use canonical::DocumentIdentity;
use review::ApprovalStatus;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::version::{derive_version_id, DocumentVersion};
use crate::LedgerConfig;

/// Bump whenever the snapshot layout changes.
pub const LEDGER_SNAPSHOT_VERSION: u32 = 1;

/// All versions of one identity, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub identity: DocumentIdentity,
    pub versions: Vec<DocumentVersion>,
}

/// Point-in-time copy of every lineage in a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default = "default_snapshot_version")]
    pub format_version: u32,
    /// Ordered by identity.
    pub lineages: Vec<Lineage>,
}

const fn default_snapshot_version() -> u32 {
    LEDGER_SNAPSHOT_VERSION
}

impl LedgerSnapshot {
    pub fn to_json(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total number of versions across all lineages.
    pub fn version_count(&self) -> usize {
        self.lineages.iter().map(|l| l.versions.len()).sum()
    }

    /// Re-checks the lineage invariants a live ledger maintains by
    /// construction.
    ///
    /// Version ids are re-derived under `config`'s namespace, so a snapshot
    /// taken under another namespace is refused rather than mixing id schemes
    /// within one lineage.
    pub fn validate(&self, config: &LedgerConfig) -> Result<(), LedgerError> {
        if self.format_version != LEDGER_SNAPSHOT_VERSION {
            return Err(LedgerError::corrupt(format!(
                "unsupported snapshot format {} (expected {LEDGER_SNAPSHOT_VERSION})",
                self.format_version
            )));
        }

        let mut seen = HashSet::with_capacity(self.lineages.len());
        for lineage in &self.lineages {
            if !seen.insert(&lineage.identity) {
                return Err(LedgerError::corrupt(format!(
                    "identity {} appears more than once",
                    lineage.identity
                )));
            }
            if lineage.versions.is_empty() {
                return Err(LedgerError::corrupt(format!(
                    "identity {} has an empty lineage",
                    lineage.identity
                )));
            }
            for (idx, version) in lineage.versions.iter().enumerate() {
                check_version(config, &lineage.identity, idx as u64 + 1, version)?;
            }
        }
        Ok(())
    }
}

fn check_version(
    config: &LedgerConfig,
    identity: &DocumentIdentity,
    expected_number: u64,
    version: &DocumentVersion,
) -> Result<(), LedgerError> {
    if &version.identity != identity {
        return Err(LedgerError::corrupt(format!(
            "version {} filed under {identity} belongs to {}",
            version.version_number, version.identity
        )));
    }
    if version.version_number != expected_number {
        return Err(LedgerError::corrupt(format!(
            "lineage {identity} expected version {expected_number}, found {}",
            version.version_number
        )));
    }
    let expected_id = derive_version_id(&config.version_id_namespace, identity, expected_number);
    if version.version_id != expected_id {
        return Err(LedgerError::corrupt(format!(
            "version {expected_number} of {identity} has id {}, expected {expected_id}",
            version.version_id
        )));
    }
    let reviewed = version.reviewed_by.is_some() && version.reviewed_at.is_some();
    let unreviewed = version.reviewed_by.is_none()
        && version.reviewed_at.is_none()
        && version.review_note.is_none();
    let consistent = match version.status {
        ApprovalStatus::Pending => unreviewed,
        ApprovalStatus::Approved | ApprovalStatus::Rejected => reviewed,
    };
    if !consistent {
        return Err(LedgerError::corrupt(format!(
            "version {expected_number} of {identity} is {} but has inconsistent review fields",
            version.status
        )));
    }
    Ok(())
}
