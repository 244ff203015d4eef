use std::sync::{Arc, Mutex, MutexGuard};

use canonical::DocumentIdentity;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use review::{ApprovalStatus, Decision};
use tracing::debug;

use crate::error::LedgerError;
use crate::query::LedgerSummary;
use crate::snapshot::{LedgerSnapshot, Lineage, LEDGER_SNAPSHOT_VERSION};
use crate::version::{derive_version_id, DocumentVersion, VersionDraft};
use crate::LedgerConfig;

#[derive(Debug, Default)]
struct LedgerEntry {
    versions: Vec<DocumentVersion>,
}

type SharedEntry = Arc<Mutex<LedgerEntry>>;

/// Append-only store of version lineages, keyed by [`DocumentIdentity`].
///
/// Each identity owns its own mutex. Appends and decisions on one identity
/// are serialized; different identities never wait on each other. The map's
/// shard guard is always released before an entry mutex is taken, so no
/// thread holds two locks at once.
#[derive(Debug, Default)]
pub struct VersionLedger {
    config: LedgerConfig,
    entries: DashMap<DocumentIdentity, SharedEntry>,
}

impl VersionLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            entries: DashMap::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Record a new version of `identity` and return it.
    ///
    /// The version number is `count(identity) + 1`, taken under the entry
    /// lock, and the new version starts `Pending`. This is the only way
    /// versions come into existence.
    pub fn append(&self, identity: &DocumentIdentity, draft: VersionDraft) -> DocumentVersion {
        let entry = self.entry_for(identity);
        let mut guard = lock(&entry);

        let version_number = guard.versions.len() as u64 + 1;
        let version = DocumentVersion {
            version_id: derive_version_id(
                &self.config.version_id_namespace,
                identity,
                version_number,
            ),
            identity: identity.clone(),
            version_number,
            file_name: draft.file_name,
            size_bytes: draft.size_bytes,
            content_type: draft.content_type,
            uploader_id: draft.uploader_id,
            submitted_at: draft.submitted_at,
            status: ApprovalStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_note: None,
        };
        guard.versions.push(version.clone());
        drop(guard);

        debug!(
            identity = %identity,
            version_number,
            version_id = %version.version_id,
            "version_appended"
        );
        version
    }

    /// Most recent version of `identity`, if any has been recorded.
    pub fn latest(&self, identity: &DocumentIdentity) -> Option<DocumentVersion> {
        let entry = self.existing(identity)?;
        let guard = lock(&entry);
        guard.versions.last().cloned()
    }

    /// Every version of `identity`, oldest first. Empty when unseen.
    pub fn history(&self, identity: &DocumentIdentity) -> Vec<DocumentVersion> {
        match self.existing(identity) {
            Some(entry) => lock(&entry).versions.clone(),
            None => Vec::new(),
        }
    }

    pub fn get(&self, identity: &DocumentIdentity, version_number: u64) -> Option<DocumentVersion> {
        let entry = self.existing(identity)?;
        let guard = lock(&entry);
        version_index(version_number, guard.versions.len()).map(|idx| guard.versions[idx].clone())
    }

    /// Apply a reviewer decision to one stored version.
    ///
    /// Runs under the identity's lock, so two reviewers racing on the same
    /// pending version see exactly one success; the loser gets
    /// [`LedgerError::Approval`] and the stored version is unchanged.
    pub fn decide(
        &self,
        identity: &DocumentIdentity,
        version_number: u64,
        decision: Decision,
        reviewer_id: &str,
        decided_at: DateTime<Utc>,
        note: Option<String>,
    ) -> Result<DocumentVersion, LedgerError> {
        let unknown = || LedgerError::UnknownVersion {
            identity: identity.clone(),
            version_number,
        };
        let entry = self.existing(identity).ok_or_else(unknown)?;
        let mut guard = lock(&entry);
        let idx = version_index(version_number, guard.versions.len()).ok_or_else(unknown)?;

        let version = &mut guard.versions[idx];
        version.decide(decision, reviewer_id, decided_at, note)?;
        let decided = version.clone();
        drop(guard);

        debug!(
            identity = %identity,
            version_number,
            status = %decided.status,
            "version_decided"
        );
        Ok(decided)
    }

    /// Identities of `project_id` that have at least one version, sorted.
    pub fn identities(&self, project_id: &str) -> Vec<DocumentIdentity> {
        let candidates: Vec<(DocumentIdentity, SharedEntry)> = self
            .entries
            .iter()
            .filter(|item| item.key().project_id() == project_id)
            .map(|item| (item.key().clone(), Arc::clone(item.value())))
            .collect();

        let mut out: Vec<DocumentIdentity> = candidates
            .into_iter()
            .filter(|(_, entry)| !lock(entry).versions.is_empty())
            .map(|(identity, _)| identity)
            .collect();
        out.sort();
        out
    }

    /// Up to `limit` versions across the whole ledger, newest submission
    /// first.
    pub fn recent(&self, limit: usize) -> Vec<DocumentVersion> {
        let mut all = self.all_versions(None);
        all.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| a.identity.cmp(&b.identity))
                .then_with(|| b.version_number.cmp(&a.version_number))
        });
        all.truncate(limit);
        all
    }

    /// Aggregate counts over the ledger, or over one project.
    pub fn summary(&self, project_id: Option<&str>) -> LedgerSummary {
        let versions = self.all_versions(project_id);
        LedgerSummary::from_versions(&versions)
    }

    /// Number of identities with at least one version.
    pub fn document_count(&self) -> usize {
        self.shared_entries(None)
            .iter()
            .filter(|entry| !lock(entry).versions.is_empty())
            .count()
    }

    /// Copy of the full ledger state.
    ///
    /// Each lineage is copied under its own lock; the snapshot is consistent
    /// per identity, not across identities.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let entries: Vec<(DocumentIdentity, SharedEntry)> = self
            .entries
            .iter()
            .map(|item| (item.key().clone(), Arc::clone(item.value())))
            .collect();

        let mut lineages: Vec<Lineage> = entries
            .into_iter()
            .filter_map(|(identity, entry)| {
                let versions = lock(&entry).versions.clone();
                (!versions.is_empty()).then_some(Lineage { identity, versions })
            })
            .collect();
        lineages.sort_by(|a, b| a.identity.cmp(&b.identity));

        LedgerSnapshot {
            format_version: LEDGER_SNAPSHOT_VERSION,
            lineages,
        }
    }

    /// Build a ledger from a snapshot after re-checking its invariants.
    ///
    /// Fails with [`LedgerError::CorruptSnapshot`] when any version id differs
    /// from the one `config` would assign, including snapshots taken under a
    /// different `version_id_namespace`.
    pub fn restore(config: LedgerConfig, snapshot: LedgerSnapshot) -> Result<Self, LedgerError> {
        snapshot.validate(&config)?;
        let ledger = Self::new(config);
        for lineage in snapshot.lineages {
            ledger.entries.insert(
                lineage.identity,
                Arc::new(Mutex::new(LedgerEntry {
                    versions: lineage.versions,
                })),
            );
        }
        debug!(documents = ledger.entries.len(), "ledger_restored");
        Ok(ledger)
    }

    fn entry_for(&self, identity: &DocumentIdentity) -> SharedEntry {
        if let Some(entry) = self.existing(identity) {
            return entry;
        }
        let entry = self.entries.entry(identity.clone()).or_default();
        Arc::clone(entry.value())
    }

    fn existing(&self, identity: &DocumentIdentity) -> Option<SharedEntry> {
        self.entries.get(identity).map(|entry| Arc::clone(entry.value()))
    }

    fn shared_entries(&self, project_id: Option<&str>) -> Vec<SharedEntry> {
        self.entries
            .iter()
            .filter(|item| project_id.is_none_or(|p| item.key().project_id() == p))
            .map(|item| Arc::clone(item.value()))
            .collect()
    }

    fn all_versions(&self, project_id: Option<&str>) -> Vec<DocumentVersion> {
        self.shared_entries(project_id)
            .iter()
            .flat_map(|entry| lock(entry).versions.clone())
            .collect()
    }
}

fn version_index(version_number: u64, len: usize) -> Option<usize> {
    let idx = usize::try_from(version_number).ok()?.checked_sub(1)?;
    (idx < len).then_some(idx)
}

// A panic while holding an entry lock cannot leave a half-written version
// behind (the push is the last mutation), so a poisoned lock is still usable.
fn lock(entry: &Mutex<LedgerEntry>) -> MutexGuard<'_, LedgerEntry> {
    entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
