//! Read-side aggregates over the ledger.
//!
//! These are the figures the project dashboard shows as tiles: how many
//! documents and versions exist, where they sit in review, how often
//! uploads end up approved and how long reviewers take.

use std::collections::{BTreeMap, HashSet};

use canonical::DocumentIdentity;
use review::ApprovalStatus;
use serde::{Deserialize, Serialize};

use crate::version::DocumentVersion;

/// Per-uploader activity within a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploaderSummary {
    pub uploader_id: String,
    pub uploads: u64,
    pub approvals: u64,
    /// `approvals / uploads`, in `0.0..=1.0`.
    pub efficiency: f64,
}

/// Counts and rates over a set of versions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Distinct identities with at least one version.
    pub documents: u64,
    pub versions: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    /// Share of all versions that were approved; `0.0` on an empty ledger.
    pub approval_rate: f64,
    /// Mean seconds from submission to decision over decided versions.
    pub mean_review_latency_secs: Option<f64>,
    /// Sorted by uploads, most active first.
    pub uploaders: Vec<UploaderSummary>,
}

impl LedgerSummary {
    pub(crate) fn from_versions<'a, I>(versions: I) -> Self
    where
        I: IntoIterator<Item = &'a DocumentVersion>,
    {
        let mut summary = LedgerSummary::default();
        let mut identities: HashSet<&DocumentIdentity> = HashSet::new();
        let mut per_uploader: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
        let mut latency_total = 0i64;
        let mut latency_count = 0u64;

        for version in versions {
            identities.insert(&version.identity);
            summary.versions += 1;
            let slot = per_uploader.entry(&version.uploader_id).or_default();
            slot.0 += 1;
            match version.status {
                ApprovalStatus::Pending => summary.pending += 1,
                ApprovalStatus::Approved => {
                    summary.approved += 1;
                    slot.1 += 1;
                }
                ApprovalStatus::Rejected => summary.rejected += 1,
            }
            if let Some(secs) = version.review_latency_secs() {
                latency_total += secs;
                latency_count += 1;
            }
        }

        summary.documents = identities.len() as u64;
        if summary.versions > 0 {
            summary.approval_rate = summary.approved as f64 / summary.versions as f64;
        }
        if latency_count > 0 {
            summary.mean_review_latency_secs = Some(latency_total as f64 / latency_count as f64);
        }

        let mut uploaders: Vec<UploaderSummary> = per_uploader
            .into_iter()
            .map(|(uploader_id, (uploads, approvals))| UploaderSummary {
                uploader_id: uploader_id.to_string(),
                uploads,
                approvals,
                efficiency: approvals as f64 / uploads as f64,
            })
            .collect();
        // Stable sort keeps the BTreeMap's id order among equal counts.
        uploaders.sort_by(|a, b| b.uploads.cmp(&a.uploads));
        summary.uploaders = uploaders;
        summary
    }
}
