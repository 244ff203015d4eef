//! # Docflow Index
//!
//! The version ledger: for every [`DocumentIdentity`] an ordered, gap-free
//! lineage of [`DocumentVersion`]s, each carrying its own approval state.
//!
//! ## Core Features
//!
//! - **Append-only lineages**: [`VersionLedger::append`] is the only way a
//!   version is created. Numbers start at 1 and grow by one per identity,
//!   including under concurrent uploads.
//! - **Per-identity locking**: lineages live in a sharded [`dashmap::DashMap`]
//!   with one mutex per identity. There is no ledger-wide lock.
//! - **Review on versions**: [`VersionLedger::decide`] runs the approval
//!   workflow from the `review` crate against a stored version, under the
//!   same per-identity lock that guards appends.
//! - **Read models**: latest/history lookups, per-project identity listings,
//!   a cross-project "recent uploads" feed and [`LedgerSummary`] counts.
//! - **Snapshots**: [`VersionLedger::snapshot`] and [`VersionLedger::restore`]
//!   hand the full state to and from an external persistence layer.
//!
//! The ledger performs no I/O and never reads a clock; timestamps arrive as
//! arguments.
//!
//! ## Example Usage
//!
//! ```
//! use canonical::IdentityResolver;
//! use chrono::Utc;
//! use index::{LedgerConfig, VersionDraft, VersionLedger};
//! use review::{ApprovalStatus, Decision};
//!
//! let ledger = VersionLedger::new(LedgerConfig::default());
//! let identity = IdentityResolver::default().resolve("P1", "planta_baixa_v1.dwg");
//!
//! let v1 = ledger.append(
//!     &identity,
//!     VersionDraft {
//!         file_name: "planta_baixa_v1.dwg".into(),
//!         uploader_id: "maria".into(),
//!         size_bytes: 2_000_000,
//!         content_type: "application/dwg".into(),
//!         submitted_at: Utc::now(),
//!     },
//! );
//! assert_eq!(v1.version_number, 1);
//!
//! let approved = ledger
//!     .decide(&identity, 1, Decision::Approve, "joao", Utc::now(), None)
//!     .unwrap();
//! assert_eq!(approved.status, ApprovalStatus::Approved);
//! ```

mod error;
mod ledger;
mod query;
mod snapshot;
mod version;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use canonical::DocumentIdentity;
pub use crate::error::LedgerError;
pub use crate::ledger::VersionLedger;
pub use crate::query::{LedgerSummary, UploaderSummary};
pub use crate::snapshot::{LedgerSnapshot, Lineage, LEDGER_SNAPSHOT_VERSION};
pub use crate::version::{DocumentVersion, VersionDraft};

/// Config for initializing the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Namespace for the UUIDv5 `version_id` of each version. Changing it
    /// changes every id the ledger hands out, so keep it fixed per
    /// deployment.
    pub version_id_namespace: Uuid,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            version_id_namespace: Uuid::NAMESPACE_OID,
        }
    }
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version_id_namespace(mut self, namespace: Uuid) -> Self {
        self.version_id_namespace = namespace;
        self
    }
}
