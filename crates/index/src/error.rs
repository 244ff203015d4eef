use canonical::DocumentIdentity;
use review::ApprovalError;
use thiserror::Error;

/// Errors surfaced by the version ledger.
///
/// Appending never fails; these come from decisions on versions, lookups of
/// versions that do not exist, and snapshot hand-off with a persistence layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LedgerError {
    #[error("no version {version_number} recorded for {identity}")]
    UnknownVersion {
        identity: DocumentIdentity,
        version_number: u64,
    },
    #[error(transparent)]
    Approval(#[from] ApprovalError),
    #[error("corrupt ledger snapshot: {0}")]
    CorruptSnapshot(String),
    #[error("snapshot serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Serialization(e.to_string())
    }
}

impl LedgerError {
    pub fn corrupt<E: std::fmt::Display>(detail: E) -> Self {
        Self::CorruptSnapshot(detail.to_string())
    }
}
