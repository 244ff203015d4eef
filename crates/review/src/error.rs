use thiserror::Error;

use crate::status::{ApprovalStatus, Decision};

/// Errors raised by the approval workflow.
///
/// These signal caller misuse (deciding twice on the same version) rather
/// than bad input, so hosts usually map them to a conflict response.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApprovalError {
    /// The version is not `Pending`; terminal states accept no decision.
    #[error("cannot {decision} a version that is already {from}")]
    InvalidTransition {
        from: ApprovalStatus,
        decision: Decision,
    },
}
