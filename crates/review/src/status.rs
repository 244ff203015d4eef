//! Approval states and reviewer decisions.
//!
//! ```text
//!            Approve
//!   Pending ─────────▶ Approved (terminal)
//!      │
//!      │ Reject
//!      ▼
//!   Rejected (terminal)
//! ```
//!
//! Nothing leaves a terminal state. Correcting an approved or rejected
//! document means uploading a new version, which starts again at `Pending`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApprovalError;

/// Lifecycle state of one document version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApprovalStatus {
    /// Submitted and awaiting a reviewer.
    #[default]
    Pending,
    /// Accepted by a reviewer.
    Approved,
    /// Refused by a reviewer.
    Rejected,
}

impl ApprovalStatus {
    /// `true` for `Approved` and `Rejected`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ApprovalStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reviewer's verdict on a pending version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// The state a pending version moves to under this decision.
    pub fn target(self) -> ApprovalStatus {
        match self {
            Decision::Approve => ApprovalStatus::Approved,
            Decision::Reject => ApprovalStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Approve => f.write_str("approve"),
            Decision::Reject => f.write_str("reject"),
        }
    }
}

/// States reachable from `from` in one step.
pub fn allowed_transitions(from: ApprovalStatus) -> Vec<ApprovalStatus> {
    use ApprovalStatus::*;
    match from {
        Pending => vec![Approved, Rejected],
        Approved => vec![],
        Rejected => vec![],
    }
}

/// Applies `decision` to a version currently in `from`.
///
/// Returns the new state, or [`ApprovalError::InvalidTransition`] when `from`
/// is terminal. The caller's state is untouched on error since this only
/// computes the successor.
pub fn transition(from: ApprovalStatus, decision: Decision) -> Result<ApprovalStatus, ApprovalError> {
    let to = decision.target();
    if allowed_transitions(from).contains(&to) {
        Ok(to)
    } else {
        Err(ApprovalError::InvalidTransition { from, decision })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_accepts_both_decisions() {
        assert_eq!(
            transition(ApprovalStatus::Pending, Decision::Approve),
            Ok(ApprovalStatus::Approved)
        );
        assert_eq!(
            transition(ApprovalStatus::Pending, Decision::Reject),
            Ok(ApprovalStatus::Rejected)
        );
    }

    #[test]
    fn terminal_states_refuse_every_decision() {
        for from in [ApprovalStatus::Approved, ApprovalStatus::Rejected] {
            assert!(from.is_terminal());
            assert!(allowed_transitions(from).is_empty());
            for decision in [Decision::Approve, Decision::Reject] {
                assert_eq!(
                    transition(from, decision),
                    Err(ApprovalError::InvalidTransition { from, decision })
                );
            }
        }
    }

    #[test]
    fn default_is_pending() {
        assert_eq!(ApprovalStatus::default(), ApprovalStatus::Pending);
        assert!(!ApprovalStatus::Pending.is_terminal());
    }
}
