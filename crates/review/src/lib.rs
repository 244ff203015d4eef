//! Docflow approval workflow.
//!
//! Every uploaded document version starts `Pending` and receives at most one
//! reviewer decision, which moves it to `Approved` or `Rejected` for good.
//! The workflow is attached to versions, never to a document identity, so a
//! rejected drawing is fixed by uploading a new version rather than by
//! reopening the old one.
//!
//! This crate holds only the transition rules. Recording who decided and
//! when, and serializing decisions per version, is the version ledger's job.
//!
//! ```rust
//! use review::{transition, ApprovalError, ApprovalStatus, Decision};
//!
//! let approved = transition(ApprovalStatus::Pending, Decision::Approve).unwrap();
//! assert_eq!(approved, ApprovalStatus::Approved);
//!
//! let err = transition(approved, Decision::Reject).unwrap_err();
//! assert!(matches!(err, ApprovalError::InvalidTransition { .. }));
//! ```

mod error;
mod status;

pub use crate::error::ApprovalError;
pub use crate::status::{allowed_transitions, transition, ApprovalStatus, Decision};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_message_names_both_sides() {
        let err = ApprovalError::InvalidTransition {
            from: ApprovalStatus::Approved,
            decision: Decision::Reject,
        };
        assert_eq!(
            err.to_string(),
            "cannot reject a version that is already approved"
        );
    }

    #[test]
    fn status_serializes_by_variant_name() {
        let json = serde_json::to_string(&ApprovalStatus::Rejected).expect("serialize");
        assert_eq!(json, "\"Rejected\"");
        let back: ApprovalStatus = serde_json::from_str("\"Pending\"").expect("deserialize");
        assert_eq!(back, ApprovalStatus::Pending);
    }
}
