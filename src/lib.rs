//! Workspace umbrella crate for Docflow, the document intake core of a
//! project dashboard.
//!
//! This crate stitches together upload admission, identity resolution, the
//! version ledger and the approval workflow so callers can submit a batch of
//! files for a project and review the resulting versions through a single
//! [`IngestionService`].

pub mod clock;
pub mod config;
mod service;

pub use canonical::{CanonicalError, DocumentIdentity, IdentityConfig, IdentityResolver};
pub use index::{
    DocumentVersion, LedgerConfig, LedgerError, LedgerSnapshot, LedgerSummary, UploaderSummary,
    VersionDraft, VersionLedger,
};
pub use ingest::{
    AdmittedFile, ConfigError, FileDescriptor, FileValidator, IngestConfig, RejectReason,
};
pub use review::{ApprovalError, ApprovalStatus, Decision};

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::{ConfigLoadError, DocflowConfig, LoggingConfig};
pub use crate::service::{IngestionService, IngestionServiceBuilder};

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

/// The authenticated principal calling into the service. Only `id` is
/// recorded; `role` is carried for the host's own capability checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caller {
    pub id: String,
    pub role: String,
}

impl Caller {
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
        }
    }
}

/// Result of submitting one file, reported in the same position as the
/// file in the submitted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestionOutcome {
    Accepted {
        version: DocumentVersion,
        /// The identity already had at least one version before this one.
        is_duplicate: bool,
    },
    Rejected {
        file_name: String,
        reason: RejectReason,
    },
}

impl IngestionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, IngestionOutcome::Accepted { .. })
    }

    pub fn version(&self) -> Option<&DocumentVersion> {
        match self {
            IngestionOutcome::Accepted { version, .. } => Some(version),
            IngestionOutcome::Rejected { .. } => None,
        }
    }

    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            IngestionOutcome::Accepted { .. } => None,
            IngestionOutcome::Rejected { reason, .. } => Some(reason),
        }
    }
}

/// Errors that can occur while assembling an [`IngestionService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    Ingest(ConfigError),
    Identity(CanonicalError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Ingest(err) => write!(f, "invalid ingest configuration: {err}"),
            BuildError::Identity(err) => write!(f, "invalid identity configuration: {err}"),
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BuildError::Ingest(err) => Some(err),
            BuildError::Identity(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BuildError {
    fn from(value: ConfigError) -> Self {
        BuildError::Ingest(value)
    }
}

impl From<CanonicalError> for BuildError {
    fn from(value: CanonicalError) -> Self {
        BuildError::Identity(value)
    }
}

/// Metrics observer for service stages.
pub trait IngestMetrics: Send + Sync {
    fn record_validation(&self, latency: Duration, result: Result<(), RejectReason>);
    fn record_append(&self, latency: Duration, version_number: u64);
    fn record_decision(&self, latency: Duration, result: Result<(), LedgerError>);
}

/// Install or clear the global ingest metrics recorder.
pub fn set_ingest_metrics(recorder: Option<Arc<dyn IngestMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn IngestMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn IngestMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn IngestMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn IngestMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_validation(self, result: Result<(), RejectReason>) {
        self.recorder.record_validation(self.start.elapsed(), result);
    }

    pub(crate) fn record_append(self, version_number: u64) {
        self.recorder
            .record_append(self.start.elapsed(), version_number);
    }

    pub(crate) fn record_decision(self, result: Result<(), LedgerError>) {
        self.recorder.record_decision(self.start.elapsed(), result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn service() -> IngestionService {
        IngestionService::builder()
            .clock(FixedClock::new(
                Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            ))
            .build()
            .expect("default service")
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let outcomes = service().ingest(
            "P1",
            "maria",
            &[
                FileDescriptor::new("plan.dwg", 10, "application/dwg"),
                FileDescriptor::new("sketch.exe", 10, ""),
            ],
        );
        let json = serde_json::to_value(&outcomes).expect("serialize");
        assert_eq!(json[0]["outcome"], "accepted");
        assert_eq!(json[0]["is_duplicate"], false);
        assert_eq!(json[0]["version"]["version_number"], 1);
        assert_eq!(json[1]["outcome"], "rejected");
        assert_eq!(json[1]["reason"]["code"], "invalid_extension");
    }

    #[test]
    fn outcome_accessors() {
        let outcomes = service().ingest(
            "P1",
            "maria",
            &[
                FileDescriptor::new("plan.dwg", 10, ""),
                FileDescriptor::new("blank.pdf", 0, ""),
            ],
        );
        assert!(outcomes[0].is_accepted());
        assert!(outcomes[0].version().is_some());
        assert!(outcomes[0].reject_reason().is_none());
        assert_eq!(outcomes[1].reject_reason(), Some(&RejectReason::EmptyFile));
    }

    #[test]
    fn build_error_reports_stage() {
        let err = IngestionService::builder()
            .ingest_config(IngestConfig {
                accepted_extensions: vec![],
                ..Default::default()
            })
            .build()
            .err()
            .expect("empty extension list is invalid");
        assert!(matches!(err, BuildError::Ingest(ConfigError::NoAcceptedExtensions)));
        assert!(err.to_string().starts_with("invalid ingest configuration"));
        assert!(err.source().is_some());
    }

    #[derive(Default)]
    struct CountingMetrics {
        events: RwLock<Vec<&'static str>>,
    }

    impl CountingMetrics {
        fn snapshot(&self) -> Vec<&'static str> {
            self.events.read().unwrap().clone()
        }
    }

    impl IngestMetrics for CountingMetrics {
        fn record_validation(&self, _latency: Duration, result: Result<(), RejectReason>) {
            let label = if result.is_ok() {
                "validation_ok"
            } else {
                "validation_err"
            };
            self.events.write().unwrap().push(label);
        }

        fn record_append(&self, _latency: Duration, _version_number: u64) {
            self.events.write().unwrap().push("append");
        }

        fn record_decision(&self, _latency: Duration, result: Result<(), LedgerError>) {
            let label = if result.is_ok() {
                "decision_ok"
            } else {
                "decision_err"
            };
            self.events.write().unwrap().push(label);
        }
    }

    #[test]
    fn metrics_recorder_tracks_service_outcome() {
        let metrics = Arc::new(CountingMetrics::default());
        set_ingest_metrics(Some(metrics.clone()));

        let service = service();
        let outcomes = service.ingest(
            "P1",
            "maria",
            &[
                FileDescriptor::new("plan.dwg", 10, ""),
                FileDescriptor::new("sketch.exe", 10, ""),
            ],
        );
        let identity = outcomes[0].version().expect("accepted").identity.clone();
        service
            .decide(&identity, 1, Decision::Approve, "joao", None)
            .expect("approve");
        let _ = service.decide(&identity, 1, Decision::Reject, "joao", None);

        set_ingest_metrics(None);

        let events = metrics.snapshot();
        assert!(events.contains(&"validation_ok"));
        assert!(events.contains(&"validation_err"));
        assert!(events.contains(&"append"));
        assert!(events.contains(&"decision_ok"));
        assert!(events.contains(&"decision_err"));
    }
}
