use std::sync::Arc;
use std::time::Instant;

use canonical::{DocumentIdentity, IdentityConfig, IdentityResolver};
use index::{
    DocumentVersion, LedgerConfig, LedgerError, LedgerSnapshot, LedgerSummary, VersionDraft,
    VersionLedger,
};
use ingest::{FileDescriptor, FileValidator, IngestConfig};
use review::Decision;
use tracing::{info, info_span, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::DocflowConfig;
use crate::{BuildError, Caller, IngestionOutcome, MetricsSpan};

/// Entry point for submitting uploads and reviewing the versions they
/// create.
///
/// Validation and identity resolution are stateless; the only shared state
/// is the [`VersionLedger`], which callers may share between services via
/// [`IngestionServiceBuilder::ledger`]. The service is `Send + Sync` and is
/// meant to be wrapped in an `Arc` and used from many threads.
pub struct IngestionService {
    validator: FileValidator,
    resolver: IdentityResolver,
    ledger: Arc<VersionLedger>,
    clock: Arc<dyn Clock>,
}

impl IngestionService {
    pub fn builder() -> IngestionServiceBuilder {
        IngestionServiceBuilder::default()
    }

    /// Build a service from a loaded [`DocflowConfig`] with the system clock.
    pub fn from_config(config: &DocflowConfig) -> Result<Self, BuildError> {
        Self::builder().with_config(config).build()
    }

    /// Submit a batch of files for `project_id` on behalf of `uploader_id`.
    ///
    /// Returns one outcome per input file, in input order. Files are
    /// processed one after another; a rejected file never reaches the ledger
    /// and never affects its siblings. Two files in the same batch that
    /// resolve to the same identity become consecutive versions.
    pub fn ingest(
        &self,
        project_id: &str,
        uploader_id: &str,
        files: &[FileDescriptor],
    ) -> Vec<IngestionOutcome> {
        let span = info_span!(
            "docflow.ingest",
            project_id = %project_id,
            uploader_id = %uploader_id,
            files = files.len()
        );
        let _guard = span.enter();

        files
            .iter()
            .map(|file| self.ingest_one(project_id, uploader_id, file))
            .collect()
    }

    /// [`ingest`](Self::ingest) with the uploader taken from `caller`.
    pub fn ingest_as(
        &self,
        caller: &Caller,
        project_id: &str,
        files: &[FileDescriptor],
    ) -> Vec<IngestionOutcome> {
        self.ingest(project_id, &caller.id, files)
    }

    fn ingest_one(
        &self,
        project_id: &str,
        uploader_id: &str,
        file: &FileDescriptor,
    ) -> IngestionOutcome {
        let start = Instant::now();

        let mut validation_metrics = MetricsSpan::start();
        let admitted = match self.validator.validate_descriptor(file) {
            Ok(admitted) => {
                if let Some(span) = validation_metrics.take() {
                    span.record_validation(Ok(()));
                }
                admitted
            }
            Err(reason) => {
                if let Some(span) = validation_metrics.take() {
                    span.record_validation(Err(reason.clone()));
                }
                warn!(
                    file_name = %file.name,
                    size_bytes = file.size_bytes,
                    code = reason.code(),
                    error = %reason,
                    elapsed_micros = start.elapsed().as_micros(),
                    "ingest_rejected"
                );
                return IngestionOutcome::Rejected {
                    file_name: file.name.clone(),
                    reason,
                };
            }
        };

        let identity = self.resolver.resolve(project_id, &admitted.file_name);

        let append_metrics = MetricsSpan::start();
        let version = self.ledger.append(
            &identity,
            VersionDraft {
                file_name: admitted.file_name,
                uploader_id: uploader_id.to_string(),
                size_bytes: admitted.size_bytes,
                content_type: admitted.content_type,
                submitted_at: self.clock.now(),
            },
        );
        if let Some(span) = append_metrics {
            span.record_append(version.version_number);
        }

        let is_duplicate = version.version_number > 1;
        info!(
            identity = %identity,
            version_number = version.version_number,
            version_id = %version.version_id,
            is_duplicate,
            elapsed_micros = start.elapsed().as_micros(),
            "ingest_accepted"
        );

        IngestionOutcome::Accepted {
            version,
            is_duplicate,
        }
    }

    /// Approve or reject one version, stamping the decision time from the
    /// service clock.
    pub fn decide(
        &self,
        identity: &DocumentIdentity,
        version_number: u64,
        decision: Decision,
        reviewer_id: &str,
        note: Option<String>,
    ) -> Result<DocumentVersion, LedgerError> {
        let metrics = MetricsSpan::start();
        let result = self.ledger.decide(
            identity,
            version_number,
            decision,
            reviewer_id,
            self.clock.now(),
            note,
        );

        match &result {
            Ok(version) => {
                info!(
                    identity = %identity,
                    version_number,
                    reviewer_id = %reviewer_id,
                    status = %version.status,
                    "review_decided"
                );
            }
            Err(err) => {
                warn!(
                    identity = %identity,
                    version_number,
                    reviewer_id = %reviewer_id,
                    decision = %decision,
                    error = %err,
                    "review_refused"
                );
            }
        }
        if let Some(span) = metrics {
            span.record_decision(result.as_ref().map(|_| ()).map_err(|err| err.clone()));
        }
        result
    }

    /// [`decide`](Self::decide) with the reviewer taken from `caller`.
    pub fn decide_as(
        &self,
        caller: &Caller,
        identity: &DocumentIdentity,
        version_number: u64,
        decision: Decision,
        note: Option<String>,
    ) -> Result<DocumentVersion, LedgerError> {
        self.decide(identity, version_number, decision, &caller.id, note)
    }

    /// Identity a file named `file_name` would be filed under in `project_id`.
    pub fn resolve(&self, project_id: &str, file_name: &str) -> DocumentIdentity {
        self.resolver.resolve(project_id, file_name)
    }

    pub fn latest(&self, identity: &DocumentIdentity) -> Option<DocumentVersion> {
        self.ledger.latest(identity)
    }

    pub fn history(&self, identity: &DocumentIdentity) -> Vec<DocumentVersion> {
        self.ledger.history(identity)
    }

    pub fn get(&self, identity: &DocumentIdentity, version_number: u64) -> Option<DocumentVersion> {
        self.ledger.get(identity, version_number)
    }

    pub fn identities(&self, project_id: &str) -> Vec<DocumentIdentity> {
        self.ledger.identities(project_id)
    }

    pub fn recent(&self, limit: usize) -> Vec<DocumentVersion> {
        self.ledger.recent(limit)
    }

    pub fn summary(&self, project_id: Option<&str>) -> LedgerSummary {
        self.ledger.summary(project_id)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    pub fn ledger(&self) -> &Arc<VersionLedger> {
        &self.ledger
    }

    pub fn validator(&self) -> &FileValidator {
        &self.validator
    }
}

/// Builder for [`IngestionService`].
pub struct IngestionServiceBuilder {
    ingest: IngestConfig,
    identity: IdentityConfig,
    ledger_config: LedgerConfig,
    ledger: Option<Arc<VersionLedger>>,
    clock: Arc<dyn Clock>,
}

impl Default for IngestionServiceBuilder {
    fn default() -> Self {
        Self {
            ingest: IngestConfig::default(),
            identity: IdentityConfig::default(),
            ledger_config: LedgerConfig::default(),
            ledger: None,
            clock: Arc::new(SystemClock),
        }
    }
}

impl IngestionServiceBuilder {
    /// Take every stage configuration from `config`.
    pub fn with_config(mut self, config: &DocflowConfig) -> Self {
        self.ingest = config.ingest.clone();
        self.identity = config.identity.clone();
        self.ledger_config = config.ledger.clone();
        self
    }

    pub fn ingest_config(mut self, config: IngestConfig) -> Self {
        self.ingest = config;
        self
    }

    pub fn identity_config(mut self, config: IdentityConfig) -> Self {
        self.identity = config;
        self
    }

    pub fn ledger_config(mut self, config: LedgerConfig) -> Self {
        self.ledger_config = config;
        self
    }

    /// Use an existing ledger instead of creating one. The ledger's own
    /// config wins over [`ledger_config`](Self::ledger_config).
    pub fn ledger(mut self, ledger: Arc<VersionLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<IngestionService, BuildError> {
        let validator = FileValidator::new(self.ingest)?;
        let resolver = IdentityResolver::new(self.identity)?;
        let ledger = self
            .ledger
            .unwrap_or_else(|| Arc::new(VersionLedger::new(self.ledger_config)));
        Ok(IngestionService {
            validator,
            resolver,
            ledger,
            clock: self.clock,
        })
    }
}
