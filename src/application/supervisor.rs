//! Supervisor: verify every host, then run one worker per verified host

use std::sync::Arc;

use tracing::info;

use super::cancel::CancellationToken;
use super::orchestrator::SyncOrchestrator;
use super::verify::ConnectivityVerifier;
use super::worker::{WorkerFactory, WorkerOutcome};
use crate::domain::entities::HostSet;
use crate::domain::ports::RemoteConnector;
use crate::domain::value_objects::FailurePolicy;
use crate::error::{FsyncError, FsyncResult};

/// Entry point of a run
pub struct Supervisor {
    verifier: ConnectivityVerifier,
    factory: Arc<dyn WorkerFactory>,
    policy: FailurePolicy,
    cancel: CancellationToken,
}

impl Supervisor {
    pub fn new(
        connector: Arc<dyn RemoteConnector>,
        factory: Arc<dyn WorkerFactory>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            verifier: ConnectivityVerifier::new(connector),
            factory,
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Share `token` with the workers instead of a private one
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Pre-flight check; returns the hosts that may be synced
    pub fn verify(&self, hosts: &HostSet) -> FsyncResult<HostSet> {
        info!(hosts = hosts.len(), policy = %self.policy, "verifying hosts");
        let report = self.verifier.verify_all(hosts, self.policy, &self.cancel)?;
        if !report.all_verified() {
            info!(
                verified = report.verified.len(),
                skipped = report.failed.len(),
                "continuing with reachable hosts"
            );
        }
        Ok(hosts.retain(&report.verified_names()))
    }

    /// Verify, then start a worker per verified host
    ///
    /// No worker is started unless verification succeeded and nothing
    /// cancelled the run in the meantime.
    pub fn start(&self, hosts: &HostSet) -> FsyncResult<SyncOrchestrator> {
        let verified = self.verify(hosts)?;
        if self.cancel.is_cancelled() {
            return Err(FsyncError::Cancelled);
        }
        let mut orchestrator = SyncOrchestrator::new(Arc::clone(&self.factory), self.cancel.clone());
        orchestrator.start(&verified)?;
        Ok(orchestrator)
    }

    /// Start, then block until every worker has ended
    pub fn run(&self, hosts: &HostSet) -> FsyncResult<Vec<WorkerOutcome>> {
        let mut orchestrator = self.start(hosts)?;
        Ok(orchestrator.wait())
    }
}
