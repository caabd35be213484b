//! Sync orchestration
//!
//! Starts one worker thread per verified host and joins them again.
//! Workers report through a completion channel; a worker that dies
//! without reporting is recorded as failed.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{error, info};

use super::cancel::CancellationToken;
use super::worker::{WorkerFactory, WorkerOutcome};
use crate::domain::entities::HostSet;
use crate::error::{FsyncError, FsyncResult};

/// Lifecycle of an orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Starting,
    /// Every worker has been started
    Running,
    /// Every worker has reported its outcome
    Stopped,
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Runs one worker per host concurrently
pub struct SyncOrchestrator {
    factory: Arc<dyn WorkerFactory>,
    cancel: CancellationToken,
    state: OrchestratorState,
    started: Vec<String>,
    handles: Vec<(String, JoinHandle<()>)>,
    outcomes: Option<Receiver<WorkerOutcome>>,
}

impl SyncOrchestrator {
    pub fn new(factory: Arc<dyn WorkerFactory>, cancel: CancellationToken) -> Self {
        Self {
            factory,
            cancel,
            state: OrchestratorState::Idle,
            started: Vec::new(),
            handles: Vec::new(),
            outcomes: None,
        }
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// Pet-names of the workers started so far
    pub fn started(&self) -> &[String] {
        &self.started
    }

    /// Ask every worker to stop
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Start one worker thread per host
    ///
    /// If a thread cannot be spawned, the workers already running are
    /// cancelled and joined before the error is returned.
    pub fn start(&mut self, hosts: &HostSet) -> FsyncResult<()> {
        if self.state != OrchestratorState::Idle {
            return Err(FsyncError::AlreadyStarted);
        }
        self.state = OrchestratorState::Starting;

        let (tx, rx) = mpsc::channel();
        self.outcomes = Some(rx);

        for host in hosts.iter() {
            let worker = self.factory.create(host, hosts.credentials());
            let pet_name = worker.pet_name().to_string();
            let cancel = self.cancel.clone();
            let done = tx.clone();

            let spawned = thread::Builder::new()
                .name(format!("sync-{pet_name}"))
                .spawn(move || {
                    let outcome = worker.run(cancel);
                    let _ = done.send(outcome);
                });

            match spawned {
                Ok(handle) => {
                    self.started.push(pet_name.clone());
                    self.handles.push((pet_name, handle));
                }
                Err(source) => {
                    error!(host = %pet_name, "cannot start sync worker: {source}");
                    drop(tx);
                    self.cancel.cancel();
                    self.wait();
                    return Err(FsyncError::WorkerSpawn {
                        host: pet_name,
                        source,
                    });
                }
            }
        }

        self.state = OrchestratorState::Running;
        info!(workers = self.started.len(), "all sync workers started");
        Ok(())
    }

    /// Block until every started worker has ended; returns their outcomes
    /// in completion order
    pub fn wait(&mut self) -> Vec<WorkerOutcome> {
        let mut outcomes = Vec::new();
        if let Some(rx) = self.outcomes.take() {
            // Ends once every worker thread dropped its sender.
            outcomes.extend(rx.iter());
        }

        let reported: BTreeSet<String> = outcomes.iter().map(|o| o.pet_name.clone()).collect();
        for (pet_name, handle) in self.handles.drain(..) {
            let joined = handle.join();
            if reported.contains(&pet_name) {
                continue;
            }
            let message = match joined {
                Err(payload) => panic_message(payload.as_ref()),
                Ok(()) => "worker exited without reporting".to_string(),
            };
            error!(host = %pet_name, "sync worker died: {message}");
            outcomes.push(WorkerOutcome::failed(pet_name, message));
        }

        self.state = OrchestratorState::Stopped;
        info!(workers = outcomes.len(), "all sync workers stopped");
        outcomes
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
