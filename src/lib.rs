//! fsync - multi-host synchronization supervisor
//!
//! Verifies that every configured host answers over SSH and SFTP, then runs
//! one watcher-driven sync worker per host, turning local file-system
//! changes into the remote actions they imply.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use application::{
    CancellationToken, ConnectivityVerifier, OrchestratorState, Supervisor, SyncOrchestrator,
    SyncWorkerFactory, WorkerOutcome, WorkerStatus,
};
pub use config::{load_host_set, Settings};
pub use domain::entities::{Credentials, HostEntry, HostSet};
pub use domain::value_objects::{ChangeEvent, ChangeKind, FailurePolicy, RemoteAction};
pub use error::{FsyncError, FsyncResult};
pub use infrastructure::{FileWatcher, LogSink, OpenSshConnector};
