//! Application Layer
//!
//! Use cases that drive a run.
//! This layer:
//! - Depends on Domain layer (entities, value objects, ports)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `ConnectivityVerifier` - Sequential pre-flight check of every host
//! - `SyncOrchestrator` - One worker thread per host, joined on completion
//! - `Supervisor` - Verify, then orchestrate, under a failure policy

mod cancel;
mod orchestrator;
mod supervisor;
mod verify;
mod worker;


pub use cancel::CancellationToken;
pub use orchestrator::{OrchestratorState, SyncOrchestrator};
pub use supervisor::Supervisor;
pub use verify::{ConnectivityVerifier, VerificationReport, VerifiedHost};
pub use worker::{
    SinkFactory, SyncWorker, SyncWorkerFactory, Worker, WorkerFactory, WorkerOutcome,
    WorkerStats, WorkerStatus,
};
