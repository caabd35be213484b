//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod change_sink;
pub mod remote;

pub use change_sink::ChangeSink;
pub use remote::{RemoteConnector, RemoteSession, TransferSession};
