//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `ssh/` - OpenSSH client transport (`RemoteConnector`)
//! - `watch/` - Polling file watcher
//! - `sinks` - Default `ChangeSink`

pub mod sinks;
pub mod ssh;
pub mod watch;

pub use sinks::LogSink;
pub use ssh::{OpenSshConnector, OpenSshSession, SftpSession};
pub use watch::{ChangeStream, FileWatcher, WatchItem};
