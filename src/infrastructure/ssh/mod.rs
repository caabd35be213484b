//! SSH transport
//!
//! Drives the system OpenSSH client. One control-master connection per
//! session authenticates with the configured key; `sftp` and control
//! commands multiplex over its socket.

mod command;
mod connector;
mod stderr;

pub use connector::{OpenSshConnector, OpenSshSession, SftpSession};
pub use stderr::Stage;
