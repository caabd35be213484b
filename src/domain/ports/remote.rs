//! Remote Transport Port
//!
//! Abstracts the secure channel used to verify a host: an authenticated
//! remote-shell connection with a file-transfer session layered on top.
//! The verifier only depends on these traits, so tests can swap in a fake
//! transport and the OpenSSH implementation stays in infrastructure.

use crate::domain::entities::{Credentials, HostEntry};
use crate::error::HostVerificationError;

/// Opens authenticated connections to hosts
pub trait RemoteConnector: Send + Sync {
    /// Connect and authenticate to `host` with the shared credentials
    fn connect(
        &self,
        host: &HostEntry,
        credentials: &Credentials,
    ) -> Result<Box<dyn RemoteSession>, HostVerificationError>;
}

/// An open, authenticated connection to one host
pub trait RemoteSession: Send {
    /// Layer a file-transfer session on top of this connection
    fn open_transfer(&mut self) -> Result<Box<dyn TransferSession + '_>, HostVerificationError>;

    /// Tear the connection down
    fn close(self: Box<Self>) -> Result<(), HostVerificationError>;
}

/// A file-transfer session on an open connection
pub trait TransferSession {
    /// Current remote working directory (the liveness round trip)
    fn working_dir(&mut self) -> Result<String, HostVerificationError>;
}
