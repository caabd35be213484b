//! Connectivity verification
//!
//! Every host is checked before any worker starts: connect and
//! authenticate, open a file-transfer session, ask for the remote working
//! directory, close. Hosts are checked one after the other.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::cancel::CancellationToken;

use crate::domain::entities::{Credentials, HostEntry, HostSet};
use crate::domain::ports::RemoteConnector;
use crate::domain::value_objects::FailurePolicy;
use crate::error::{FsyncError, FsyncResult, HostVerificationError};

/// A host that answered the round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedHost {
    pub pet_name: String,
    /// Remote working directory reported by the transfer session
    pub working_dir: String,
}

/// Result of checking a whole host set
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub verified: Vec<VerifiedHost>,
    /// Only populated under `FailurePolicy::Skip`
    pub failed: Vec<HostVerificationError>,
}

impl VerificationReport {
    pub fn verified_names(&self) -> Vec<String> {
        self.verified.iter().map(|h| h.pet_name.clone()).collect()
    }

    pub fn all_verified(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sequential pre-flight checker
#[derive(Clone)]
pub struct ConnectivityVerifier {
    connector: Arc<dyn RemoteConnector>,
}

impl ConnectivityVerifier {
    pub fn new(connector: Arc<dyn RemoteConnector>) -> Self {
        Self { connector }
    }

    /// Check one host; the session is closed again before returning
    pub fn verify_host(
        &self,
        host: &HostEntry,
        credentials: &Credentials,
    ) -> Result<String, HostVerificationError> {
        let mut session = self.connector.connect(host, credentials)?;

        let round_trip = session
            .open_transfer()
            .and_then(|mut transfer| transfer.working_dir());

        match round_trip {
            Ok(working_dir) => {
                session.close()?;
                Ok(working_dir)
            }
            Err(e) => {
                if let Err(close_err) = session.close() {
                    warn!(host = %host.pet_name(), "closing failed session: {close_err}");
                }
                Err(e)
            }
        }
    }

    /// Check every host in pet-name order
    ///
    /// Under `Abort` the first failure ends verification and is returned.
    /// Under `Skip` failures are collected; only a set where nothing
    /// verified is an error. `cancel` is checked before each host and ends
    /// verification with `FsyncError::Cancelled`.
    pub fn verify_all(
        &self,
        hosts: &HostSet,
        policy: FailurePolicy,
        cancel: &CancellationToken,
    ) -> FsyncResult<VerificationReport> {
        let mut report = VerificationReport::default();

        for host in hosts.iter() {
            if cancel.is_cancelled() {
                info!(
                    checked = report.verified.len() + report.failed.len(),
                    remaining = hosts.len() - report.verified.len() - report.failed.len(),
                    "verification cancelled"
                );
                return Err(FsyncError::Cancelled);
            }
            match self.verify_host(host, hosts.credentials()) {
                Ok(working_dir) => {
                    info!(
                        host = %host.pet_name(),
                        destination = %host.destination(),
                        port = host.port(),
                        remote_cwd = %working_dir,
                        "host verified"
                    );
                    report.verified.push(VerifiedHost {
                        pet_name: host.pet_name().to_string(),
                        working_dir,
                    });
                }
                Err(e) => match policy {
                    FailurePolicy::Abort => {
                        error!(host = %host.pet_name(), "{e}");
                        return Err(e.into());
                    }
                    FailurePolicy::Skip => {
                        warn!(host = %host.pet_name(), "skipping host: {e}");
                        report.failed.push(e);
                    }
                },
            }
        }

        if report.verified.is_empty() && !report.failed.is_empty() {
            return Err(FsyncError::NoHostsVerified {
                failed: report.failed.len(),
            });
        }
        Ok(report)
    }
}
