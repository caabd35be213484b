//! OpenSSH-backed `RemoteConnector`

use std::ffi::OsString;
use std::fs::{self, File};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tracing::{debug, warn};

use super::command::{control_args, master_args, run_with_deadline, sftp_args};
use super::stderr::{classify, Stage};
use crate::config::DEFAULT_CONNECT_TIMEOUT;
use crate::domain::entities::{Credentials, HostEntry};
use crate::domain::ports::{RemoteConnector, RemoteSession, TransferSession};
use crate::domain::value_objects::HostKeyStatus;
use crate::error::HostVerificationError;

const PWD_REPLY: &str = "Remote working directory:";

/// Opens sessions by starting an `ssh` control master per host
#[derive(Debug, Clone)]
pub struct OpenSshConnector {
    ssh: PathBuf,
    sftp: PathBuf,
    connect_timeout: Duration,
}

impl Default for OpenSshConnector {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl OpenSshConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self {
            ssh: PathBuf::from("ssh"),
            sftp: PathBuf::from("sftp"),
            connect_timeout,
        }
    }

    /// Use specific client binaries instead of the ones on `PATH`
    pub fn with_programs(mut self, ssh: impl Into<PathBuf>, sftp: impl Into<PathBuf>) -> Self {
        self.ssh = ssh.into();
        self.sftp = sftp.into();
        self
    }

    /// Budget for a whole client invocation: TCP connect plus key exchange
    /// and authentication
    fn deadline(&self) -> Duration {
        self.connect_timeout.saturating_mul(2).max(Duration::from_secs(5))
    }
}

impl RemoteConnector for OpenSshConnector {
    fn connect(
        &self,
        host: &HostEntry,
        credentials: &Credentials,
    ) -> Result<Box<dyn RemoteSession>, HostVerificationError> {
        check_known_host(host, credentials)?;

        let session_error = |message: String| HostVerificationError::Session {
            host: host.pet_name().to_string(),
            message,
        };

        let control_dir = tempfile::Builder::new()
            .prefix("fsync-")
            .tempdir()
            .map_err(|e| session_error(format!("cannot create control directory: {e}")))?;
        let socket = control_dir.path().join("ctl");
        let log_path = control_dir.path().join("master.log");
        // The backgrounded master keeps its stderr open; a pipe would never
        // reach EOF.
        let log = File::create(&log_path)
            .map_err(|e| session_error(format!("cannot create {}: {e}", log_path.display())))?;

        let mut command = Command::new(&self.ssh);
        command
            .args(master_args(host, credentials, &socket, self.connect_timeout))
            .stdout(Stdio::null())
            .stderr(Stdio::from(log));

        debug!(
            host = %host.pet_name(),
            destination = %host.destination(),
            port = host.port(),
            "starting ssh control master"
        );
        let output = run_with_deadline(command, None, self.deadline()).map_err(|e| {
            HostVerificationError::Connection {
                host: host.pet_name().to_string(),
                message: format!("cannot run {}: {e}", self.ssh.display()),
            }
        })?;

        let status = match output {
            Some(output) => output.status,
            None => {
                return Err(HostVerificationError::Connection {
                    host: host.pet_name().to_string(),
                    message: format!("no answer within {}s", self.deadline().as_secs()),
                })
            }
        };
        if !status.success() {
            let stderr = fs::read_to_string(&log_path).unwrap_or_default();
            return Err(classify(
                host.pet_name(),
                Stage::Connect,
                &stderr,
                &status.to_string(),
            ));
        }

        Ok(Box::new(OpenSshSession {
            host: host.clone(),
            sftp_base: sftp_args(host, credentials, &socket, self.connect_timeout),
            ssh: self.ssh.clone(),
            sftp: self.sftp.clone(),
            deadline: self.deadline(),
            socket,
            control_dir,
            closed: false,
        }))
    }
}

/// Reject hosts the known-hosts database can answer for before dialing
fn check_known_host(host: &HostEntry, credentials: &Credentials) -> Result<(), HostVerificationError> {
    let known_hosts = credentials.known_hosts();
    let message = match known_hosts.lookup(host.hostname(), host.port()) {
        HostKeyStatus::Known(_) | HostKeyStatus::Deferred => return Ok(()),
        HostKeyStatus::Unknown => format!(
            "no key for {} in {}",
            host.address(),
            known_hosts.path().display()
        ),
        HostKeyStatus::Revoked => format!(
            "every key for {} in {} is revoked",
            host.address(),
            known_hosts.path().display()
        ),
    };
    Err(HostVerificationError::HostKey {
        host: host.pet_name().to_string(),
        message,
    })
}

/// An authenticated control-master connection
///
/// The master is told to exit on `close`; dropping an open session does the
/// same on a best-effort basis.
pub struct OpenSshSession {
    host: HostEntry,
    ssh: PathBuf,
    sftp: PathBuf,
    sftp_base: Vec<OsString>,
    socket: PathBuf,
    deadline: Duration,
    // Removed (with the socket) when the session goes away.
    control_dir: TempDir,
    closed: bool,
}

impl OpenSshSession {
    fn control(&self, verb: &str) -> Result<(), HostVerificationError> {
        let mut command = Command::new(&self.ssh);
        command
            .args(control_args(&self.host, &self.socket, verb))
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        let output = self.run(command, None)?;
        if output.status.success() {
            return Ok(());
        }
        Err(classify(
            self.host.pet_name(),
            Stage::Session,
            &String::from_utf8_lossy(&output.stderr),
            &format!("control command '{verb}' failed ({})", output.status),
        ))
    }

    fn run(&self, command: Command, input: Option<&[u8]>) -> Result<Output, HostVerificationError> {
        let session_error = |message: String| HostVerificationError::Session {
            host: self.host.pet_name().to_string(),
            message,
        };
        run_with_deadline(command, input, self.deadline)
            .map_err(|e| session_error(e.to_string()))?
            .ok_or_else(|| session_error(format!("no answer within {}s", self.deadline.as_secs())))
    }
}

impl RemoteSession for OpenSshSession {
    fn open_transfer(&mut self) -> Result<Box<dyn TransferSession + '_>, HostVerificationError> {
        self.control("check")?;
        Ok(Box::new(SftpSession { session: self }))
    }

    fn close(mut self: Box<Self>) -> Result<(), HostVerificationError> {
        self.closed = true;
        let result = self.control("exit");
        debug!(
            host = %self.host.pet_name(),
            control_dir = %self.control_dir.path().display(),
            "ssh control master closed"
        );
        result
    }
}

impl Drop for OpenSshSession {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.control("exit") {
                warn!(host = %self.host.pet_name(), "cannot stop ssh control master: {e}");
            }
        }
    }
}

/// `sftp` batch session over an open master
pub struct SftpSession<'a> {
    session: &'a OpenSshSession,
}

impl SftpSession<'_> {
    /// Run an sftp batch script and return its stdout
    fn batch(&self, script: &str) -> Result<String, HostVerificationError> {
        let mut command = Command::new(&self.session.sftp);
        command
            .args(&self.session.sftp_base)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let output = self.session.run(command, Some(script.as_bytes()))?;
        if !output.status.success() {
            return Err(classify(
                self.session.host.pet_name(),
                Stage::Session,
                &String::from_utf8_lossy(&output.stderr),
                &output.status.to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TransferSession for SftpSession<'_> {
    fn working_dir(&mut self) -> Result<String, HostVerificationError> {
        let stdout = self.batch("pwd\n")?;
        parse_pwd(&stdout).ok_or_else(|| HostVerificationError::Session {
            host: self.session.host.pet_name().to_string(),
            message: format!("unexpected reply to pwd: {:?}", stdout.trim()),
        })
    }
}

/// Extract the directory from sftp's `pwd` reply
fn parse_pwd(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        line.trim()
            .strip_prefix(PWD_REPLY)
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(str::to_string)
    })
}
