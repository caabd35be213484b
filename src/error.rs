//! Error types for fsync
//!
//! Pre-flight errors (configuration, credentials, host verification) are
//! fatal and end the run. Runtime errors (`WatchError`, `SyncApplicationError`)
//! are recovered where they happen and only logged.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fsync operations
pub type FsyncResult<T> = Result<T, FsyncError>;

/// Top-level error for a supervisor run
#[derive(Error, Debug)]
pub enum FsyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    HostVerification(#[from] HostVerificationError),

    #[error(transparent)]
    Watch(#[from] WatchError),

    /// Every host failed verification under the skip policy
    #[error("no host passed verification ({failed} failed)")]
    NoHostsVerified { failed: usize },

    #[error("[{host}] cannot start sync worker: {source}")]
    WorkerSpawn {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("sync workers were already started")]
    AlreadyStarted,

    /// Cancellation arrived before any worker started
    #[error("cancelled before sync started")]
    Cancelled,
}

/// Malformed or inaccessible configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid host configuration in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("no hosts configured in {path}")]
    NoHosts { path: PathBuf },

    #[error("[{host}] invalid port {port} (expected 1-65535)")]
    InvalidPort { host: String, port: i64 },

    #[error("[{host}] missing required field '{field}'")]
    MissingField { host: String, field: &'static str },

    #[error("[{host}] cannot list local directory {path}: {source}")]
    LocalDir {
        host: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid known hosts entry at {path}:{line}: {message}")]
    KnownHosts {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("invalid value '{value}' for {key}")]
    InvalidSetting { key: String, value: String },
}

/// Private key unreadable or unusable
#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("cannot read private key {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse private key {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("private key {path} is passphrase protected (cipher '{cipher}')")]
    Encrypted { path: PathBuf, cipher: String },
}

/// Why a single host failed pre-flight verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostVerificationError {
    #[error("[{host}] connection failed: {message}")]
    Connection { host: String, message: String },

    #[error("[{host}] authentication rejected: {message}")]
    Authentication { host: String, message: String },

    #[error("[{host}] host key verification failed: {message}")]
    HostKey { host: String, message: String },

    #[error("[{host}] file transfer session failed: {message}")]
    Session { host: String, message: String },
}

impl HostVerificationError {
    /// Pet-name of the host this error belongs to
    pub fn host(&self) -> &str {
        match self {
            Self::Connection { host, .. }
            | Self::Authentication { host, .. }
            | Self::HostKey { host, .. }
            | Self::Session { host, .. } => host,
        }
    }
}

/// Failure inside a running file watcher
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("cannot watch {path}: {message}")]
    Start { path: PathBuf, message: String },

    #[error("watch error: {message}")]
    Runtime {
        paths: Vec<PathBuf>,
        message: String,
    },
}

impl From<notify::Error> for WatchError {
    fn from(err: notify::Error) -> Self {
        Self::Runtime {
            paths: err.paths.clone(),
            message: err.to_string(),
        }
    }
}

/// Failure to apply one change on the remote side
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot apply {action}: {message}")]
pub struct SyncApplicationError {
    pub action: String,
    pub message: String,
}
