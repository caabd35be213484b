//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::FailurePolicy;

/// Default polling cadence of the file watchers
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Default SSH connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One raw entry of the hosts file, before defaulting and validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    #[serde(default)]
    pub hostname: String,

    /// Missing or `0` means the default SSH port
    #[serde(default)]
    pub port: Option<i64>,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub local_dir: PathBuf,

    #[serde(default)]
    pub remote_dir: String,
}

/// Pet-name to host record, as found in the hosts file
pub type HostRecords = BTreeMap<String, HostRecord>;

/// Everything a run needs besides the hosts themselves
///
/// Resolution order: CLI flags, then `FSYNC_*` environment variables, then
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// JSON hosts file
    pub hosts_file: PathBuf,
    /// SSH private key
    pub private_key: PathBuf,
    /// OpenSSH known-hosts file
    pub known_hosts: PathBuf,
    /// Watcher polling cadence
    pub poll_interval: Duration,
    /// SSH connect timeout
    pub connect_timeout: Duration,
    /// Reaction to hosts failing verification
    pub on_failure: FailurePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        let ssh_dir = dirs::home_dir()
            .map(|home| home.join(".ssh"))
            .unwrap_or_else(|| PathBuf::from(".ssh"));
        let hosts_file = dirs::config_dir()
            .map(|dir| dir.join("fsync").join("hosts.json"))
            .unwrap_or_else(|| PathBuf::from("hosts.json"));

        Self {
            hosts_file,
            private_key: ssh_dir.join("id_ed25519"),
            known_hosts: ssh_dir.join("known_hosts"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            on_failure: FailurePolicy::default(),
        }
    }
}

impl Settings {
    /// Apply `FSYNC_*` environment variables
    pub fn with_env_overrides(self) -> Result<Self, crate::error::ConfigError> {
        super::loader::apply_overrides(self, |key| std::env::var(key).ok())
    }
}
