//! HostEntry and HostSet entities
//!
//! A `HostEntry` is built once from configuration and never changes during a
//! run. The `HostSet` bundles every entry with the process-wide credentials
//! and is the unit handed to verification and orchestration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::Credentials;

/// Port used when the configuration leaves it unset (or zero)
pub const DEFAULT_SSH_PORT: u16 = 22;

/// One configured remote target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostEntry {
    pet_name: String,
    hostname: String,
    port: u16,
    user: String,
    local_dir: PathBuf,
    remote_dir: String,
}

impl HostEntry {
    /// Create a host entry; a port of zero falls back to [`DEFAULT_SSH_PORT`]
    pub fn new(
        pet_name: impl Into<String>,
        hostname: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        local_dir: impl Into<PathBuf>,
        remote_dir: impl Into<String>,
    ) -> Self {
        Self {
            pet_name: pet_name.into(),
            hostname: hostname.into(),
            port: if port == 0 { DEFAULT_SSH_PORT } else { port },
            user: user.into(),
            local_dir: local_dir.into(),
            remote_dir: remote_dir.into(),
        }
    }

    /// Human-readable identifier (the configuration key)
    pub fn pet_name(&self) -> &str {
        &self.pet_name
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Local source-of-truth directory
    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    /// Remote directory that mirrors `local_dir`
    pub fn remote_dir(&self) -> &str {
        &self.remote_dir
    }

    /// SSH destination (`user@hostname`)
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.hostname)
    }

    /// `hostname:port`, for diagnostics
    pub fn address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

/// All hosts of one run plus the credentials they share
#[derive(Debug, Clone)]
pub struct HostSet {
    hosts: BTreeMap<String, HostEntry>,
    credentials: Arc<Credentials>,
}

impl HostSet {
    /// Build a host set; entries are keyed (and ordered) by pet-name
    pub fn new(hosts: impl IntoIterator<Item = HostEntry>, credentials: Credentials) -> Self {
        Self::with_shared(hosts, Arc::new(credentials))
    }

    fn with_shared(
        hosts: impl IntoIterator<Item = HostEntry>,
        credentials: Arc<Credentials>,
    ) -> Self {
        let hosts = hosts
            .into_iter()
            .map(|host| (host.pet_name.clone(), host))
            .collect();
        Self { hosts, credentials }
    }

    /// Iterate hosts in pet-name order
    pub fn iter(&self) -> impl Iterator<Item = &HostEntry> {
        self.hosts.values()
    }

    pub fn get(&self, pet_name: &str) -> Option<&HostEntry> {
        self.hosts.get(pet_name)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn pet_names(&self) -> Vec<&str> {
        self.hosts.keys().map(String::as_str).collect()
    }

    /// Shared, read-only credentials
    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    /// Keep only the named hosts, sharing the same credentials
    pub fn retain(&self, pet_names: &[String]) -> Self {
        let hosts = self
            .hosts
            .values()
            .filter(|host| pet_names.iter().any(|name| name == host.pet_name()))
            .cloned();
        Self::with_shared(hosts, Arc::clone(&self.credentials))
    }
}
