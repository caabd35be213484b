//! Configuration module for fsync
//!
//! Settings resolve in this order:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (FSYNC_*)
//! 3. Built-in defaults (`~/.ssh/id_ed25519`, `~/.ssh/known_hosts`,
//!    `<config dir>/fsync/hosts.json`)
//!
//! The hosts file is a JSON object mapping pet-names to
//! `{hostname, port, user, local_dir, remote_dir}`.

mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use loader::{
    apply_overrides, build_host_entries, build_host_entry, expand_home, load_credentials,
    load_host_entries, load_host_records, load_host_set, parse_host_records, resolve_port,
    ConfigWarning,
};
pub use types::{HostRecord, HostRecords, Settings, DEFAULT_CONNECT_TIMEOUT, DEFAULT_POLL_INTERVAL};
