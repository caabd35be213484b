//! Configuration loading
//!
//! Turns the JSON hosts file into validated `HostEntry` values and reads the
//! key material into shared `Credentials`. Nothing here touches the network.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::entities::{Credentials, HostEntry, HostSet, DEFAULT_SSH_PORT};
use crate::domain::value_objects::{KnownHosts, SigningIdentity};
use crate::error::{AuthenticationError, ConfigError, FsyncResult};

use super::types::{HostRecord, HostRecords, Settings};

/// Non-fatal configuration warning (unknown keys)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Pet-name the key was found under, if any
    pub host: Option<String>,
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Parse hosts JSON and collect warnings for keys fsync does not know
pub fn parse_host_records(
    content: &str,
    path: &Path,
) -> Result<(HostRecords, Vec<ConfigWarning>), ConfigError> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let mut deserializer = serde_json::Deserializer::from_str(content);

    let records: HostRecords = serde_ignored::deserialize(&mut deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    deserializer.end().map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let (host, key) = match path_str.rsplit_once('.') {
                Some((host, key)) => (Some(host.to_string()), key.to_string()),
                None => (None, path_str.clone()),
            };
            ConfigWarning {
                line: find_line_number(content, &format!("\"{key}\"")),
                suggestion: suggest_key(&key),
                host,
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((records, warnings))
}

/// Read and parse the hosts file
pub fn load_host_records(path: &Path) -> Result<(HostRecords, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_host_records(&content, path)
}

/// Resolve a configured port: absent or `0` means 22, anything else must fit a TCP port
pub fn resolve_port(host: &str, port: Option<i64>) -> Result<u16, ConfigError> {
    match port {
        None | Some(0) => Ok(DEFAULT_SSH_PORT),
        Some(p) => u16::try_from(p).map_err(|_| ConfigError::InvalidPort {
            host: host.to_string(),
            port: p,
        }),
    }
}

/// Validate one record and apply defaults
pub fn build_host_entry(pet_name: &str, record: HostRecord) -> Result<HostEntry, ConfigError> {
    let port = resolve_port(pet_name, record.port)?;

    let required = [
        ("hostname", record.hostname.trim().is_empty()),
        ("user", record.user.trim().is_empty()),
        ("local_dir", record.local_dir.as_os_str().is_empty()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, missing)| *missing) {
        return Err(ConfigError::MissingField {
            host: pet_name.to_string(),
            field: *field,
        });
    }

    let local_dir_error = |path: &Path, source| ConfigError::LocalDir {
        host: pet_name.to_string(),
        path: path.to_path_buf(),
        source,
    };
    let expanded = expand_home(&record.local_dir);
    fs::read_dir(&expanded).map_err(|e| local_dir_error(&expanded, e))?;
    // Workers must not depend on the process working directory.
    let local_dir = std::path::absolute(&expanded).map_err(|e| local_dir_error(&expanded, e))?;

    Ok(HostEntry::new(
        pet_name,
        record.hostname.trim(),
        port,
        record.user.trim(),
        local_dir,
        record.remote_dir,
    ))
}

/// Validate every record of the hosts file
pub fn build_host_entries(records: HostRecords, path: &Path) -> Result<Vec<HostEntry>, ConfigError> {
    if records.is_empty() {
        return Err(ConfigError::NoHosts {
            path: path.to_path_buf(),
        });
    }
    records
        .into_iter()
        .map(|(pet_name, record)| build_host_entry(&pet_name, record))
        .collect()
}

/// Load and validate the hosts file, logging unknown keys
pub fn load_host_entries(path: &Path) -> Result<Vec<HostEntry>, ConfigError> {
    let (records, warnings) = load_host_records(path)?;
    for warning in &warnings {
        warn!(
            file = %warning.file.display(),
            host = warning.host.as_deref().unwrap_or("-"),
            line = ?warning.line,
            suggestion = ?warning.suggestion,
            "unknown configuration key '{}'",
            warning.key
        );
    }
    build_host_entries(records, path)
}

/// Read the private key and known-hosts database
pub fn load_credentials(private_key: &Path, known_hosts: &Path) -> FsyncResult<Credentials> {
    let key_bytes = fs::read(private_key).map_err(|source| AuthenticationError::Read {
        path: private_key.to_path_buf(),
        source,
    })?;
    let identity = SigningIdentity::parse(private_key, &key_bytes)?;
    debug!(
        key = %private_key.display(),
        algorithm = identity.algorithm(),
        fingerprint = identity.fingerprint().unwrap_or("-"),
        "loaded signing identity"
    );

    let content = fs::read_to_string(known_hosts).map_err(|source| ConfigError::Read {
        path: known_hosts.to_path_buf(),
        source,
    })?;
    let known_hosts = KnownHosts::parse(known_hosts, &content)?;
    debug!(
        file = %known_hosts.path().display(),
        entries = known_hosts.len(),
        "loaded known hosts"
    );

    Ok(Credentials::new(identity, known_hosts))
}

/// Credentials first, then hosts: an unusable key fails before any directory is listed
pub fn load_host_set(settings: &Settings) -> FsyncResult<HostSet> {
    let credentials = load_credentials(&settings.private_key, &settings.known_hosts)?;
    let hosts = load_host_entries(&settings.hosts_file)?;
    info!(
        hosts = hosts.len(),
        file = %settings.hosts_file.display(),
        "host config built"
    );
    Ok(HostSet::new(hosts, credentials))
}

/// Apply `FSYNC_*` overrides read through `lookup`
pub fn apply_overrides(
    mut settings: Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let invalid = |key: &str, value: &str| ConfigError::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
    };

    if let Some(path) = lookup("FSYNC_CONFIG") {
        settings.hosts_file = PathBuf::from(path);
    }
    if let Some(path) = lookup("FSYNC_KEY") {
        settings.private_key = PathBuf::from(path);
    }
    if let Some(path) = lookup("FSYNC_KNOWN_HOSTS") {
        settings.known_hosts = PathBuf::from(path);
    }

    if let Some(value) = lookup("FSYNC_POLL_INTERVAL_MS") {
        let ms: u64 = value
            .trim()
            .parse()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or_else(|| invalid("FSYNC_POLL_INTERVAL_MS", &value))?;
        settings.poll_interval = Duration::from_millis(ms);
    }

    if let Some(value) = lookup("FSYNC_CONNECT_TIMEOUT") {
        let secs: u64 = value
            .trim()
            .parse()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| invalid("FSYNC_CONNECT_TIMEOUT", &value))?;
        settings.connect_timeout = Duration::from_secs(secs);
    }

    if let Some(value) = lookup("FSYNC_ON_FAILURE") {
        settings.on_failure = value
            .parse()
            .map_err(|_| invalid("FSYNC_ON_FAILURE", &value))?;
    }

    Ok(settings)
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

pub(super) fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &["hostname", "port", "user", "local_dir", "remote_dir"];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
