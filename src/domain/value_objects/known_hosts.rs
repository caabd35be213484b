//! Known-hosts database (OpenSSH format)
//!
//! Each line is `[@marker] patterns keytype base64-key [comment]`.
//! Patterns are comma separated, may use `*` and `?`, may be negated with
//! `!`, and carry a port as `[host]:port`. Hashed entries (`|1|salt|hash`)
//! are kept but cannot be matched here: when one is present the decision is
//! left to the SSH client, which reads the same file.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::identity::fingerprint;
use super::wire::WireReader;
use crate::domain::entities::DEFAULT_SSH_PORT;
use crate::error::ConfigError;

/// Optional line marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    CertAuthority,
    Revoked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostPatterns {
    Plain(Vec<String>),
    Hashed,
}

/// One parsed known-hosts line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownHostEntry {
    line: usize,
    marker: Option<Marker>,
    patterns: HostPatterns,
    key_type: String,
    fingerprint: String,
}

impl KnownHostEntry {
    /// 1-based line number in the source file
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn key_type(&self) -> &str {
        &self.key_type
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn is_hashed(&self) -> bool {
        self.patterns == HostPatterns::Hashed
    }

    /// Whether the plain patterns of this line select `name`
    fn matches(&self, name: &str) -> bool {
        let HostPatterns::Plain(patterns) = &self.patterns else {
            return false;
        };
        let mut selected = false;
        for pattern in patterns {
            if let Some(negated) = pattern.strip_prefix('!') {
                if glob_match(negated, name) {
                    return false;
                }
            } else if glob_match(pattern, name) {
                selected = true;
            }
        }
        selected
    }
}

/// Result of looking a host up before connecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKeyStatus {
    /// At least one usable key is listed; carries the key types
    Known(Vec<String>),
    /// Every matching line is `@revoked`
    Revoked,
    /// Nothing matches and no hashed or CA lines could
    Unknown,
    /// Hashed or certificate-authority lines may apply; the SSH client decides
    Deferred,
}

/// Host-key verification policy built from a known-hosts file
#[derive(Debug, Clone, Default)]
pub struct KnownHosts {
    path: PathBuf,
    entries: Vec<KnownHostEntry>,
}

impl KnownHosts {
    /// Parse the contents of the known-hosts file at `path`
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let mut entries = Vec::new();
        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let entry = parse_line(index + 1, line).map_err(|message| ConfigError::KnownHosts {
                path: path.to_path_buf(),
                line: index + 1,
                message,
            })?;
            entries.push(entry);
        }
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// File the SSH client is pointed at
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[KnownHostEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `hostname` on `port` the way the SSH client names it
    pub fn lookup(&self, hostname: &str, port: u16) -> HostKeyStatus {
        let name = lookup_name(hostname, port);

        let mut keys = Vec::new();
        let mut revoked = false;
        let mut certificate = false;
        for entry in self.entries.iter().filter(|e| e.matches(&name)) {
            match entry.marker {
                None => keys.push(entry.key_type.clone()),
                Some(Marker::Revoked) => revoked = true,
                Some(Marker::CertAuthority) => certificate = true,
            }
        }

        if !keys.is_empty() {
            return HostKeyStatus::Known(keys);
        }
        if certificate || self.entries.iter().any(KnownHostEntry::is_hashed) {
            return HostKeyStatus::Deferred;
        }
        if revoked {
            return HostKeyStatus::Revoked;
        }
        HostKeyStatus::Unknown
    }
}

/// `host` on the default port, `[host]:port` otherwise
fn lookup_name(hostname: &str, port: u16) -> String {
    let host = hostname.to_lowercase();
    if port == DEFAULT_SSH_PORT {
        host
    } else {
        format!("[{host}]:{port}")
    }
}

fn parse_line(line_no: usize, line: &str) -> Result<KnownHostEntry, String> {
    let mut fields = line.split_whitespace();
    let mut first = fields.next().ok_or("empty line")?;

    let marker = match first {
        "@cert-authority" => Some(Marker::CertAuthority),
        "@revoked" => Some(Marker::Revoked),
        other if other.starts_with('@') => return Err(format!("unknown marker '{other}'")),
        _ => None,
    };
    if marker.is_some() {
        first = fields.next().ok_or("missing host patterns")?;
    }

    let patterns = if first.starts_with("|1|") {
        HostPatterns::Hashed
    } else {
        HostPatterns::Plain(first.split(',').map(str::to_lowercase).collect())
    };

    let key_type = fields.next().ok_or("missing key type")?;
    let key = fields.next().ok_or("missing key")?;
    let blob = STANDARD
        .decode(key)
        .map_err(|e| format!("invalid base64 key: {e}"))?;
    let embedded = WireReader::new(&blob)
        .read_utf8()
        .map_err(|e| format!("malformed key: {e}"))?;
    if embedded != key_type {
        return Err(format!(
            "key type '{key_type}' does not match encoded key '{embedded}'"
        ));
    }

    Ok(KnownHostEntry {
        line: line_no,
        marker,
        patterns,
        key_type: key_type.to_string(),
        fingerprint: fingerprint(&blob),
    })
}

/// Shell-style match supporting `*` and `?`
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((star_pi, star_ti)) = star {
            pi = star_pi + 1;
            ti = star_ti + 1;
            star = Some((star_pi, star_ti + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == '*')
}
