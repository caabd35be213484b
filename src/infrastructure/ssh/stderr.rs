//! Classification of OpenSSH client failures
//!
//! `ssh` and `sftp` report everything through stderr and exit status 255,
//! so the message text is all there is to tell a rejected key from a
//! refused connection.

use crate::error::HostVerificationError;

const HOST_KEY_MARKERS: &[&str] = &[
    "Host key verification failed",
    "REMOTE HOST IDENTIFICATION HAS CHANGED",
    "No matching host key type found",
];

const AUTH_MARKERS: &[&str] = &[
    "Permission denied",
    "Too many authentication failures",
    "no such identity",
    "Load key",
];

const CONNECTION_MARKERS: &[&str] = &[
    "Connection refused",
    "Connection timed out",
    "Operation timed out",
    "Could not resolve hostname",
    "No route to host",
    "Network is unreachable",
    "Connection reset",
    "Connection closed by",
    "kex_exchange_identification",
];

/// Which step of the handshake produced the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Control-master connect and authentication
    Connect,
    /// SFTP subsystem or control commands on an established master
    Session,
}

/// Map client stderr to a verification error for `host`
///
/// `fallback` describes the failure when stderr is empty (usually the exit
/// status).
pub(crate) fn classify(
    host: &str,
    stage: Stage,
    stderr: &str,
    fallback: &str,
) -> HostVerificationError {
    let host = host.to_string();
    let message = summary(stderr).unwrap_or(fallback).to_string();

    if contains_any(stderr, HOST_KEY_MARKERS) {
        return HostVerificationError::HostKey { host, message };
    }
    if contains_any(stderr, AUTH_MARKERS) {
        return HostVerificationError::Authentication { host, message };
    }
    if contains_any(stderr, CONNECTION_MARKERS) {
        return HostVerificationError::Connection { host, message };
    }
    match stage {
        Stage::Connect => HostVerificationError::Connection { host, message },
        Stage::Session => HostVerificationError::Session { host, message },
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Most specific line of client output
///
/// Banner lines (`@@@@`, warnings about permanently added keys) carry
/// nothing useful; the last remaining line is the one the client printed
/// right before giving up.
fn summary(stderr: &str) -> Option<&str> {
    stderr
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty() && !line.starts_with('@') && !line.starts_with("Warning: Permanently added")
        })
        .last()
}
