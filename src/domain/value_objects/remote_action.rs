//! Remote actions implied by local change events
//!
//! Maps one `ChangeEvent` under a host's local root onto the operation the
//! transfer collaborator would perform under the host's remote directory.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::{ChangeEvent, ChangeKind, EntryType};

/// Operation to perform on the remote side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteAction {
    Upload { local: PathBuf, remote: String },
    MakeDir { remote: String },
    Delete { remote: String },
    Move { from: String, to: String },
    SetPermissions { local: PathBuf, remote: String },
}

impl RemoteAction {
    /// Plan the remote operation for `event`
    ///
    /// Returns `None` when the event needs no remote work (directory
    /// timestamp updates) or when the path lies outside `local_root`.
    pub fn plan(event: &ChangeEvent, local_root: &Path, remote_root: &str) -> Option<Self> {
        let remote = remote_path(local_root, remote_root, event.path())?;
        let local = event.path().to_path_buf();

        let action = match (event.kind(), event.entry()) {
            (ChangeKind::Create, EntryType::Directory) => Self::MakeDir { remote },
            (ChangeKind::Create, _) => Self::Upload { local, remote },
            (ChangeKind::Write, EntryType::Directory) => return None,
            (ChangeKind::Write, _) => Self::Upload { local, remote },
            (ChangeKind::Remove, _) => Self::Delete { remote },
            (ChangeKind::Chmod, _) => Self::SetPermissions { local, remote },
            (ChangeKind::Rename, entry) => match event.renamed_from() {
                Some(from) => Self::Move {
                    from: remote_path(local_root, remote_root, from)?,
                    to: remote,
                },
                // Unpaired rename: only one side was seen.
                None => match entry {
                    EntryType::Directory => Self::MakeDir { remote },
                    EntryType::File => Self::Upload { local, remote },
                    EntryType::Unknown => Self::Delete { remote },
                },
            },
        };
        Some(action)
    }

    /// Short verb for logs
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Upload { .. } => "upload",
            Self::MakeDir { .. } => "mkdir",
            Self::Delete { .. } => "delete",
            Self::Move { .. } => "move",
            Self::SetPermissions { .. } => "chmod",
        }
    }

    /// Remote path the action lands on
    pub fn target(&self) -> &str {
        match self {
            Self::Upload { remote, .. }
            | Self::MakeDir { remote }
            | Self::Delete { remote }
            | Self::SetPermissions { remote, .. } => remote,
            Self::Move { to, .. } => to,
        }
    }
}

impl fmt::Display for RemoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload { local, remote } => write!(f, "upload {} -> {}", local.display(), remote),
            Self::MakeDir { remote } => write!(f, "mkdir {remote}"),
            Self::Delete { remote } => write!(f, "delete {remote}"),
            Self::Move { from, to } => write!(f, "move {from} -> {to}"),
            Self::SetPermissions { local, remote } => {
                write!(f, "chmod {} (from {})", remote, local.display())
            }
        }
    }
}

/// POSIX path under `remote_root` mirroring `path` under `local_root`
fn remote_path(local_root: &Path, remote_root: &str, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(local_root).ok()?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }

    let base = match remote_root.trim_end_matches('/') {
        "" if remote_root.starts_with('/') => "/",
        "" => ".",
        trimmed => trimmed,
    };
    if segments.is_empty() {
        return Some(base.to_string());
    }
    let joined = segments.join("/");
    Some(if base == "/" {
        format!("/{joined}")
    } else {
        format!("{base}/{joined}")
    })
}
