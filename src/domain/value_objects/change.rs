//! File-system change events
//!
//! Produced by the watcher the moment the filesystem reports a change and
//! consumed by the host's worker. Never persisted.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Operation observed on a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Create,
    Write,
    Remove,
    Rename,
    /// Metadata-only change (permissions, ownership)
    Chmod,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Write => "WRITE",
            Self::Remove => "REMOVE",
            Self::Rename => "RENAME",
            Self::Chmod => "CHMOD",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best-effort classification of the changed path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    File,
    Directory,
    /// The path is gone or could not be inspected
    Unknown,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed file-system mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    kind: ChangeKind,
    path: PathBuf,
    from: Option<PathBuf>,
    entry: EntryType,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            from: None,
            entry: EntryType::Unknown,
        }
    }

    /// Rename from `from` to `to`
    pub fn renamed(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            kind: ChangeKind::Rename,
            path: to.into(),
            from: Some(from.into()),
            entry: EntryType::Unknown,
        }
    }

    pub fn with_entry(mut self, entry: EntryType) -> Self {
        self.entry = entry;
        self
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Absolute local path (the destination for renames)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source path of a rename, when the watcher paired both sides
    pub fn renamed_from(&self) -> Option<&Path> {
        self.from.as_deref()
    }

    pub fn entry(&self) -> EntryType {
        self.entry
    }

    pub fn is_dir(&self) -> bool {
        self.entry == EntryType::Directory
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(
                f,
                "{} {} {:?} -> {:?}",
                self.kind, self.entry, from, self.path
            ),
            None => write!(f, "{} {} {:?}", self.kind, self.entry, self.path),
        }
    }
}
