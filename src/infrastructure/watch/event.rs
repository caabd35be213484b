//! Translation of `notify` events into change events

use std::fs;
use std::path::Path;

use notify::event::{CreateKind, MetadataKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind};

use crate::domain::value_objects::{ChangeEvent, ChangeKind, EntryType};

/// Change events carried by one `notify` event, in path order
///
/// Access notifications carry no change and yield nothing. A rename that
/// reports both sides becomes one event carrying the old path; a rename
/// seen from one side only is a removal (`From`) or a creation (`To`).
pub fn translate(event: &Event) -> Vec<ChangeEvent> {
    if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
        if let [from, to] = event.paths.as_slice() {
            return vec![ChangeEvent::renamed(from, to).with_entry(entry_type_of(to))];
        }
    }

    let (kind, hint) = match event.kind {
        EventKind::Create(CreateKind::File) => (ChangeKind::Create, Some(EntryType::File)),
        EventKind::Create(CreateKind::Folder) => (ChangeKind::Create, Some(EntryType::Directory)),
        EventKind::Create(_) => (ChangeKind::Create, None),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => (ChangeKind::Remove, None),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => (ChangeKind::Create, None),
        EventKind::Modify(ModifyKind::Name(_)) => (ChangeKind::Rename, None),
        EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::Permissions | MetadataKind::Ownership,
        )) => (ChangeKind::Chmod, None),
        EventKind::Modify(_) => (ChangeKind::Write, None),
        EventKind::Remove(RemoveKind::File) => (ChangeKind::Remove, Some(EntryType::File)),
        EventKind::Remove(RemoveKind::Folder) => (ChangeKind::Remove, Some(EntryType::Directory)),
        EventKind::Remove(_) => (ChangeKind::Remove, None),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => return Vec::new(),
    };

    event
        .paths
        .iter()
        .map(|path| ChangeEvent::new(kind, path).with_entry(hint.unwrap_or_else(|| entry_type_of(path))))
        .collect()
}

/// Entry type of `path` as it is now; `Unknown` once it is gone
fn entry_type_of(path: &Path) -> EntryType {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => EntryType::Directory,
        Ok(_) => EntryType::File,
        Err(_) => EntryType::Unknown,
    }
}
