//! Polling file watcher
//!
//! `FileWatcher` starts a `notify::PollWatcher` on a host's local root and
//! hands back a `ChangeStream`: an unbounded, order-preserving sequence of
//! change events and error items that lasts until its owner closes it.

mod event;
mod poll;

pub use event::translate;
pub use poll::{ChangeStream, FileWatcher, WatchItem};
