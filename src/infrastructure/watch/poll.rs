//! `PollWatcher`-backed change stream

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use notify::{Config, Event, PollWatcher, RecursiveMode, Watcher};
use tracing::debug;

use super::event::translate;
use crate::config::DEFAULT_POLL_INTERVAL;
use crate::domain::value_objects::ChangeEvent;
use crate::error::WatchError;

/// One element of a change stream
#[derive(Debug)]
pub enum WatchItem {
    Change(ChangeEvent),
    /// Watcher-internal failure; the stream goes on
    Error(WatchError),
}

/// Recursive watcher for one local root
#[derive(Debug, Clone)]
pub struct FileWatcher {
    root: PathBuf,
    interval: Duration,
}

impl FileWatcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Polling cadence (default 1s)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start polling; subdirectories created later are picked up on the next scan
    ///
    /// The root must be a listable directory. The poller itself only reports
    /// a missing root through the stream, so it is checked up front.
    pub fn start(self) -> Result<ChangeStream, WatchError> {
        fs::read_dir(&self.root).map_err(|e| WatchError::Start {
            path: self.root.clone(),
            message: e.to_string(),
        })?;

        let (tx, rx) = mpsc::channel();
        let handler = move |result: Result<Event, notify::Error>| {
            let items: Vec<WatchItem> = match result {
                Ok(event) => translate(&event).into_iter().map(WatchItem::Change).collect(),
                Err(err) => vec![WatchItem::Error(err.into())],
            };
            for item in items {
                // Receiver gone: the stream was closed.
                if tx.send(item).is_err() {
                    return;
                }
            }
        };

        let start_error = |err: notify::Error| WatchError::Start {
            path: self.root.clone(),
            message: err.to_string(),
        };
        let config = Config::default().with_poll_interval(self.interval);
        let mut watcher = PollWatcher::new(handler, config).map_err(start_error)?;
        watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(start_error)?;

        debug!(
            root = %self.root.display(),
            interval_ms = self.interval.as_millis() as u64,
            "poll watcher started"
        );
        Ok(ChangeStream {
            root: self.root,
            rx,
            watcher: Some(watcher),
        })
    }
}

/// Live sequence of change events for one root
///
/// Items arrive in the order the poller reported them. The sequence is
/// unbounded and cannot be restarted; after `close` it drains whatever was
/// already queued and then ends.
pub struct ChangeStream {
    root: PathBuf,
    rx: Receiver<WatchItem>,
    watcher: Option<PollWatcher>,
}

impl ChangeStream {
    /// A stream fed by hand instead of a poller
    pub(crate) fn detached(root: impl Into<PathBuf>) -> (Sender<WatchItem>, Self) {
        let (tx, rx) = mpsc::channel();
        let stream = Self {
            root: root.into(),
            rx,
            watcher: None,
        };
        (tx, stream)
    }

    /// Wait up to `timeout` for the next item
    ///
    /// `Disconnected` means the stream has ended.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<WatchItem, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Stop polling
    pub fn close(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            drop(watcher);
            debug!(root = %self.root.display(), "poll watcher closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.watcher.is_none()
    }
}

impl Iterator for ChangeStream {
    type Item = WatchItem;

    fn next(&mut self) -> Option<WatchItem> {
        self.rx.recv().ok()
    }
}

impl Drop for ChangeStream {
    fn drop(&mut self) {
        self.close();
    }
}
