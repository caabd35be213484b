//! Per-host sync workers
//!
//! A worker owns one change stream for its host's local root. Every event
//! is logged at `info`, turned into the remote action it implies and handed to the
//! host's `ChangeSink`. Nothing a worker hits is escalated to other hosts.

use std::fmt;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::cancel::CancellationToken;
use crate::config::DEFAULT_POLL_INTERVAL;
use crate::domain::entities::{Credentials, HostEntry};
use crate::domain::ports::ChangeSink;
use crate::domain::value_objects::{ChangeEvent, RemoteAction};
use crate::infrastructure::watch::{ChangeStream, FileWatcher, WatchItem};

/// Upper bound on how long a worker waits before rechecking cancellation
const TICK: Duration = Duration::from_millis(50);

/// How a worker ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerStatus {
    /// The change stream ended
    Completed,
    /// Cancellation was requested
    Cancelled,
    Failed(String),
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// Counters kept by one worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub events: u64,
    pub applied: u64,
    /// Events needing no remote work, or outside the local root
    pub skipped: u64,
    pub sink_errors: u64,
    pub watch_errors: u64,
}

/// Terminal report of one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub pet_name: String,
    pub status: WorkerStatus,
    pub stats: WorkerStats,
}

impl WorkerOutcome {
    pub fn failed(pet_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pet_name: pet_name.into(),
            status: WorkerStatus::Failed(message.into()),
            stats: WorkerStats::default(),
        }
    }
}

/// One host's unit of work, run on its own thread
pub trait Worker: Send {
    fn pet_name(&self) -> &str;

    /// Run until the work ends or `cancel` is tripped
    fn run(self: Box<Self>, cancel: CancellationToken) -> WorkerOutcome;
}

/// Builds the worker for a verified host
pub trait WorkerFactory: Send + Sync {
    fn create(&self, host: &HostEntry, credentials: &Arc<Credentials>) -> Box<dyn Worker>;
}

/// Builds a host's `ChangeSink`
pub type SinkFactory = dyn Fn(&HostEntry, &Arc<Credentials>) -> Box<dyn ChangeSink> + Send + Sync;

/// Watches the host's local root and feeds a `ChangeSink`
pub struct SyncWorker {
    host: HostEntry,
    poll_interval: Duration,
    sink: Box<dyn ChangeSink>,
    stats: WorkerStats,
}

impl SyncWorker {
    pub fn new(host: HostEntry, sink: Box<dyn ChangeSink>) -> Self {
        Self {
            host,
            poll_interval: DEFAULT_POLL_INTERVAL,
            sink,
            stats: WorkerStats::default(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Drain `stream` until it ends or `cancel` is tripped
    pub(crate) fn drain(mut self, mut stream: ChangeStream, cancel: &CancellationToken) -> WorkerOutcome {
        let status = loop {
            if cancel.is_cancelled() {
                stream.close();
                break WorkerStatus::Cancelled;
            }
            match stream.recv_timeout(TICK) {
                Ok(WatchItem::Change(event)) => self.handle(&event),
                Ok(WatchItem::Error(e)) => {
                    self.stats.watch_errors += 1;
                    warn!(host = %self.host.pet_name(), "{e}");
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break WorkerStatus::Completed,
            }
        };

        info!(
            host = %self.host.pet_name(),
            status = %status,
            events = self.stats.events,
            applied = self.stats.applied,
            "sync worker stopped"
        );
        WorkerOutcome {
            pet_name: self.host.pet_name().to_string(),
            status,
            stats: self.stats,
        }
    }

    fn handle(&mut self, event: &ChangeEvent) {
        self.stats.events += 1;
        info!(host = %self.host.pet_name(), "observed {event}");

        let local_root = self.host.local_dir();
        if !event.path().starts_with(local_root) {
            self.stats.skipped += 1;
            warn!(
                host = %self.host.pet_name(),
                path = %event.path().display(),
                root = %local_root.display(),
                "change outside local root ignored"
            );
            return;
        }

        let Some(action) = RemoteAction::plan(event, local_root, self.host.remote_dir()) else {
            self.stats.skipped += 1;
            debug!(host = %self.host.pet_name(), path = %event.path().display(), "no remote action needed");
            return;
        };

        match self.sink.apply(&self.host, event, &action) {
            Ok(()) => self.stats.applied += 1,
            Err(e) => {
                self.stats.sink_errors += 1;
                warn!(host = %self.host.pet_name(), "{e}");
            }
        }
    }
}

impl Worker for SyncWorker {
    fn pet_name(&self) -> &str {
        self.host.pet_name()
    }

    fn run(self: Box<Self>, cancel: CancellationToken) -> WorkerOutcome {
        let stream = match FileWatcher::new(self.host.local_dir())
            .with_interval(self.poll_interval)
            .start()
        {
            Ok(stream) => stream,
            Err(e) => {
                error!(host = %self.host.pet_name(), "{e}");
                return WorkerOutcome::failed(self.host.pet_name(), e.to_string());
            }
        };
        info!(
            host = %self.host.pet_name(),
            local_dir = %self.host.local_dir().display(),
            remote_dir = %self.host.remote_dir(),
            "sync worker watching"
        );
        self.drain(stream, &cancel)
    }
}

/// Creates a `SyncWorker` per host with a sink from `sinks`
pub struct SyncWorkerFactory {
    poll_interval: Duration,
    sinks: Box<SinkFactory>,
}

impl SyncWorkerFactory {
    pub fn new<F>(poll_interval: Duration, sinks: F) -> Self
    where
        F: Fn(&HostEntry, &Arc<Credentials>) -> Box<dyn ChangeSink> + Send + Sync + 'static,
    {
        Self {
            poll_interval,
            sinks: Box::new(sinks),
        }
    }
}

impl WorkerFactory for SyncWorkerFactory {
    fn create(&self, host: &HostEntry, credentials: &Arc<Credentials>) -> Box<dyn Worker> {
        let sink = (self.sinks)(host, credentials);
        Box::new(SyncWorker::new(host.clone(), sink).with_poll_interval(self.poll_interval))
    }
}
