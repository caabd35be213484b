//! Change sinks
//!
//! `LogSink` is the default: it records each planned remote action in the
//! log and performs nothing on the remote side.

use tracing::info;

use crate::domain::entities::HostEntry;
use crate::domain::ports::ChangeSink;
use crate::domain::value_objects::{ChangeEvent, RemoteAction};
use crate::error::SyncApplicationError;

/// Logs planned actions at `info`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ChangeSink for LogSink {
    fn apply(
        &mut self,
        host: &HostEntry,
        event: &ChangeEvent,
        action: &RemoteAction,
    ) -> Result<(), SyncApplicationError> {
        info!(
            host = %host.pet_name(),
            kind = %event.kind(),
            entry = %event.entry(),
            path = %event.path().display(),
            action = action.verb(),
            remote = action.target(),
            "{event}"
        );
        Ok(())
    }
}
