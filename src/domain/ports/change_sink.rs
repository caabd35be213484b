//! Change Sink Port
//!
//! Where a worker hands each change once it knows which remote action the
//! change implies. The transfer collaborator plugs in here; the default
//! sink only logs.

use crate::domain::entities::HostEntry;
use crate::domain::value_objects::{ChangeEvent, RemoteAction};
use crate::error::SyncApplicationError;

/// Applies planned remote actions for one host
pub trait ChangeSink: Send {
    /// Apply one change; an error affects only this event
    fn apply(
        &mut self,
        host: &HostEntry,
        event: &ChangeEvent,
        action: &RemoteAction,
    ) -> Result<(), SyncApplicationError>;
}
