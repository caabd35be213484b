//! Domain Value Objects
//!
//! Immutable value types shared by the verifier, the watcher and the workers.

mod change;
mod failure_policy;
mod identity;
mod known_hosts;
mod remote_action;
pub(crate) mod wire;

pub use change::{ChangeEvent, ChangeKind, EntryType};
pub use failure_policy::FailurePolicy;
pub use identity::{KeyFormat, SigningIdentity};
pub use known_hosts::{HostKeyStatus, KnownHostEntry, KnownHosts};
pub use remote_action::RemoteAction;
