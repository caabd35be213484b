//! Domain Entities
//!
//! - `HostEntry` - One configured remote target
//! - `HostSet` - Every host of a run plus the shared credentials
//! - `Credentials` - Signing identity and host-key policy

mod credentials;
mod host;

pub use credentials::Credentials;
pub use host::{HostEntry, HostSet, DEFAULT_SSH_PORT};
