//! Domain Layer
//!
//! The supervisor's vocabulary without any process or network I/O.
//!
//! ## Structure
//!
//! - `entities/` - Hosts, the host set and the shared credentials
//! - `value_objects/` - Change events, remote actions, key material, policies
//! - `ports/` - Traits the infrastructure layer implements (remote transport, change sinks)
//!
//! Parsing of key material and known-hosts databases lives here because it
//! is pure: the infrastructure layer only reads the bytes from disk.

pub mod entities;
pub mod ports;
pub mod value_objects;
