//! Credentials entity
//!
//! Loaded once at startup and shared by reference with every verification
//! and sync operation. Nothing mutates it after construction.

use crate::domain::value_objects::{KnownHosts, SigningIdentity};

/// Signing identity plus host-key verification policy
#[derive(Debug, Clone)]
pub struct Credentials {
    identity: SigningIdentity,
    known_hosts: KnownHosts,
}

impl Credentials {
    pub fn new(identity: SigningIdentity, known_hosts: KnownHosts) -> Self {
        Self {
            identity,
            known_hosts,
        }
    }

    /// Private-key derived identity used to authenticate
    pub fn identity(&self) -> &SigningIdentity {
        &self.identity
    }

    /// Known-hosts database used to accept or reject host keys
    pub fn known_hosts(&self) -> &KnownHosts {
        &self.known_hosts
    }
}
