//! Common test utilities for fsync CLI and property tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated environment with a temp HOME, key material and a hosts file
//! - Fixtures: key and known-hosts generators

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
