//! Terminal rendering for the fsync binary

pub mod error;
pub mod hosts;
