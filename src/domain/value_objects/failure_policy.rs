//! What a run does when one host fails verification

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reaction to a host that fails pre-flight verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Any failing host aborts the whole run before a worker starts
    #[default]
    Abort,
    /// Failing hosts are logged and left out; the rest are synced
    Skip,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" | "abort-on-any-failure" => Ok(Self::Abort),
            "skip" | "skip-unreachable-hosts" => Ok(Self::Skip),
            other => Err(format!("unknown failure policy '{other}' (expected abort or skip)")),
        }
    }
}
