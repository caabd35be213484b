//! Log setup for the `fsync` binary
//!
//! Level: `RUST_LOG`, else `FSYNC_LOG`, else the `-v` count. Output goes to
//! stderr, or is appended to the `--log` file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";

pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    let directive = filter_directive(
        std::env::var("RUST_LOG").ok(),
        std::env::var("FSYNC_LOG").ok(),
        verbosity,
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .try_init(),
    };
    installed.map_err(|e| anyhow!("cannot install logger: {e}"))
}

fn filter_directive(rust_log: Option<String>, fsync_log: Option<String>, verbosity: u8) -> String {
    if let Some(v) = rust_log.filter(|v| !v.trim().is_empty()) {
        return v;
    }
    if let Some(v) = fsync_log.filter(|v| !v.trim().is_empty()) {
        return match v.trim() {
            "silent" | "quiet" => "off".to_string(),
            other => other.to_string(),
        };
    }
    match verbosity {
        0 => DEFAULT_LEVEL,
        1 => "debug",
        _ => "trace",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_wins() {
        assert_eq!(
            filter_directive(Some("fsync=trace".into()), Some("warn".into()), 2),
            "fsync=trace"
        );
    }

    #[test]
    fn fsync_log_beats_verbosity() {
        assert_eq!(filter_directive(None, Some("warn".into()), 2), "warn");
        assert_eq!(filter_directive(None, Some("silent".into()), 0), "off");
        assert_eq!(filter_directive(Some("  ".into()), Some("error".into()), 0), "error");
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(filter_directive(None, None, 0), "info");
        assert_eq!(filter_directive(None, None, 1), "debug");
        assert_eq!(filter_directive(None, None, 3), "trace");
    }
}
