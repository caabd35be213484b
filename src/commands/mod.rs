//! Command handlers for the fsync binary

pub mod config;
pub mod run;

use anyhow::Result;
use fsync::config::expand_home;
use fsync::Settings;

use crate::cli::Cli;

/// Defaults, then `FSYNC_*` variables, then global flags
pub fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::default().with_env_overrides()?;
    if let Some(file) = &cli.file {
        settings.hosts_file = file.clone();
    }
    if let Some(key) = &cli.key {
        settings.private_key = key.clone();
    }
    if let Some(known_hosts) = &cli.known_hosts {
        settings.known_hosts = known_hosts.clone();
    }

    settings.hosts_file = expand_home(&settings.hosts_file);
    settings.private_key = expand_home(&settings.private_key);
    settings.known_hosts = expand_home(&settings.known_hosts);
    Ok(settings)
}
