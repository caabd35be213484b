use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fsync::FailurePolicy;

/// fsync - keep remote hosts in step with local directories
#[derive(Parser, Debug)]
#[command(name = "fsync")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'fsync' without a subcommand to verify all hosts and start syncing.")]
pub struct Cli {
    /// Hosts file (JSON: pet-name -> hostname, port, user, local_dir, remote_dir)
    #[arg(short = 'f', long = "file", value_name = "PATH", global = true)]
    pub file: Option<PathBuf>,

    /// SSH private key used for every host
    #[arg(short = 'k', long = "key", value_name = "PATH", global = true)]
    pub key: Option<PathBuf>,

    /// OpenSSH known_hosts file
    #[arg(short = 'j', long = "hosts", value_name = "PATH", global = true)]
    pub known_hosts: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(short = 'l', long = "log", value_name = "PATH", global = true)]
    pub log: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify every host, then watch and sync until interrupted
    Run(RunArgs),

    /// Show the resolved host configuration
    Config {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Watcher polling interval in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: Option<u64>,

    /// SSH connect timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub connect_timeout: Option<u64>,

    /// What to do when a host fails verification
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_failure: Option<OnFailure>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Stop before any worker starts
    Abort,
    /// Leave unreachable hosts out
    Skip,
}

impl From<OnFailure> for FailurePolicy {
    fn from(value: OnFailure) -> Self {
        match value {
            OnFailure::Abort => FailurePolicy::Abort,
            OnFailure::Skip => FailurePolicy::Skip,
        }
    }
}
