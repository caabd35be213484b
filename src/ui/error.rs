use fsync::error::{AuthenticationError, ConfigError, HostVerificationError};
use fsync::FsyncError;

/// `[ERROR] <message>` plus a hint for known error classes
pub fn format_error(err: &anyhow::Error) -> String {
    // Library errors already carry their cause in the message.
    let (mut out, hint) = if let Some(e) = err.downcast_ref::<FsyncError>() {
        (format!("[ERROR] {e}\n"), fsync_hint(e))
    } else if let Some(e) = err.downcast_ref::<ConfigError>() {
        (format!("[ERROR] {e}\n"), Some(config_hint(e)))
    } else {
        (format!("[ERROR] {err:#}\n"), None)
    };

    if let Some(hint) = hint {
        out.push_str(&format!("  hint: {hint}\n"));
    }
    out
}

fn fsync_hint(err: &FsyncError) -> Option<&'static str> {
    match err {
        FsyncError::Config(e) => Some(config_hint(e)),
        FsyncError::Authentication(e) => Some(match e {
            AuthenticationError::Read { .. } => "pass the private key with -k/--key or FSYNC_KEY",
            AuthenticationError::Parse { .. } => "use an OpenSSH or PEM private key",
            AuthenticationError::Encrypted { .. } => {
                "fsync never prompts; use a key without a passphrase"
            }
        }),
        FsyncError::HostVerification(e) => Some(match e {
            HostVerificationError::Connection { .. } => {
                "check hostname, port and that the host is reachable"
            }
            HostVerificationError::Authentication { .. } => {
                "add the public key to the remote user's authorized_keys"
            }
            HostVerificationError::HostKey { .. } => {
                "record the host key in the known hosts file (ssh-keyscan) and check it"
            }
            HostVerificationError::Session { .. } => {
                "make sure the SFTP subsystem is enabled on the host"
            }
        }),
        FsyncError::NoHostsVerified { .. } => Some("see the log for why each host failed"),
        FsyncError::Watch(_)
        | FsyncError::WorkerSpawn { .. }
        | FsyncError::AlreadyStarted
        | FsyncError::Cancelled => None,
    }
}

fn config_hint(err: &ConfigError) -> &'static str {
    match err {
        ConfigError::Read { .. } => "check the path (-f/--file, -j/--hosts or FSYNC_* variables)",
        ConfigError::Parse { .. } => {
            "the hosts file maps pet-names to {hostname, port, user, local_dir, remote_dir}"
        }
        ConfigError::NoHosts { .. } => "add at least one host to the hosts file",
        ConfigError::InvalidPort { .. } => "use a port between 1 and 65535, or 0 for 22",
        ConfigError::MissingField { .. } => "every host needs hostname, user and local_dir",
        ConfigError::LocalDir { .. } => "local_dir must be an existing, listable directory",
        ConfigError::KnownHosts { .. } => "fix or remove that line of the known hosts file",
        ConfigError::InvalidSetting { .. } => "check the FSYNC_* environment variables",
    }
}
