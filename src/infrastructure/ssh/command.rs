//! Command lines for the OpenSSH client tools

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::domain::entities::{Credentials, HostEntry};

const WAIT_TICK: Duration = Duration::from_millis(50);

/// Options shared by every `ssh`/`sftp` invocation
///
/// No prompts, strict host-key checking against the configured database
/// only, and no identity other than the configured key.
pub(crate) fn client_options(credentials: &Credentials, connect_timeout: Duration) -> Vec<OsString> {
    let timeout = connect_timeout.as_secs().max(1);
    let mut args = Vec::new();
    for option in [
        "BatchMode=yes".to_string(),
        "StrictHostKeyChecking=yes".to_string(),
        config_path("UserKnownHostsFile", credentials.known_hosts().path()),
        "GlobalKnownHostsFile=/dev/null".to_string(),
        "IdentitiesOnly=yes".to_string(),
        "PasswordAuthentication=no".to_string(),
        "KbdInteractiveAuthentication=no".to_string(),
        format!("ConnectTimeout={timeout}"),
        "LogLevel=ERROR".to_string(),
    ] {
        args.push(OsString::from("-o"));
        args.push(OsString::from(option));
    }
    args.push(OsString::from("-i"));
    args.push(credentials.identity().path().as_os_str().to_os_string());
    args
}

/// `ssh -M -S <socket> -f -N`: authenticate, then background the master
pub(crate) fn master_args(
    host: &HostEntry,
    credentials: &Credentials,
    socket: &Path,
    connect_timeout: Duration,
) -> Vec<OsString> {
    let mut args = client_options(credentials, connect_timeout);
    args.extend(["-M", "-S"].map(OsString::from));
    args.push(socket.as_os_str().to_os_string());
    args.extend(["-f", "-N", "-p"].map(OsString::from));
    args.push(OsString::from(host.port().to_string()));
    args.push(OsString::from(host.destination()));
    args
}

/// `ssh -S <socket> -O <verb>` against a running master
pub(crate) fn control_args(host: &HostEntry, socket: &Path, verb: &str) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-S".into(), socket.as_os_str().to_os_string()];
    args.extend(["-O", verb, "-p"].map(OsString::from));
    args.push(OsString::from(host.port().to_string()));
    args.push(OsString::from(host.destination()));
    args
}

/// `sftp -b -` multiplexed over the master socket
pub(crate) fn sftp_args(
    host: &HostEntry,
    credentials: &Credentials,
    socket: &Path,
    connect_timeout: Duration,
) -> Vec<OsString> {
    let mut args = client_options(credentials, connect_timeout);
    args.push(OsString::from("-o"));
    args.push(OsString::from(config_path("ControlPath", socket)));
    args.push(OsString::from("-o"));
    args.push(OsString::from("ControlMaster=no"));
    args.extend(["-b", "-", "-P"].map(OsString::from));
    args.push(OsString::from(host.port().to_string()));
    args.push(OsString::from(host.destination()));
    args
}

/// `Key=value` with the value quoted when it contains whitespace
fn config_path(key: &str, path: &Path) -> String {
    let value = path.display().to_string();
    if value.chars().any(char::is_whitespace) {
        format!("{key}=\"{value}\"")
    } else {
        format!("{key}={value}")
    }
}

/// Run `command` to completion, killing it once `deadline` has passed
///
/// `input` is written to stdin and stdin is closed. Stdout and stderr are
/// whatever the caller configured; piped streams are collected once the
/// child exits (output is a handful of lines, it cannot fill a pipe).
/// Returns `Ok(None)` on timeout.
pub(crate) fn run_with_deadline(
    mut command: Command,
    input: Option<&[u8]>,
    deadline: Duration,
) -> io::Result<Option<Output>> {
    command.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    let mut child = command.spawn()?;

    if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
        stdin.write_all(input)?;
    }

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            let (stdout, stderr) = drain(&mut child)?;
            return Ok(Some(Output {
                status,
                stdout,
                stderr,
            }));
        }
        if started.elapsed() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(WAIT_TICK);
    }
}

fn drain(child: &mut Child) -> io::Result<(Vec<u8>, Vec<u8>)> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    if let Some(mut out) = child.stdout.take() {
        out.read_to_end(&mut stdout)?;
    }
    if let Some(mut err) = child.stderr.take() {
        err.read_to_end(&mut stderr)?;
    }
    Ok((stdout, stderr))
}
