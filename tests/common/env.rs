//! Test environment builder for isolated fsync runs.
//!
//! Provides `TestEnv`: a temp directory holding the hosts file, a key, a
//! known_hosts file and local trees, plus a temp HOME, and helpers to run
//! the fsync binary against them.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use super::fixtures::{known_hosts_line, openssh_private_key};

/// Result of running the fsync binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

pub struct TestEnv {
    pub root: TempDir,
    pub home: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    /// Environment with a valid key and a known_hosts file listing `patterns`
    pub fn new(known_host_patterns: &[&str]) -> Self {
        let env = Self {
            root: TempDir::new().unwrap(),
            home: TempDir::new().unwrap(),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_fsync")),
        };
        env.write("id_ed25519", &openssh_private_key("none"));
        let lines: Vec<String> = known_host_patterns
            .iter()
            .map(|p| known_hosts_line(p))
            .collect();
        env.write("known_hosts", &lines.join("\n"));
        env
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Create a local tree under the environment root
    pub fn local_dir(&self, name: &str) -> PathBuf {
        let dir = self.path(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write `hosts.json` from raw JSON
    pub fn write_hosts(&self, json: &str) -> PathBuf {
        self.write("hosts.json", json)
    }

    /// Run with `-f hosts.json -k id_ed25519 -j known_hosts` appended
    pub fn run(&self, args: &[&str]) -> TestResult {
        let mut full: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        for (flag, file) in [("-f", "hosts.json"), ("-k", "id_ed25519"), ("-j", "known_hosts")] {
            full.push(flag.to_string());
            full.push(self.path(file).display().to_string());
        }
        self.run_raw(&full, &[])
    }

    /// Run exactly `args` with extra environment variables
    pub fn run_raw(&self, args: &[String], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.root.path())
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env_remove("RUST_LOG");
        for key in [
            "FSYNC_LOG",
            "FSYNC_CONFIG",
            "FSYNC_KEY",
            "FSYNC_KNOWN_HOSTS",
            "FSYNC_POLL_INTERVAL_MS",
            "FSYNC_CONNECT_TIMEOUT",
            "FSYNC_ON_FAILURE",
        ] {
            cmd.env_remove(key);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute fsync");
        Self::to_result(output)
    }

    fn to_result(output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// JSON string literal for a path
pub fn json_path(path: &Path) -> String {
    serde_json::to_string(&path.display().to_string()).unwrap()
}
