//! Tests for the config module

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::tempdir;

use super::*;
use crate::domain::value_objects::FailurePolicy;
use crate::error::{AuthenticationError, ConfigError, FsyncError};
use crate::test_support::{openssh_private_key, write_key_files};

fn record(hostname: &str, user: &str, local_dir: &Path) -> HostRecord {
    HostRecord {
        hostname: hostname.to_string(),
        port: None,
        user: user.to_string(),
        local_dir: local_dir.to_path_buf(),
        remote_dir: "/srv/app".to_string(),
    }
}

#[test]
fn test_port_zero_and_missing_default_to_22() {
    assert_eq!(resolve_port("web", None).unwrap(), 22);
    assert_eq!(resolve_port("web", Some(0)).unwrap(), 22);
    assert_eq!(resolve_port("web", Some(2222)).unwrap(), 2222);
    assert_eq!(resolve_port("web", Some(65535)).unwrap(), 65535);
}

#[test]
fn test_out_of_range_port_is_rejected() {
    for port in [-1, 65536, i64::MAX] {
        let err = resolve_port("web", Some(port)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { ref host, port: p } if host == "web" && p == port));
    }
}

#[test]
fn test_build_host_entry_applies_defaults() {
    let dir = tempdir().unwrap();
    let entry = build_host_entry("web", record(" web.example.org ", "deploy", dir.path())).unwrap();

    assert_eq!(entry.pet_name(), "web");
    assert_eq!(entry.hostname(), "web.example.org");
    assert_eq!(entry.port(), 22);
    assert_eq!(entry.user(), "deploy");
    assert_eq!(entry.local_dir(), dir.path());
    assert_eq!(entry.remote_dir(), "/srv/app");
}

#[test]
fn test_build_host_entry_requires_listable_local_dir() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = build_host_entry("web", record("h", "u", &missing)).unwrap_err();
    assert!(matches!(err, ConfigError::LocalDir { ref host, .. } if host == "web"));

    let file = dir.path().join("plain.txt");
    fs::write(&file, "x").unwrap();
    let err = build_host_entry("web", record("h", "u", &file)).unwrap_err();
    assert!(matches!(err, ConfigError::LocalDir { .. }));
}

#[test]
fn test_build_host_entry_makes_relative_local_dir_absolute() {
    let dir = tempfile::Builder::new().prefix("fsync-rel").tempdir_in(".").unwrap();
    let relative = PathBuf::from(dir.path().file_name().unwrap());
    assert!(relative.is_relative());

    let entry = build_host_entry("web", record("h", "u", &relative)).unwrap();

    assert!(entry.local_dir().is_absolute());
    assert_eq!(
        entry.local_dir(),
        std::env::current_dir().unwrap().join(&relative)
    );
}

#[test]
fn test_build_host_entry_reports_missing_fields() {
    let dir = tempdir().unwrap();

    let err = build_host_entry("a", record("", "u", dir.path())).unwrap_err();
    assert!(matches!(err, ConfigError::MissingField { field: "hostname", .. }));

    let err = build_host_entry("a", record("h", "  ", dir.path())).unwrap_err();
    assert!(matches!(err, ConfigError::MissingField { field: "user", .. }));

    let err = build_host_entry("a", record("h", "u", Path::new(""))).unwrap_err();
    assert!(matches!(err, ConfigError::MissingField { field: "local_dir", .. }));
}

#[test]
fn test_empty_host_map_is_an_error() {
    let (records, _) = parse_host_records("{}", Path::new("hosts.json")).unwrap();
    let err = build_host_entries(records, Path::new("hosts.json")).unwrap_err();
    assert!(matches!(err, ConfigError::NoHosts { .. }));
}

#[test]
fn test_parse_host_records_reads_all_fields() {
    let json = r#"{
  "web": {
    "hostname": "web.example.org",
    "port": 2222,
    "user": "deploy",
    "local_dir": "/tmp/web",
    "remote_dir": "/srv/web"
  },
  "db": { "hostname": "db", "user": "root", "local_dir": "/tmp/db" }
}"#;
    let (records, warnings) = parse_host_records(json, Path::new("hosts.json")).unwrap();

    assert!(warnings.is_empty());
    assert_eq!(records.len(), 2);
    assert_eq!(records["web"].port, Some(2222));
    assert_eq!(records["db"].port, None);
    assert_eq!(records["db"].remote_dir, "");
}

#[test]
fn test_unknown_key_warns_with_suggestion() {
    let json = r#"{
  "web": {
    "hostname": "web",
    "usr": "deploy",
    "local_dir": "/tmp"
  }
}"#;
    let (_, warnings) = parse_host_records(json, Path::new("hosts.json")).unwrap();

    assert_eq!(warnings.len(), 1);
    let warning = &warnings[0];
    assert_eq!(warning.host.as_deref(), Some("web"));
    assert_eq!(warning.key, "usr");
    assert_eq!(warning.line, Some(4));
    assert_eq!(warning.suggestion.as_deref(), Some("user"));
    assert_eq!(warning.file, PathBuf::from("hosts.json"));
}

#[test]
fn test_unknown_key_far_from_any_field_has_no_suggestion() {
    assert_eq!(super::loader::suggest_key("compression"), None);
    assert_eq!(super::loader::suggest_key("hostnme").as_deref(), Some("hostname"));
    assert_eq!(super::loader::suggest_key("remotedir").as_deref(), Some("remote_dir"));
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    for json in ["", "[]", r#"{"web": {"port": "ssh"}}"#, "{} trailing"] {
        let err = parse_host_records(json, Path::new("hosts.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{json:?}");
    }
}

#[test]
fn test_load_host_entries_from_file() {
    let dir = tempdir().unwrap();
    let local = dir.path().join("site");
    fs::create_dir(&local).unwrap();
    let hosts_file = dir.path().join("hosts.json");
    fs::write(
        &hosts_file,
        format!(
            r#"{{"site": {{"hostname": "h", "port": 0, "user": "u", "local_dir": {:?}}}}}"#,
            local.display().to_string()
        ),
    )
    .unwrap();

    let entries = load_host_entries(&hosts_file).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].port(), 22);
}

#[test]
fn test_missing_hosts_file_is_a_read_error() {
    let dir = tempdir().unwrap();
    let err = load_host_entries(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_expand_home() {
    let Some(home) = dirs::home_dir() else {
        return;
    };
    assert_eq!(expand_home(Path::new("~")), home);
    assert_eq!(expand_home(Path::new("~/work")), home.join("work"));
    assert_eq!(expand_home(Path::new("/abs/~")), PathBuf::from("/abs/~"));
    assert_eq!(expand_home(Path::new("~other")), PathBuf::from("~other"));
}

#[test]
fn test_overrides_from_environment_lookup() {
    let settings = apply_overrides(Settings::default(), |key| match key {
        "FSYNC_CONFIG" => Some("/etc/fsync/hosts.json".to_string()),
        "FSYNC_KEY" => Some("/keys/id".to_string()),
        "FSYNC_POLL_INTERVAL_MS" => Some("250".to_string()),
        "FSYNC_CONNECT_TIMEOUT" => Some(" 3 ".to_string()),
        "FSYNC_ON_FAILURE" => Some("skip".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(settings.hosts_file, PathBuf::from("/etc/fsync/hosts.json"));
    assert_eq!(settings.private_key, PathBuf::from("/keys/id"));
    assert_eq!(settings.known_hosts, Settings::default().known_hosts);
    assert_eq!(settings.poll_interval, Duration::from_millis(250));
    assert_eq!(settings.connect_timeout, Duration::from_secs(3));
    assert_eq!(settings.on_failure, FailurePolicy::Skip);
}

#[test]
fn test_no_overrides_keeps_defaults() {
    let settings = apply_overrides(Settings::default(), |_| None).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.poll_interval, DEFAULT_POLL_INTERVAL);
    assert_eq!(settings.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    assert_eq!(settings.on_failure, FailurePolicy::Abort);
}

#[test]
fn test_invalid_overrides_are_rejected() {
    for (key, value) in [
        ("FSYNC_POLL_INTERVAL_MS", "0"),
        ("FSYNC_POLL_INTERVAL_MS", "fast"),
        ("FSYNC_CONNECT_TIMEOUT", "-5"),
        ("FSYNC_ON_FAILURE", "retry"),
    ] {
        let err = apply_overrides(Settings::default(), |k| (k == key).then(|| value.to_string()))
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidSetting { key: ref k, .. } if k == key),
            "{key}={value}"
        );
    }
}

#[test]
fn test_load_credentials() {
    let dir = tempdir().unwrap();
    let (key, known_hosts) = write_key_files(dir.path(), &["web.example.org"]);

    let credentials = load_credentials(&key, &known_hosts).unwrap();
    assert_eq!(credentials.identity().algorithm(), "ssh-ed25519");
    assert_eq!(credentials.identity().path(), key);
    assert_eq!(credentials.known_hosts().len(), 1);
}

#[test]
fn test_load_credentials_rejects_encrypted_key() {
    let dir = tempdir().unwrap();
    let (key, known_hosts) = write_key_files(dir.path(), &["h"]);
    fs::write(&key, openssh_private_key("aes256-ctr", "ssh-ed25519")).unwrap();

    let err = load_credentials(&key, &known_hosts).unwrap_err();
    assert!(matches!(
        err,
        FsyncError::Authentication(AuthenticationError::Encrypted { .. })
    ));
}

#[test]
fn test_load_credentials_missing_files() {
    let dir = tempdir().unwrap();
    let (key, known_hosts) = write_key_files(dir.path(), &["h"]);

    let err = load_credentials(&dir.path().join("absent"), &known_hosts).unwrap_err();
    assert!(matches!(err, FsyncError::Authentication(AuthenticationError::Read { .. })));

    let err = load_credentials(&key, &dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, FsyncError::Config(ConfigError::Read { .. })));
}

#[test]
fn test_load_host_set_checks_credentials_first() {
    let dir = tempdir().unwrap();
    let settings = Settings {
        hosts_file: dir.path().join("missing-hosts.json"),
        private_key: dir.path().join("missing-key"),
        known_hosts: dir.path().join("missing-known-hosts"),
        ..Settings::default()
    };

    let err = load_host_set(&settings).unwrap_err();
    assert!(matches!(err, FsyncError::Authentication(_)));
}

#[test]
fn test_load_host_set() {
    let dir = tempdir().unwrap();
    let (key, known_hosts) = write_key_files(dir.path(), &["a", "b"]);
    let hosts_file = dir.path().join("hosts.json");
    let local = dir.path().display().to_string();
    fs::write(
        &hosts_file,
        format!(
            r#"{{"b": {{"hostname": "b", "user": "u", "local_dir": {local:?}}},
                "a": {{"hostname": "a", "user": "u", "local_dir": {local:?}, "port": 2200}}}}"#
        ),
    )
    .unwrap();

    let settings = Settings {
        hosts_file,
        private_key: key,
        known_hosts,
        ..Settings::default()
    };
    let set = load_host_set(&settings).unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.pet_names(), vec!["a", "b"]);
    assert_eq!(set.get("a").map(|h| h.port()), Some(2200));
}
