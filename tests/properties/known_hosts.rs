//! Property tests for known-hosts parsing and lookup.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use proptest::prelude::*;

use fsync::domain::value_objects::{HostKeyStatus, KnownHosts};

fn key_blob() -> String {
    let mut blob = Vec::new();
    for field in [&b"ssh-ed25519"[..], &[9u8; 32][..]] {
        blob.extend_from_slice(&(field.len() as u32).to_be_bytes());
        blob.extend_from_slice(field);
    }
    STANDARD.encode(blob)
}

fn hostname() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9-]{0,12}(\\.[a-z]{2,6}){0,2}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing arbitrary text never panics.
    #[test]
    fn property_parse_never_panics(content in "(?s).{0,512}") {
        let _ = KnownHosts::parse(Path::new("known_hosts"), &content);
    }

    /// PROPERTY: A listed host is known on its own port and unknown on any other.
    #[test]
    fn property_listed_host_is_known(
        host in hostname(),
        port in 1u16..=u16::MAX,
        other in 1u16..=u16::MAX,
    ) {
        prop_assume!(port != other);
        let pattern = if port == 22 { host.clone() } else { format!("[{host}]:{port}") };
        let db = KnownHosts::parse(
            Path::new("known_hosts"),
            &format!("{pattern} ssh-ed25519 {}", key_blob()),
        )
        .unwrap();

        prop_assert!(matches!(db.lookup(&host, port), HostKeyStatus::Known(_)));
        prop_assert_eq!(db.lookup(&host, other), HostKeyStatus::Unknown);
    }

    /// PROPERTY: Lookup ignores hostname case.
    #[test]
    fn property_lookup_is_case_insensitive(host in hostname()) {
        let db = KnownHosts::parse(
            Path::new("known_hosts"),
            &format!("{} ssh-ed25519 {}", host.to_uppercase(), key_blob()),
        )
        .unwrap();
        prop_assert!(matches!(db.lookup(&host, 22), HostKeyStatus::Known(_)));
    }
}
