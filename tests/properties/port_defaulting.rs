//! Property tests for port resolution.

use proptest::prelude::*;

use fsync::config::resolve_port;
use fsync::domain::entities::{HostEntry, DEFAULT_SSH_PORT};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every in-range port survives resolution unchanged, zero becomes 22.
    #[test]
    fn property_valid_ports_resolve(port in 0u16..=u16::MAX) {
        let resolved = resolve_port("h", Some(i64::from(port))).unwrap();
        if port == 0 {
            prop_assert_eq!(resolved, DEFAULT_SSH_PORT);
        } else {
            prop_assert_eq!(resolved, port);
        }
    }

    /// PROPERTY: Ports outside 0..=65535 are rejected, never truncated.
    #[test]
    fn property_out_of_range_ports_fail(
        port in prop_oneof![i64::MIN..0i64, 65_536i64..i64::MAX]
    ) {
        prop_assert!(resolve_port("h", Some(port)).is_err());
    }

    /// PROPERTY: A built entry never carries port zero.
    #[test]
    fn property_entries_never_use_port_zero(port in 0u16..=u16::MAX) {
        let entry = HostEntry::new("h", "example.com", port, "u", "/tmp", "");
        prop_assert_ne!(entry.port(), 0);
    }
}
