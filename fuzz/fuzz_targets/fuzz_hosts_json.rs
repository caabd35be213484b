#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Hosts file parsing and unknown-key detection must never panic
        let _ = fsync::config::parse_host_records(content, Path::new("hosts.json"));
    }
});
