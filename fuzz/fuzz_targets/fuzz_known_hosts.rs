#![no_main]

use std::path::Path;

use fsync::domain::value_objects::KnownHosts;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(db) = KnownHosts::parse(Path::new("known_hosts"), content) {
            let _ = db.lookup("example.com", 22);
            let _ = db.lookup("example.com", 2222);
        }
    }
});
