#![no_main]

use std::path::Path;

use fsync::domain::value_objects::SigningIdentity;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Key material is untrusted input until it parses
    let _ = SigningIdentity::parse(Path::new("id_ed25519"), data);
});
