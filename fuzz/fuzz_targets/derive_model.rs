#![no_main]

use buildsmith::cli::commands::load_model;
use buildsmith::{DerivationConfig, Deriver};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary JSON models must either fail to load, fail to derive, or derive; never panic
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(mut repo) = load_model(s) {
            let _ = Deriver::new(&mut repo, DerivationConfig::default()).derive_buildables();
        }
    }
});
