#![no_main]

use libfuzzer_sys::fuzz_target;
use pqprov_core::{Provider, ProviderConfig};
use std::collections::BTreeMap;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else { return };
    // Bound input size.
    if text.len() > 16 * 1024 {
        return;
    }
    if let Ok(cfg) = ProviderConfig::from_toml_str(text) {
        let _ = Provider::init(&cfg, &BTreeMap::<String, String>::new());
    }
});
