#![no_main]

use libfuzzer_sys::fuzz_target;
use pqprov_core::codepoint::{parse_codepoint, MAX_CODEPOINT};
use pqprov_core::{OverridePolicy, RegistryBuilder};
use std::collections::HashMap;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);

    if let Ok(v) = parse_codepoint(&raw) {
        assert!((1..=MAX_CODEPOINT).contains(&v));
    }

    // Feed the same value to every slot; strict mode must either apply all
    // of them or fail on the first.
    let mut builder = RegistryBuilder::from_catalog();
    let env: HashMap<String, String> = pqprov_core::codepoint::override_keys(&builder)
        .into_iter()
        .map(|k| (k, raw.to_string()))
        .collect();
    let strict = builder.clone().apply_overrides(&env, OverridePolicy::Strict);
    let lenient = builder.apply_overrides(&env, OverridePolicy::Lenient);
    if let (Ok(s), Ok(l)) = (&strict, &lenient) {
        assert_eq!(s.applied.len(), l.applied.len());
    }
    if strict.is_err() {
        assert!(lenient.map(|r| r.applied.is_empty()).unwrap_or(false));
    }
});
