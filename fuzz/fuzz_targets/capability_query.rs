#![no_main]

use libfuzzer_sys::fuzz_target;
use pqprov_core::{get_capabilities, CapabilityClass, RegistryBuilder};

fuzz_target!(|data: &[u8]| {
    let Ok(registry) = RegistryBuilder::from_catalog().freeze() else { return };
    let (stop_at, name) = match data.split_first() {
        Some((n, rest)) => (usize::from(*n), String::from_utf8_lossy(rest)),
        None => return,
    };

    let mut calls = 0usize;
    let ok = get_capabilities(&registry, &name, |_| {
        calls += 1;
        calls != stop_at
    });

    match CapabilityClass::parse(&name) {
        None => assert!(!ok && calls == 0),
        Some(_) if stop_at == 0 => assert!(ok),
        Some(_) => assert_eq!(ok, calls < stop_at),
    }
});
