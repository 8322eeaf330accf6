//! Capability queries against the built-in catalog.

use pqprov_core::catalog::{key_exchange_catalog, signature_catalog};
use pqprov_core::params::{TLS_GROUP_ID, TLS_GROUP_NAME, TLS_GROUP_SECURITY_BITS, TLS_SIGALG_NAME};
use pqprov_core::{get_capabilities, get_capabilities_with_arg, ClassicalPartner, ParamSet, RegistryBuilder};

fn registry() -> pqprov_core::Registry {
    RegistryBuilder::from_catalog().freeze().expect("default catalog freezes")
}

fn collect(registry: &pqprov_core::Registry, class: &str) -> Vec<ParamSet> {
    let mut out = Vec::new();
    assert!(get_capabilities(registry, class, |p| {
        out.push(p.clone());
        true
    }));
    out
}

#[test]
fn group_count_matches_offered_variants() {
    let expected: usize = key_exchange_catalog()
        .iter()
        .filter(|r| r.enabled)
        .map(|r| r.variants().count())
        .sum();
    assert_eq!(collect(&registry(), "TLS-GROUP").len(), expected);
}

#[test]
fn sigalg_count_matches_enabled_rows() {
    let expected = signature_catalog().iter().filter(|r| r.enabled).count();
    assert_eq!(collect(&registry(), "TLS-SIGALG").len(), expected);
}

#[cfg(feature = "default")]
#[test]
fn full_build_offers_every_variant() {
    let reg = registry();
    assert_eq!(collect(&reg, "TLS-GROUP").len(), 48);
    assert_eq!(collect(&reg, "TLS-SIGALG").len(), 34);
}

#[test]
fn class_lookup_ignores_case() {
    let reg = registry();
    assert_eq!(collect(&reg, "TLS-GROUP"), collect(&reg, "tls-group"));
    assert_eq!(collect(&reg, "TLS-SIGALG"), collect(&reg, "Tls-SigAlg"));
}

#[test]
fn unknown_class_never_calls_back() {
    let reg = registry();
    let mut calls = 0;
    assert!(!get_capabilities(&reg, "BOGUS", |_| {
        calls += 1;
        true
    }));
    assert!(!get_capabilities(&reg, "", |_| {
        calls += 1;
        true
    }));
    assert_eq!(calls, 0);
}

fn assert_stops_after_third(class: &str) {
    let reg = registry();
    let mut calls = 0;
    let ok = get_capabilities(&reg, class, |_| {
        calls += 1;
        calls < 3
    });
    assert!(!ok, "{class}");
    assert_eq!(calls, 3, "{class}");
}

#[cfg(feature = "default")]
#[test]
fn group_rejection_stops_enumeration() {
    assert_stops_after_third("TLS-GROUP");
}

#[cfg(feature = "default")]
#[test]
fn sigalg_rejection_stops_enumeration() {
    assert_stops_after_third("TLS-SIGALG");
}

#[cfg(feature = "kyber-512")]
#[test]
fn kyber512_emits_pure_then_hybrids() {
    let groups = collect(&registry(), "TLS-GROUP");
    let pos = groups
        .iter()
        .position(|p| p.get_utf8(TLS_GROUP_NAME) == Some("kyber512"))
        .expect("kyber512 offered");
    let names: Vec<_> = groups[pos..pos + 3].iter().filter_map(|p| p.get_utf8(TLS_GROUP_NAME)).collect();
    assert_eq!(names, ["kyber512", "p256_kyber512", "x25519_kyber512"]);
    let ids: Vec<_> = groups[pos..pos + 3].iter().filter_map(|p| p.get_uint(TLS_GROUP_ID)).collect();
    assert_eq!(ids, [0x023A, 0x2F3A, 0x2F39]);
}

#[cfg(feature = "kyber-1024")]
#[test]
fn kyber1024_has_no_ecx_hybrid() {
    let groups = collect(&registry(), "TLS-GROUP");
    let names: Vec<_> = groups
        .iter()
        .filter_map(|p| p.get_utf8(TLS_GROUP_NAME))
        .filter(|n| n.ends_with("kyber1024"))
        .collect();
    assert_eq!(names, ["kyber1024", "p521_kyber1024"]);
}

#[test]
fn hybrid_partners_follow_security_tier() {
    let reg = registry();
    for p in collect(&reg, "TLS-GROUP") {
        let name = p.get_utf8(TLS_GROUP_NAME).expect("name");
        let bits = p.get_uint(TLS_GROUP_SECURITY_BITS).expect("bits");
        let Some((prefix, _)) = name.split_once('_') else { continue };
        let partner = ClassicalPartner::from_prefix(prefix).expect("known partner");
        let allowed: &[ClassicalPartner] = match bits {
            128 => &[ClassicalPartner::P256, ClassicalPartner::X25519],
            192 => &[ClassicalPartner::P384, ClassicalPartner::X448],
            256 => &[ClassicalPartner::P521],
            other => panic!("unexpected level {other}"),
        };
        assert!(allowed.contains(&partner), "{name} at {bits} bits");
    }
    for p in collect(&reg, "TLS-SIGALG") {
        let name = p.get_utf8(TLS_SIGALG_NAME).expect("name");
        if name.starts_with("rsa3072_") {
            assert_eq!(p.get_uint("tls-sigalg-sec-bits"), Some(128), "{name}");
        }
    }
}

#[test]
fn explicit_argument_callback() {
    let reg = registry();
    let mut seen = Vec::<String>::new();
    let ok = get_capabilities_with_arg(
        &reg,
        "TLS-SIGALG",
        |p, seen: &mut Vec<String>| {
            seen.extend(p.get_utf8(TLS_SIGALG_NAME).map(str::to_owned));
            true
        },
        &mut seen,
    );
    assert!(ok);
    assert_eq!(seen.len(), reg.sigalgs().count());
}

#[test]
fn concurrent_queries_agree() {
    let reg = registry();
    let baseline = collect(&reg, "TLS-GROUP");
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| collect(&reg, "TLS-GROUP"))).collect();
        for h in handles {
            assert_eq!(h.join().expect("thread"), baseline);
        }
    });
}

#[test]
fn params_serialize_with_wire_names() {
    let reg = registry();
    let Some(first) = reg.groups().next() else { return };
    let json = serde_json::to_value(first.to_params()).expect("json");
    assert!(json.get("tls-group-id").and_then(|v| v.as_u64()).is_some());
    assert_eq!(json.get("tls-min-tls").and_then(|v| v.as_i64()), Some(0x0304));
    assert_eq!(json.get("tls-max-dtls").and_then(|v| v.as_i64()), Some(-1));
}
