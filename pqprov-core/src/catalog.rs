//! Built-in algorithm catalog.
//!
//! Every row is listed regardless of the enabled feature set; `enabled`
//! records whether the primitive is linked into this build. Disabled rows keep
//! their position so codepoint slots stay stable across feature sets.

use crate::descriptor::{
    KeyExchangeDescriptor as Kex, SecurityLevel::*, SigVariant::*, SignatureDescriptor as Sig, ABSENT,
};

macro_rules! kex {
    ($name:literal, $feature:literal, $pure:literal, $ecp:expr, $ecx:expr, $level:expr) => {
        Kex::new($name, $feature, cfg!(feature = $feature), [$pure, $ecp, $ecx], $level)
    };
}

macro_rules! sig {
    ($base:literal, $variant:expr, $feature:literal, $cp:literal, $oid:literal, $level:expr) => {
        Sig::new($base, $variant, $feature, cfg!(feature = $feature), $cp, $oid, $level)
    };
}

static KEY_EXCHANGE: [Kex; 18] = [
    kex!("frodo640aes", "frodokem-640-aes", 0x0200, 0x2F00, 0x2F80, L128),
    kex!("frodo640shake", "frodokem-640-shake", 0x0201, 0x2F01, 0x2F81, L128),
    kex!("frodo976aes", "frodokem-976-aes", 0x0202, 0x2F02, 0x2F82, L192),
    kex!("frodo976shake", "frodokem-976-shake", 0x0203, 0x2F03, 0x2F83, L192),
    kex!("frodo1344aes", "frodokem-1344-aes", 0x0204, 0x2F04, ABSENT, L256),
    kex!("frodo1344shake", "frodokem-1344-shake", 0x0205, 0x2F05, ABSENT, L256),
    kex!("kyber512", "kyber-512", 0x023A, 0x2F3A, 0x2F39, L128),
    kex!("kyber768", "kyber-768", 0x023C, 0x2F3C, 0x2F90, L192),
    kex!("kyber1024", "kyber-1024", 0x023D, 0x2F3D, ABSENT, L256),
    kex!("bikel1", "bike-l1", 0x0241, 0x2F41, 0x2FAE, L128),
    kex!("bikel3", "bike-l3", 0x0242, 0x2F42, 0x2FAF, L192),
    kex!("bikel5", "bike-l5", 0x0243, 0x2F43, ABSENT, L256),
    kex!("kyber90s512", "kyber-512-90s", 0x023E, 0x2F3E, 0x2FA9, L128),
    kex!("kyber90s768", "kyber-768-90s", 0x023F, 0x2F3F, 0x2FAA, L192),
    kex!("kyber90s1024", "kyber-1024-90s", 0x0240, 0x2F40, ABSENT, L256),
    kex!("hqc128", "hqc-128", 0x022C, 0x2F2C, 0x2FAC, L128),
    kex!("hqc192", "hqc-192", 0x022D, 0x2F2D, 0x2FAD, L192),
    kex!("hqc256", "hqc-256", 0x022E, 0x2F2E, ABSENT, L256),
];

static SIGNATURE: [Sig; 34] = [
    sig!("dilithium2", Pure, "dilithium-2", 0xfea0, "1.3.6.1.4.1.2.267.7.4.4", L128),
    sig!("dilithium2", Curve, "dilithium-2", 0xfea1, "1.3.9999.2.7.1", L128),
    sig!("dilithium2", Rsa, "dilithium-2", 0xfea2, "1.3.9999.2.7.2", L128),
    sig!("dilithium3", Pure, "dilithium-3", 0xfea3, "1.3.6.1.4.1.2.267.7.6.5", L192),
    sig!("dilithium3", Curve, "dilithium-3", 0xfea4, "1.3.9999.2.7.3", L192),
    sig!("dilithium5", Pure, "dilithium-5", 0xfea5, "1.3.6.1.4.1.2.267.7.8.7", L256),
    sig!("dilithium5", Curve, "dilithium-5", 0xfea6, "1.3.9999.2.7.4", L256),
    sig!("dilithium2_aes", Pure, "dilithium-2-aes", 0xfea7, "1.3.6.1.4.1.2.267.11.4.4", L128),
    sig!("dilithium2_aes", Curve, "dilithium-2-aes", 0xfea8, "1.3.9999.2.11.1", L128),
    sig!("dilithium2_aes", Rsa, "dilithium-2-aes", 0xfea9, "1.3.9999.2.11.2", L128),
    sig!("dilithium3_aes", Pure, "dilithium-3-aes", 0xfeaa, "1.3.6.1.4.1.2.267.11.6.5", L192),
    sig!("dilithium3_aes", Curve, "dilithium-3-aes", 0xfeab, "1.3.9999.2.11.3", L192),
    sig!("dilithium5_aes", Pure, "dilithium-5-aes", 0xfeac, "1.3.6.1.4.1.2.267.11.8.7", L256),
    sig!("dilithium5_aes", Curve, "dilithium-5-aes", 0xfead, "1.3.9999.2.11.4", L256),
    sig!("falcon512", Pure, "falcon-512", 0xfeae, "1.3.9999.3.6", L128),
    sig!("falcon512", Curve, "falcon-512", 0xfeaf, "1.3.9999.3.7", L128),
    sig!("falcon512", Rsa, "falcon-512", 0xfeb0, "1.3.9999.3.8", L128),
    sig!("falcon1024", Pure, "falcon-1024", 0xfeb1, "1.3.9999.3.9", L256),
    sig!("falcon1024", Curve, "falcon-1024", 0xfeb2, "1.3.9999.3.10", L256),
    sig!("sphincsharaka128frobust", Pure, "sphincs-haraka-128f-robust", 0xfe42, "1.3.9999.6.1.1", L128),
    sig!("sphincsharaka128frobust", Curve, "sphincs-haraka-128f-robust", 0xfe43, "1.3.9999.6.1.2", L128),
    sig!("sphincsharaka128frobust", Rsa, "sphincs-haraka-128f-robust", 0xfe44, "1.3.9999.6.1.3", L128),
    sig!("sphincsharaka128fsimple", Pure, "sphincs-haraka-128f-simple", 0xfe45, "1.3.9999.6.1.4", L128),
    sig!("sphincsharaka128fsimple", Curve, "sphincs-haraka-128f-simple", 0xfe46, "1.3.9999.6.1.5", L128),
    sig!("sphincsharaka128fsimple", Rsa, "sphincs-haraka-128f-simple", 0xfe47, "1.3.9999.6.1.6", L128),
    sig!("sphincssha256128frobust", Pure, "sphincs-sha256-128f-robust", 0xfe5e, "1.3.9999.6.4.1", L128),
    sig!("sphincssha256128frobust", Curve, "sphincs-sha256-128f-robust", 0xfe5f, "1.3.9999.6.4.2", L128),
    sig!("sphincssha256128frobust", Rsa, "sphincs-sha256-128f-robust", 0xfe60, "1.3.9999.6.4.3", L128),
    sig!("sphincssha256128ssimple", Pure, "sphincs-sha256-128s-simple", 0xfe67, "1.3.9999.6.4.10", L128),
    sig!("sphincssha256128ssimple", Curve, "sphincs-sha256-128s-simple", 0xfe68, "1.3.9999.6.4.11", L128),
    sig!("sphincssha256128ssimple", Rsa, "sphincs-sha256-128s-simple", 0xfe69, "1.3.9999.6.4.12", L128),
    sig!("sphincsshake256128fsimple", Pure, "sphincs-shake256-128f-simple", 0xfe7d, "1.3.9999.6.7.4", L128),
    sig!("sphincsshake256128fsimple", Curve, "sphincs-shake256-128f-simple", 0xfe7e, "1.3.9999.6.7.5", L128),
    sig!("sphincsshake256128fsimple", Rsa, "sphincs-shake256-128f-simple", 0xfe7f, "1.3.9999.6.7.6", L128),
];

/// Key-exchange rows in table order.
pub fn key_exchange_catalog() -> &'static [Kex] {
    &KEY_EXCHANGE
}

/// Signature rows in table order.
pub fn signature_catalog() -> &'static [Sig] {
    &SIGNATURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{GroupVariant, SigVariant};
    use std::collections::HashSet;

    #[test]
    fn default_codepoints_are_unique() {
        let groups: Vec<u32> = KEY_EXCHANGE
            .iter()
            .flat_map(|row| row.variants().map(move |v| row.group_id(v)))
            .collect();
        assert_eq!(groups.len(), groups.iter().collect::<HashSet<_>>().len());

        let sigs: HashSet<u32> = SIGNATURE.iter().map(|s| s.codepoint).collect();
        assert_eq!(sigs.len(), SIGNATURE.len());
    }

    #[test]
    fn top_tier_rows_have_no_ecx_hybrid() {
        for row in KEY_EXCHANGE.iter().filter(|r| r.security == L256) {
            assert!(!row.offers(GroupVariant::Hybrid(crate::descriptor::CurveFamily::Ecx)), "{}", row.name);
        }
    }

    #[test]
    fn rsa_only_at_128_bits() {
        for sig in SIGNATURE.iter().filter(|s| s.variant == SigVariant::Rsa) {
            assert_eq!(sig.security, L128, "{}", sig.name());
        }
    }

    #[test]
    fn variant_rows_share_feature_and_level() {
        for pair in SIGNATURE.windows(2) {
            if pair[0].base == pair[1].base {
                assert_eq!(pair[0].feature, pair[1].feature);
                assert_eq!(pair[0].security, pair[1].security);
            }
        }
    }
}
