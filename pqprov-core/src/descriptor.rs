//! Descriptor rows for the key-exchange and signature tables.
//!
//! A row carries the negotiated codepoints and the metadata the embedding TLS
//! stack needs to decide whether a group or signature algorithm is usable for a
//! given handshake. Hybrid variants are not separate rows: their names and
//! classical partners are derived from the base row and its security level.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Codepoint value marking a hybrid combination that is not offered.
pub const ABSENT: u32 = 0;

/// Handshake protocol versions referenced by the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProtocolVersion {
    Tls1_0,
    Tls1_1,
    Tls1_2,
    Tls1_3,
    Dtls1_0,
    Dtls1_2,
}

impl ProtocolVersion {
    /// Version number as carried on the wire.
    pub const fn wire(self) -> u16 {
        match self {
            Self::Tls1_0 => 0x0301,
            Self::Tls1_1 => 0x0302,
            Self::Tls1_2 => 0x0303,
            Self::Tls1_3 => 0x0304,
            Self::Dtls1_0 => 0xFEFF,
            Self::Dtls1_2 => 0xFEFD,
        }
    }

    pub const fn is_datagram(self) -> bool {
        matches!(self, Self::Dtls1_0 | Self::Dtls1_2)
    }

    // DTLS wire numbers count downwards, so ordering uses protocol age instead.
    const fn rank(self) -> u8 {
        match self {
            Self::Tls1_0 | Self::Dtls1_0 => 0,
            Self::Tls1_1 => 1,
            Self::Tls1_2 | Self::Dtls1_2 => 2,
            Self::Tls1_3 => 3,
        }
    }
}

/// One end of a supported-version range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VersionBound {
    /// The transport is not supported at all (wire `-1`).
    Unsupported,
    /// No bound (wire `0`). Only meaningful as a maximum.
    Unbounded,
    Version(ProtocolVersion),
}

impl VersionBound {
    pub const fn wire(self) -> i32 {
        match self {
            Self::Unsupported => -1,
            Self::Unbounded => 0,
            Self::Version(v) => v.wire() as i32,
        }
    }
}

/// Inclusive version range for one transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VersionRange {
    pub min: VersionBound,
    pub max: VersionBound,
}

impl VersionRange {
    /// TLS 1.3 and anything newer.
    pub const TLS13_ONWARDS: Self = Self {
        min: VersionBound::Version(ProtocolVersion::Tls1_3),
        max: VersionBound::Unbounded,
    };

    pub const UNSUPPORTED: Self = Self {
        min: VersionBound::Unsupported,
        max: VersionBound::Unsupported,
    };

    /// `min <= max` whenever both ends name a concrete version.
    pub fn is_monotonic(&self) -> bool {
        match (self.min, self.max) {
            (VersionBound::Version(min), VersionBound::Version(max)) => {
                min.is_datagram() == max.is_datagram() && min.rank() <= max.rank()
            }
            _ => true,
        }
    }
}

/// Nominal classical-equivalent strength, used as the tiering key for
/// classical partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SecurityLevel {
    L128,
    L192,
    L256,
}

impl SecurityLevel {
    pub const fn bits(self) -> u32 {
        match self {
            Self::L128 => 128,
            Self::L192 => 192,
            Self::L256 => 256,
        }
    }
}

/// Classical algorithms that can be paired with a post-quantum primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClassicalPartner {
    P256,
    P384,
    P521,
    X25519,
    X448,
    Rsa3072,
}

impl ClassicalPartner {
    /// Name prefix used for hybrid variants, e.g. `p256` in `p256_kyber512`.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::P256 => "p256",
            Self::P384 => "p384",
            Self::P521 => "p521",
            Self::X25519 => "x25519",
            Self::X448 => "x448",
            Self::Rsa3072 => "rsa3072",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        [Self::P256, Self::P384, Self::P521, Self::X25519, Self::X448, Self::Rsa3072]
            .into_iter()
            .find(|p| p.prefix() == prefix)
    }
}

impl fmt::Display for ClassicalPartner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// The two elliptic-curve families used for hybrid key exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CurveFamily {
    /// NIST prime curves: P-256, P-384, P-521 by tier.
    Ecp,
    /// Montgomery curves: X25519 at 128 bits, X448 above.
    Ecx,
}

impl CurveFamily {
    pub const fn partner_for(self, level: SecurityLevel) -> ClassicalPartner {
        match (self, level) {
            (Self::Ecp, SecurityLevel::L128) => ClassicalPartner::P256,
            (Self::Ecp, SecurityLevel::L192) => ClassicalPartner::P384,
            (Self::Ecp, SecurityLevel::L256) => ClassicalPartner::P521,
            (Self::Ecx, SecurityLevel::L128) => ClassicalPartner::X25519,
            (Self::Ecx, _) => ClassicalPartner::X448,
        }
    }
}

/// Which of a key-exchange row's three codepoints a record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupVariant {
    Pure,
    Hybrid(CurveFamily),
}

impl GroupVariant {
    /// Emission order within a row.
    pub const ALL: [GroupVariant; 3] = [
        GroupVariant::Pure,
        GroupVariant::Hybrid(CurveFamily::Ecp),
        GroupVariant::Hybrid(CurveFamily::Ecx),
    ];
}

fn hybrid_name(partner: Option<ClassicalPartner>, base: &'static str) -> Cow<'static, str> {
    match partner {
        None => Cow::Borrowed(base),
        Some(p) => Cow::Owned(format!("{}_{}", p.prefix(), base)),
    }
}

/// One base key-encapsulation algorithm and its hybrid codepoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyExchangeDescriptor {
    pub name: &'static str,
    /// Cargo feature that links this algorithm in.
    pub feature: &'static str,
    pub enabled: bool,
    pub pure_group_id: u32,
    /// Hybrid with the ECP family, [`ABSENT`] when not offered.
    pub hybrid_group_id_ecp: u32,
    /// Hybrid with the ECX family, [`ABSENT`] when not offered.
    pub hybrid_group_id_ecx: u32,
    pub security: SecurityLevel,
    pub tls: VersionRange,
    pub dtls: VersionRange,
    pub is_kem: bool,
}

impl KeyExchangeDescriptor {
    pub const fn new(
        name: &'static str,
        feature: &'static str,
        enabled: bool,
        ids: [u32; 3],
        security: SecurityLevel,
    ) -> Self {
        Self {
            name,
            feature,
            enabled,
            pure_group_id: ids[0],
            hybrid_group_id_ecp: ids[1],
            hybrid_group_id_ecx: ids[2],
            security,
            tls: VersionRange::TLS13_ONWARDS,
            dtls: VersionRange::UNSUPPORTED,
            is_kem: true,
        }
    }

    pub fn group_id(&self, variant: GroupVariant) -> u32 {
        match variant {
            GroupVariant::Pure => self.pure_group_id,
            GroupVariant::Hybrid(CurveFamily::Ecp) => self.hybrid_group_id_ecp,
            GroupVariant::Hybrid(CurveFamily::Ecx) => self.hybrid_group_id_ecx,
        }
    }

    pub(crate) fn group_id_mut(&mut self, variant: GroupVariant) -> &mut u32 {
        match variant {
            GroupVariant::Pure => &mut self.pure_group_id,
            GroupVariant::Hybrid(CurveFamily::Ecp) => &mut self.hybrid_group_id_ecp,
            GroupVariant::Hybrid(CurveFamily::Ecx) => &mut self.hybrid_group_id_ecx,
        }
    }

    /// The pure variant is always offered; hybrids only with a codepoint.
    pub fn offers(&self, variant: GroupVariant) -> bool {
        match variant {
            GroupVariant::Pure => true,
            GroupVariant::Hybrid(_) => self.group_id(variant) != ABSENT,
        }
    }

    /// Offered variants in emission order.
    pub fn variants(&self) -> impl Iterator<Item = GroupVariant> + '_ {
        GroupVariant::ALL.into_iter().filter(move |v| self.offers(*v))
    }

    pub fn partner(&self, variant: GroupVariant) -> Option<ClassicalPartner> {
        match variant {
            GroupVariant::Pure => None,
            GroupVariant::Hybrid(family) => Some(family.partner_for(self.security)),
        }
    }

    /// Display, internal and algorithm name of a variant (all three coincide).
    pub fn variant_name(&self, variant: GroupVariant) -> Cow<'static, str> {
        hybrid_name(self.partner(variant), self.name)
    }
}

/// How a signature variant is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SigVariant {
    Pure,
    /// Co-signed with the ECP curve of the row's tier.
    Curve,
    /// Co-signed with RSA-3072; only offered at 128 bits.
    Rsa,
}

/// One signature algorithm variant. Unlike key exchange, every hybrid has its
/// own row because it carries its own codepoint and object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureDescriptor {
    pub base: &'static str,
    pub variant: SigVariant,
    pub feature: &'static str,
    pub enabled: bool,
    pub oid: &'static str,
    pub codepoint: u32,
    pub security: SecurityLevel,
    pub tls: VersionRange,
}

impl SignatureDescriptor {
    pub const fn new(
        base: &'static str,
        variant: SigVariant,
        feature: &'static str,
        enabled: bool,
        codepoint: u32,
        oid: &'static str,
        security: SecurityLevel,
    ) -> Self {
        Self {
            base,
            variant,
            feature,
            enabled,
            oid,
            codepoint,
            security,
            tls: VersionRange::TLS13_ONWARDS,
        }
    }

    pub fn partner(&self) -> Option<ClassicalPartner> {
        match self.variant {
            SigVariant::Pure => None,
            SigVariant::Curve => Some(CurveFamily::Ecp.partner_for(self.security)),
            SigVariant::Rsa => Some(ClassicalPartner::Rsa3072),
        }
    }

    pub fn name(&self) -> Cow<'static, str> {
        hybrid_name(self.partner(), self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_tiering() {
        assert_eq!(CurveFamily::Ecp.partner_for(SecurityLevel::L128), ClassicalPartner::P256);
        assert_eq!(CurveFamily::Ecp.partner_for(SecurityLevel::L192), ClassicalPartner::P384);
        assert_eq!(CurveFamily::Ecp.partner_for(SecurityLevel::L256), ClassicalPartner::P521);
        assert_eq!(CurveFamily::Ecx.partner_for(SecurityLevel::L128), ClassicalPartner::X25519);
        assert_eq!(CurveFamily::Ecx.partner_for(SecurityLevel::L192), ClassicalPartner::X448);
        assert_eq!(CurveFamily::Ecx.partner_for(SecurityLevel::L256), ClassicalPartner::X448);
    }

    #[test]
    fn absent_hybrid_is_not_offered() {
        let row = KeyExchangeDescriptor::new("kyber1024", "kyber-1024", true, [0x023D, 0x2F3D, ABSENT], SecurityLevel::L256);
        let names: Vec<_> = row.variants().map(|v| row.variant_name(v).into_owned()).collect();
        assert_eq!(names, ["kyber1024", "p521_kyber1024"]);
    }

    #[test]
    fn dtls_versions_rank_by_age() {
        let range = VersionRange {
            min: VersionBound::Version(ProtocolVersion::Dtls1_0),
            max: VersionBound::Version(ProtocolVersion::Dtls1_2),
        };
        assert!(range.is_monotonic());
        let inverted = VersionRange { min: range.max, max: range.min };
        assert!(!inverted.is_monotonic());
        let mixed = VersionRange {
            min: VersionBound::Version(ProtocolVersion::Tls1_2),
            max: VersionBound::Version(ProtocolVersion::Dtls1_2),
        };
        assert!(!mixed.is_monotonic());
        assert!(VersionRange::TLS13_ONWARDS.is_monotonic());
    }

    #[test]
    fn wire_sentinels() {
        assert_eq!(VersionBound::Unsupported.wire(), -1);
        assert_eq!(VersionBound::Unbounded.wire(), 0);
        assert_eq!(VersionBound::Version(ProtocolVersion::Tls1_3).wire(), 0x0304);
    }

    #[test]
    fn signature_names() {
        let sig = SignatureDescriptor::new("dilithium3", SigVariant::Curve, "dilithium-3", true, 0xfea4, "1.3.9999.2.7.3", SecurityLevel::L192);
        assert_eq!(sig.name(), "p384_dilithium3");
        let rsa = SignatureDescriptor::new("falcon512", SigVariant::Rsa, "falcon-512", true, 0xfeb0, "1.3.9999.3.8", SecurityLevel::L128);
        assert_eq!(rsa.name(), "rsa3072_falcon512");
    }
}
