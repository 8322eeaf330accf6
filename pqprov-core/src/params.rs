//! Record shaping for the capability callbacks.
//!
//! Records are views over a descriptor row. Every field is computed on access
//! from the row, so the values a caller sees are always those of the frozen
//! registry the record was taken from. [`ParamSet`] is the flattened,
//! wire-named form handed to capability callbacks.

use crate::descriptor::{
    GroupVariant, KeyExchangeDescriptor, SecurityLevel, SignatureDescriptor, VersionRange,
};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::borrow::Cow;

// Parameter names shared with the embedding TLS stack. Do not rename.
pub const TLS_GROUP_NAME: &str = "tls-group-name";
pub const TLS_GROUP_NAME_INTERNAL: &str = "tls-group-name-internal";
pub const TLS_GROUP_ALG: &str = "tls-group-alg";
pub const TLS_GROUP_ID: &str = "tls-group-id";
pub const TLS_GROUP_SECURITY_BITS: &str = "tls-group-sec-bits";
pub const TLS_GROUP_IS_KEM: &str = "tls-group-is-kem";
pub const TLS_MIN_TLS: &str = "tls-min-tls";
pub const TLS_MAX_TLS: &str = "tls-max-tls";
pub const TLS_MIN_DTLS: &str = "tls-min-dtls";
pub const TLS_MAX_DTLS: &str = "tls-max-dtls";
pub const TLS_SIGALG_IANA_NAME: &str = "tls-sigalg-iana-name";
pub const TLS_SIGALG_NAME: &str = "tls-sigalg-name";
pub const TLS_SIGALG_OID: &str = "tls-sigalg-oid";
pub const TLS_SIGALG_CODE_POINT: &str = "tls-sigalg-code-point";
pub const TLS_SIGALG_SECURITY_BITS: &str = "tls-sigalg-sec-bits";

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Utf8(String),
    UInt(u32),
    Int(i32),
}

/// A named parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: &'static str,
    pub value: ParamValue,
}

/// Ordered parameter list describing one capability record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet {
    params: Vec<Param>,
}

impl ParamSet {
    fn with_capacity(n: usize) -> Self {
        Self { params: Vec::with_capacity(n) }
    }

    fn utf8(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push(Param { key, value: ParamValue::Utf8(value.into()) });
        self
    }

    fn uint(mut self, key: &'static str, value: u32) -> Self {
        self.params.push(Param { key, value: ParamValue::UInt(value) });
        self
    }

    fn int(mut self, key: &'static str, value: i32) -> Self {
        self.params.push(Param { key, value: ParamValue::Int(value) });
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.iter().find(|p| p.key == key).map(|p| &p.value)
    }

    pub fn get_utf8(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ParamValue::Utf8(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_uint(&self, key: &str) -> Option<u32> {
        match self.get(key)? {
            ParamValue::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.get(key)? {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a ParamSet {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for ParamSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for p in &self.params {
            map.serialize_entry(p.key, &p.value)?;
        }
        map.end()
    }
}

/// A key-exchange group as offered to the TLS stack.
#[derive(Debug, Clone, Copy)]
pub struct GroupRecord<'a> {
    row: &'a KeyExchangeDescriptor,
    variant: GroupVariant,
}

impl<'a> GroupRecord<'a> {
    pub(crate) fn new(row: &'a KeyExchangeDescriptor, variant: GroupVariant) -> Self {
        Self { row, variant }
    }

    pub fn descriptor(&self) -> &'a KeyExchangeDescriptor {
        self.row
    }

    pub fn variant(&self) -> GroupVariant {
        self.variant
    }

    pub fn group_name(&self) -> Cow<'static, str> {
        self.row.variant_name(self.variant)
    }

    pub fn name_internal(&self) -> Cow<'static, str> {
        self.row.variant_name(self.variant)
    }

    /// Name of the underlying (possibly hybrid) KEM.
    pub fn algorithm(&self) -> Cow<'static, str> {
        self.row.variant_name(self.variant)
    }

    pub fn group_id(&self) -> u32 {
        self.row.group_id(self.variant)
    }

    pub fn security(&self) -> SecurityLevel {
        self.row.security
    }

    pub fn tls(&self) -> VersionRange {
        self.row.tls
    }

    pub fn dtls(&self) -> VersionRange {
        self.row.dtls
    }

    pub fn is_kem(&self) -> bool {
        self.row.is_kem
    }

    pub fn to_params(&self) -> ParamSet {
        ParamSet::with_capacity(10)
            .utf8(TLS_GROUP_NAME, self.group_name())
            .utf8(TLS_GROUP_NAME_INTERNAL, self.name_internal())
            .utf8(TLS_GROUP_ALG, self.algorithm())
            .uint(TLS_GROUP_ID, self.group_id())
            .uint(TLS_GROUP_SECURITY_BITS, self.security().bits())
            .int(TLS_MIN_TLS, self.tls().min.wire())
            .int(TLS_MAX_TLS, self.tls().max.wire())
            .int(TLS_MIN_DTLS, self.dtls().min.wire())
            .int(TLS_MAX_DTLS, self.dtls().max.wire())
            .int(TLS_GROUP_IS_KEM, i32::from(self.is_kem()))
    }
}

/// A signature algorithm as offered to the TLS stack.
#[derive(Debug, Clone, Copy)]
pub struct SigAlgRecord<'a> {
    row: &'a SignatureDescriptor,
}

impl<'a> SigAlgRecord<'a> {
    pub(crate) fn new(row: &'a SignatureDescriptor) -> Self {
        Self { row }
    }

    pub fn descriptor(&self) -> &'a SignatureDescriptor {
        self.row
    }

    /// IANA-style name; identical to [`Self::name`] for these algorithms.
    pub fn iana_name(&self) -> Cow<'static, str> {
        self.row.name()
    }

    pub fn name(&self) -> Cow<'static, str> {
        self.row.name()
    }

    pub fn oid(&self) -> &'static str {
        self.row.oid
    }

    pub fn code_point(&self) -> u32 {
        self.row.codepoint
    }

    pub fn security(&self) -> SecurityLevel {
        self.row.security
    }

    pub fn tls(&self) -> VersionRange {
        self.row.tls
    }

    pub fn to_params(&self) -> ParamSet {
        ParamSet::with_capacity(7)
            .utf8(TLS_SIGALG_IANA_NAME, self.iana_name())
            .utf8(TLS_SIGALG_NAME, self.name())
            .utf8(TLS_SIGALG_OID, self.oid())
            .uint(TLS_SIGALG_CODE_POINT, self.code_point())
            .uint(TLS_SIGALG_SECURITY_BITS, self.security().bits())
            .int(TLS_MIN_TLS, self.tls().min.wire())
            .int(TLS_MAX_TLS, self.tls().max.wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CurveFamily, SecurityLevel, SigVariant};

    #[test]
    fn hybrid_group_params() {
        let row = KeyExchangeDescriptor::new("kyber768", "kyber-768", true, [0x023C, 0x2F3C, 0x2F90], SecurityLevel::L192);
        let rec = GroupRecord::new(&row, GroupVariant::Hybrid(CurveFamily::Ecx));
        assert!(std::ptr::eq(rec.descriptor(), &row));
        assert_eq!(rec.tls(), row.tls);
        assert_eq!(rec.dtls(), VersionRange::UNSUPPORTED);
        let p = rec.to_params();
        assert_eq!(p.len(), 10);
        assert_eq!(p.get_utf8(TLS_GROUP_NAME), Some("x448_kyber768"));
        assert_eq!(p.get_utf8(TLS_GROUP_NAME_INTERNAL), Some("x448_kyber768"));
        assert_eq!(p.get_utf8(TLS_GROUP_ALG), Some("x448_kyber768"));
        assert_eq!(p.get_uint(TLS_GROUP_ID), Some(0x2F90));
        assert_eq!(p.get_uint(TLS_GROUP_SECURITY_BITS), Some(192));
        assert_eq!(p.get_int(TLS_MIN_TLS), Some(0x0304));
        assert_eq!(p.get_int(TLS_MAX_TLS), Some(0));
        assert_eq!(p.get_int(TLS_MIN_DTLS), Some(-1));
        assert_eq!(p.get_int(TLS_MAX_DTLS), Some(-1));
        assert_eq!(p.get_int(TLS_GROUP_IS_KEM), Some(1));
    }

    #[test]
    fn sigalg_params() {
        let row = SignatureDescriptor::new("dilithium2", SigVariant::Rsa, "dilithium-2", true, 0xfea2, "1.3.9999.2.7.2", SecurityLevel::L128);
        let rec = SigAlgRecord::new(&row);
        assert_eq!(rec.descriptor().variant, SigVariant::Rsa);
        assert_eq!(rec.tls(), row.tls);
        let p = rec.to_params();
        let keys: Vec<_> = p.iter().map(|p| p.key).collect();
        assert_eq!(
            keys,
            [
                TLS_SIGALG_IANA_NAME,
                TLS_SIGALG_NAME,
                TLS_SIGALG_OID,
                TLS_SIGALG_CODE_POINT,
                TLS_SIGALG_SECURITY_BITS,
                TLS_MIN_TLS,
                TLS_MAX_TLS
            ]
        );
        assert_eq!(p.get_utf8(TLS_SIGALG_NAME), Some("rsa3072_dilithium2"));
        assert_eq!(p.get_uint(TLS_SIGALG_CODE_POINT), Some(0xfea2));
        // wrong type is not coerced
        assert_eq!(p.get_int(TLS_SIGALG_CODE_POINT), None);
    }
}
