//! Codepoint overrides.
//!
//! Deployments can retarget any offered group or signature codepoint without
//! rebuilding by setting `OQS_CODEPOINT_<NAME>`, where `<NAME>` is the
//! upper-cased variant name (`OQS_CODEPOINT_KYBER512`,
//! `OQS_CODEPOINT_P256_KYBER512`, `OQS_CODEPOINT_RSA3072_DILITHIUM2`, ...).
//!
//! Overrides are applied to a [`RegistryBuilder`] before it is frozen. Values
//! are decimal (or `0x`-prefixed hexadecimal) integers in `1..=65535`; what
//! happens to anything else is decided by the [`OverridePolicy`].

use crate::error::{Error, Result};
use crate::registry::RegistryBuilder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::str::FromStr;
use tracing::{debug, info, warn};

pub const ENV_PREFIX: &str = "OQS_CODEPOINT_";

/// Largest codepoint a TLS extension can carry.
pub const MAX_CODEPOINT: u32 = 0xFFFF;

/// Somewhere override values can be looked up by variable name.
pub trait CodepointSource {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl CodepointSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        // Non-UTF-8 values are kept lossy so they surface as parse errors.
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }
}

impl<S: BuildHasher> CodepointSource for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl CodepointSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: CodepointSource + ?Sized> CodepointSource for &T {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

/// What to do with an override value that cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverridePolicy {
    /// Abort initialization.
    #[default]
    Strict,
    /// Log a warning and keep the slot's previous codepoint.
    Lenient,
}

impl FromStr for OverridePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(Error::config(format!("invalid override_policy: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedOverride {
    pub key: String,
    pub old: u32,
    pub new: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedOverride {
    pub key: String,
    pub value: String,
    pub reason: String,
}

/// Outcome of one or more override passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverrideReport {
    pub applied: Vec<AppliedOverride>,
    pub rejected: Vec<RejectedOverride>,
}

impl OverrideReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.rejected.is_empty()
    }

    pub fn merge(&mut self, other: OverrideReport) {
        self.applied.extend(other.applied);
        self.rejected.extend(other.rejected);
    }
}

/// Variable name controlling the codepoint of `variant_name`.
pub fn override_key(variant_name: &str) -> String {
    format!("{ENV_PREFIX}{}", variant_name.to_ascii_uppercase())
}

/// Parse an override value.
///
/// # Errors
///
/// Returns a human-readable reason for malformed or out-of-range input. `0`
/// is rejected because it marks an absent hybrid combination.
pub fn parse_codepoint(raw: &str) -> core::result::Result<u32, String> {
    let s = raw.trim();
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    // `from_str_radix` tolerates a leading `+`; only bare digits are accepted.
    if digits.starts_with(['+', '-']) {
        return Err("sign not allowed".to_owned());
    }
    let value = u32::from_str_radix(digits, radix).map_err(|e| format!("not an integer ({e})"))?;
    if value == 0 || value > MAX_CODEPOINT {
        return Err(format!("out of range 1..={MAX_CODEPOINT}"));
    }
    Ok(value)
}

/// Every override key the builder would consult, in slot order.
pub fn override_keys(builder: &RegistryBuilder) -> Vec<String> {
    builder
        .slots()
        .filter_map(|slot| builder.slot_name(slot))
        .map(|name| override_key(&name))
        .collect()
}

/// Apply every override found in `source` to the builder's offered slots.
///
/// Slots of disabled rows and absent hybrid slots are never consulted.
/// Applying the same source twice yields the same table.
pub fn apply_overrides(
    builder: &mut RegistryBuilder,
    source: &dyn CodepointSource,
    policy: OverridePolicy,
) -> Result<OverrideReport> {
    let mut report = OverrideReport::default();
    let slots: Vec<_> = builder.slots().collect();

    for slot in slots {
        let Some(name) = builder.slot_name(slot) else { continue };
        let key = override_key(&name);
        let Some(raw) = source.lookup(&key) else { continue };

        match parse_codepoint(&raw) {
            Ok(new) => {
                let old = builder.set_codepoint(slot, new).unwrap_or_default();
                if old != new {
                    info!(variable = %key, old, new, "codepoint override applied");
                } else {
                    debug!(variable = %key, codepoint = new, "codepoint override matches current value");
                }
                report.applied.push(AppliedOverride { key, old, new });
            }
            Err(reason) => match policy {
                OverridePolicy::Strict => {
                    return Err(Error::InvalidCodepoint { key, value: raw, reason });
                }
                OverridePolicy::Lenient => {
                    warn!(variable = %key, value = %raw, %reason, "ignoring codepoint override");
                    report.rejected.push(RejectedOverride { key, value: raw, reason });
                }
            },
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_codepoint("570"), Ok(570));
        assert_eq!(parse_codepoint(" 0x023A "), Ok(0x023A));
        assert_eq!(parse_codepoint("0XFFFF"), Ok(0xFFFF));
    }

    #[test]
    fn rejects_malformed_and_out_of_range() {
        assert!(parse_codepoint("").is_err());
        assert!(parse_codepoint("kyber").is_err());
        assert!(parse_codepoint("12abc").is_err());
        assert!(parse_codepoint("-1").is_err());
        assert!(parse_codepoint("0").is_err());
        assert!(parse_codepoint("65536").is_err());
        assert!(parse_codepoint("0x").is_err());
    }

    #[test]
    fn rejects_signed_values() {
        assert!(parse_codepoint("0x+23A").is_err());
        assert!(parse_codepoint("0X-1").is_err());
        assert!(parse_codepoint("+570").is_err());
        assert_eq!(parse_codepoint("+570"), Err("sign not allowed".to_owned()));
    }

    #[test]
    fn key_naming() {
        assert_eq!(override_key("kyber512"), "OQS_CODEPOINT_KYBER512");
        assert_eq!(override_key("x25519_kyber512"), "OQS_CODEPOINT_X25519_KYBER512");
        assert_eq!(override_key("p256_dilithium2_aes"), "OQS_CODEPOINT_P256_DILITHIUM2_AES");
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("Strict".parse::<OverridePolicy>().ok(), Some(OverridePolicy::Strict));
        assert_eq!("lenient".parse::<OverridePolicy>().ok(), Some(OverridePolicy::Lenient));
        assert!("silent".parse::<OverridePolicy>().is_err());
    }
}
