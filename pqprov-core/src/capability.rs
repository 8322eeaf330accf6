//! Capability enumeration.
//!
//! The TLS stack asks for a capability class by name and receives one
//! parameter set per offered record through a callback. Class names match
//! case-insensitively. The callback returns `false` to reject a record, which
//! stops enumeration and makes the whole query fail.

use crate::params::ParamSet;
use crate::registry::Registry;
use std::fmt;
use tracing::{debug, trace};

pub const TLS_GROUP: &str = "TLS-GROUP";
pub const TLS_SIGALG: &str = "TLS-SIGALG";

/// The capability classes this provider answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityClass {
    TlsGroup,
    TlsSigAlg,
}

impl CapabilityClass {
    pub const ALL: [CapabilityClass; 2] = [Self::TlsGroup, Self::TlsSigAlg];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str().eq_ignore_ascii_case(name))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TlsGroup => TLS_GROUP,
            Self::TlsSigAlg => TLS_SIGALG,
        }
    }
}

impl fmt::Display for CapabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter sets for one class, in emission order.
pub fn capability_params(registry: &Registry, class: CapabilityClass) -> Vec<ParamSet> {
    match class {
        CapabilityClass::TlsGroup => registry.groups().map(|g| g.to_params()).collect(),
        CapabilityClass::TlsSigAlg => registry.sigalgs().map(|s| s.to_params()).collect(),
    }
}

/// Feed every record of `capability` to `cb`.
///
/// Returns `true` once all records were accepted. Returns `false` without
/// invoking `cb` for unknown classes, and `false` as soon as `cb` rejects a
/// record; later records are not delivered.
pub fn get_capabilities<F>(registry: &Registry, capability: &str, mut cb: F) -> bool
where
    F: FnMut(&ParamSet) -> bool,
{
    let Some(class) = CapabilityClass::parse(capability) else {
        debug!(capability, "unknown capability class");
        return false;
    };

    let mut delivered = 0usize;
    let accepted = match class {
        CapabilityClass::TlsGroup => registry.groups().all(|g| {
            trace!(group = %g.group_name(), id = g.group_id(), "offering group");
            delivered += 1;
            cb(&g.to_params())
        }),
        CapabilityClass::TlsSigAlg => registry.sigalgs().all(|s| {
            trace!(sigalg = %s.name(), code_point = s.code_point(), "offering sigalg");
            delivered += 1;
            cb(&s.to_params())
        }),
    };

    if !accepted {
        debug!(%class, delivered, "capability callback rejected a record");
    }
    accepted
}

/// Variant of [`get_capabilities`] for callbacks that carry an explicit
/// argument, in the style of C provider APIs.
pub fn get_capabilities_with_arg<A, F>(registry: &Registry, capability: &str, cb: F, arg: &mut A) -> bool
where
    F: Fn(&ParamSet, &mut A) -> bool,
{
    get_capabilities(registry, capability, |params| cb(params, arg))
}
