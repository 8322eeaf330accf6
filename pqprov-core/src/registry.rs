//! Mutable build phase and frozen read phase of the descriptor tables.
//!
//! A [`RegistryBuilder`] owns private copies of the catalog rows. Codepoint
//! overrides are applied to it in place; [`RegistryBuilder::freeze`] then
//! validates the tables and turns them into a shared, read-only [`Registry`].
//! Nothing can change a codepoint once a `Registry` exists.

use crate::catalog::{key_exchange_catalog, signature_catalog};
use crate::codepoint::{self, CodepointSource, OverridePolicy, OverrideReport};
use crate::descriptor::{
    GroupVariant, KeyExchangeDescriptor, SecurityLevel, SigVariant, SignatureDescriptor, VersionRange, ABSENT,
};
use crate::error::{Error, Result};
use crate::params::{GroupRecord, SigAlgRecord};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Addresses one writable codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodepointSlot {
    Group { row: usize, variant: GroupVariant },
    SigAlg { row: usize },
}

#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    groups: Vec<KeyExchangeDescriptor>,
    sigalgs: Vec<SignatureDescriptor>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::from_catalog()
    }
}

impl RegistryBuilder {
    /// Start from the built-in catalog.
    pub fn from_catalog() -> Self {
        Self::with_tables(key_exchange_catalog().to_vec(), signature_catalog().to_vec())
    }

    /// Start from caller-supplied rows (used by tests and embedders with
    /// their own algorithm lists).
    pub fn with_tables(groups: Vec<KeyExchangeDescriptor>, sigalgs: Vec<SignatureDescriptor>) -> Self {
        Self { groups, sigalgs }
    }

    pub fn group(&self, row: usize) -> Option<&KeyExchangeDescriptor> {
        self.groups.get(row)
    }

    pub fn sigalg(&self, row: usize) -> Option<&SignatureDescriptor> {
        self.sigalgs.get(row)
    }

    /// Codepoint slots of enabled rows that are offered, groups first.
    pub fn slots(&self) -> impl Iterator<Item = CodepointSlot> + '_ {
        let groups = self.groups.iter().enumerate().filter(|(_, r)| r.enabled).flat_map(|(row, r)| {
            r.variants().map(move |variant| CodepointSlot::Group { row, variant })
        });
        let sigalgs = self
            .sigalgs
            .iter()
            .enumerate()
            .filter(|(_, r)| r.enabled)
            .map(|(row, _)| CodepointSlot::SigAlg { row });
        groups.chain(sigalgs)
    }

    /// Variant name behind a slot.
    pub fn slot_name(&self, slot: CodepointSlot) -> Option<Cow<'static, str>> {
        match slot {
            CodepointSlot::Group { row, variant } => self.groups.get(row).map(|r| r.variant_name(variant)),
            CodepointSlot::SigAlg { row } => self.sigalgs.get(row).map(|r| r.name()),
        }
    }

    pub fn codepoint(&self, slot: CodepointSlot) -> Option<u32> {
        match slot {
            CodepointSlot::Group { row, variant } => self.groups.get(row).map(|r| r.group_id(variant)),
            CodepointSlot::SigAlg { row } => self.sigalgs.get(row).map(|r| r.codepoint),
        }
    }

    /// Overwrite an offered codepoint, returning the previous value.
    ///
    /// Returns `None` and changes nothing if the slot does not exist, belongs
    /// to a disabled row, is not offered, or `value` is [`ABSENT`]: overrides can retarget a variant but
    /// never add or remove one.
    pub fn set_codepoint(&mut self, slot: CodepointSlot, value: u32) -> Option<u32> {
        if value == ABSENT {
            return None;
        }
        match slot {
            CodepointSlot::Group { row, variant } => {
                let r = self.groups.get_mut(row).filter(|r| r.enabled)?;
                if !r.offers(variant) {
                    return None;
                }
                let id = r.group_id_mut(variant);
                Some(std::mem::replace(id, value))
            }
            CodepointSlot::SigAlg { row } => {
                let r = self.sigalgs.get_mut(row).filter(|r| r.enabled)?;
                Some(std::mem::replace(&mut r.codepoint, value))
            }
        }
    }

    /// Consult `source` for every offered slot. See [`codepoint::apply_overrides`].
    pub fn apply_overrides(&mut self, source: &dyn CodepointSource, policy: OverridePolicy) -> Result<OverrideReport> {
        codepoint::apply_overrides(self, source, policy)
    }

    /// Validate the tables and make them read-only.
    ///
    /// # Errors
    ///
    /// Fails if an enabled row has an inverted version range, a zero base
    /// codepoint, or an RSA variant above 128 bits, or if two emitted records of
    /// the same class share a codepoint.
    pub fn freeze(self) -> Result<Registry> {
        for row in self.groups.iter().filter(|r| r.enabled) {
            check_versions(row.name, &row.tls, &row.dtls)?;
            if row.pure_group_id == ABSENT {
                return Err(Error::invalid_descriptor(row.name, "pure group id must be non-zero"));
            }
        }
        for row in self.sigalgs.iter().filter(|r| r.enabled) {
            check_versions(&row.name(), &row.tls, &VersionRange::UNSUPPORTED)?;
            if row.codepoint == ABSENT {
                return Err(Error::invalid_descriptor(row.name(), "code point must be non-zero"));
            }
            if row.variant == SigVariant::Rsa && row.security != SecurityLevel::L128 {
                return Err(Error::invalid_descriptor(row.name(), "rsa3072 hybrids are only offered at 128 bits"));
            }
        }

        let registry = Registry { tables: Arc::new(Tables { groups: self.groups, sigalgs: self.sigalgs }) };
        check_unique("group", registry.groups().map(|g| (g.group_id(), g.group_name())))?;
        check_unique("sigalg", registry.sigalgs().map(|s| (s.code_point(), s.name())))?;

        debug!(groups = registry.groups().count(), sigalgs = registry.sigalgs().count(), "registry frozen");
        Ok(registry)
    }
}

fn check_versions(name: &str, tls: &VersionRange, dtls: &VersionRange) -> Result<()> {
    if !tls.is_monotonic() {
        return Err(Error::invalid_descriptor(name, "tls version range is inverted"));
    }
    if !dtls.is_monotonic() {
        return Err(Error::invalid_descriptor(name, "dtls version range is inverted"));
    }
    Ok(())
}

fn check_unique<I>(class: &'static str, records: I) -> Result<()>
where
    I: Iterator<Item = (u32, Cow<'static, str>)>,
{
    let mut seen: HashMap<u32, Cow<'static, str>> = HashMap::new();
    for (codepoint, name) in records {
        if let Some(first) = seen.get(&codepoint) {
            return Err(Error::DuplicateCodepoint {
                class,
                first: first.to_string(),
                second: name.into_owned(),
                codepoint,
            });
        }
        seen.insert(codepoint, name);
    }
    Ok(())
}

#[derive(Debug)]
struct Tables {
    groups: Vec<KeyExchangeDescriptor>,
    sigalgs: Vec<SignatureDescriptor>,
}

/// Frozen descriptor tables. Cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Registry {
    tables: Arc<Tables>,
}

impl Registry {
    /// Every offered group variant of every enabled row, in table order.
    pub fn groups(&self) -> impl Iterator<Item = GroupRecord<'_>> + '_ {
        self.tables
            .groups
            .iter()
            .filter(|r| r.enabled)
            .flat_map(|r| r.variants().map(move |v| GroupRecord::new(r, v)))
    }

    /// Every enabled signature variant, in table order.
    pub fn sigalgs(&self) -> impl Iterator<Item = SigAlgRecord<'_>> + '_ {
        self.tables.sigalgs.iter().filter(|r| r.enabled).map(SigAlgRecord::new)
    }

    /// All key-exchange rows, disabled ones included.
    pub fn group_rows(&self) -> &[KeyExchangeDescriptor] {
        &self.tables.groups
    }

    pub fn sigalg_rows(&self) -> &[SignatureDescriptor] {
        &self.tables.sigalgs
    }

    pub fn find_group(&self, name: &str) -> Option<GroupRecord<'_>> {
        self.groups().find(|g| g.group_name().eq_ignore_ascii_case(name))
    }

    pub fn find_sigalg(&self, name: &str) -> Option<SigAlgRecord<'_>> {
        self.sigalgs().find(|s| s.name().eq_ignore_ascii_case(name))
    }
}
