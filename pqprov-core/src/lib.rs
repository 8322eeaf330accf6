//! Post-quantum TLS capability registry.
//!
//! Advertises post-quantum and hybrid key-exchange groups and signature
//! algorithms to a TLS stack:
//! - `catalog`: built-in descriptor rows, one per base algorithm (groups) or
//!   per variant (signatures), gated by cargo features
//! - `codepoint`: `OQS_CODEPOINT_*` overrides applied before freezing
//! - `registry`: mutable builder and frozen, shareable registry
//! - `capability`: `TLS-GROUP` / `TLS-SIGALG` enumeration through a callback
//! - `provider`: load-time context and the process-wide instance
#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unreachable,
    clippy::todo,
    clippy::unimplemented
)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![allow(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod capability;
pub mod catalog;
pub mod codepoint;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod params;
pub mod provider;
pub mod registry;

pub use capability::{get_capabilities, get_capabilities_with_arg, CapabilityClass, TLS_GROUP, TLS_SIGALG};
pub use codepoint::{CodepointSource, OverridePolicy, OverrideReport, ProcessEnv};
pub use config::ProviderConfig;
pub use descriptor::{
    ClassicalPartner, CurveFamily, GroupVariant, KeyExchangeDescriptor, SecurityLevel, SigVariant,
    SignatureDescriptor,
};
pub use error::{Error, Result};
pub use params::{GroupRecord, ParamSet, ParamValue, SigAlgRecord};
pub use provider::Provider;
pub use registry::{CodepointSlot, Registry, RegistryBuilder};
