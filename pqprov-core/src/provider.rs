//! Provider context.
//!
//! A [`Provider`] is built once at load time: the catalog is copied, codepoint
//! overrides from the configuration file and then from the environment are
//! applied, and the result is frozen. Afterwards every query is read-only and
//! may run on any thread.

use crate::capability;
use crate::codepoint::{override_keys, CodepointSource, OverrideReport, ProcessEnv};
use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::params::ParamSet;
use crate::registry::{Registry, RegistryBuilder};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{info, warn};

static GLOBAL: OnceCell<Provider> = OnceCell::new();

#[derive(Debug)]
struct Inner {
    name: String,
    registry: Registry,
    overrides: OverrideReport,
}

#[derive(Debug, Clone)]
pub struct Provider {
    inner: Arc<Inner>,
}

impl Provider {
    /// Build a provider from `config`, consulting `env` for `OQS_CODEPOINT_*`.
    pub fn init(config: &ProviderConfig, env: &dyn CodepointSource) -> Result<Self> {
        Self::init_with(RegistryBuilder::from_catalog(), config, env)
    }

    /// Like [`Provider::init`] but starting from caller-supplied tables.
    pub fn init_with(mut builder: RegistryBuilder, config: &ProviderConfig, env: &dyn CodepointSource) -> Result<Self> {
        config.validate()?;

        let from_file = config.codepoint_overrides();
        if !from_file.is_empty() {
            let known = override_keys(&builder);
            for key in from_file.keys().filter(|k| !known.contains(k)) {
                warn!(variable = %key, "configured codepoint does not match any offered algorithm");
            }
        }

        let mut overrides = builder.apply_overrides(&from_file, config.override_policy)?;
        overrides.merge(builder.apply_overrides(env, config.override_policy)?);
        let registry = builder.freeze()?;

        info!(
            provider = %config.provider,
            groups = registry.groups().count(),
            sigalgs = registry.sigalgs().count(),
            overrides = overrides.applied.len(),
            "provider initialized"
        );
        Ok(Self { inner: Arc::new(Inner { name: config.provider.clone(), registry, overrides }) })
    }

    /// Build from the environment alone: `PQPROV_*` settings and the live
    /// `OQS_CODEPOINT_*` variables.
    pub fn from_env() -> Result<Self> {
        let config = ProviderConfig::from_env()?;
        Self::init(&config, &ProcessEnv)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Overrides applied (or skipped) while this provider was built.
    pub fn overrides(&self) -> &OverrideReport {
        &self.inner.overrides
    }

    pub fn get_capabilities<F>(&self, capability: &str, cb: F) -> bool
    where
        F: FnMut(&ParamSet) -> bool,
    {
        capability::get_capabilities(&self.inner.registry, capability, cb)
    }
}

/// Make `provider` the process-wide instance.
///
/// # Errors
///
/// [`Error::AlreadyInitialized`] if a provider was installed before.
pub fn install_global(provider: Provider) -> Result<&'static Provider> {
    GLOBAL.set(provider).map_err(|_| Error::AlreadyInitialized)?;
    GLOBAL.get().ok_or(Error::AlreadyInitialized)
}

pub fn global() -> Option<&'static Provider> {
    GLOBAL.get()
}

/// Query the process-wide provider. Fails when none is installed.
pub fn get_capabilities<F>(capability: &str, cb: F) -> bool
where
    F: FnMut(&ParamSet) -> bool,
{
    match GLOBAL.get() {
        Some(p) => p.get_capabilities(capability, cb),
        None => {
            warn!(capability, "capability query before provider initialization");
            false
        }
    }
}
