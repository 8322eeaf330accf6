use crate::codepoint::{parse_codepoint, OverridePolicy, ENV_PREFIX};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::Path};

pub const DEFAULT_PROVIDER: &str = "pqprov";

/// A `[codepoints]` entry. Written either as a bare integer or as a string so
/// hexadecimal values can be kept readable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CodepointSetting {
	Int(i64),
	Text(String),
}

impl CodepointSetting {
	pub fn as_raw(&self) -> String {
		match self {
			Self::Int(v) => v.to_string(),
			Self::Text(s) => s.clone(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
	/// Module name the provider answers to.
	pub provider: String,
	pub log_level: String,
	pub override_policy: OverridePolicy,
	/// Codepoint overrides keyed like the environment (`OQS_CODEPOINT_*`).
	pub codepoints: BTreeMap<String, CodepointSetting>,
}

impl Default for ProviderConfig {
	fn default() -> Self {
		Self {
			provider: DEFAULT_PROVIDER.into(),
			log_level: "info".into(),
			override_policy: OverridePolicy::Strict,
			codepoints: BTreeMap::new(),
		}
	}
}

impl ProviderConfig {
	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
		let data = fs::read_to_string(path)?;
		Self::from_toml_str(&data)
	}

	pub fn from_toml_str(data: &str) -> Result<Self> {
		let cfg: Self = toml::from_str(data).map_err(|e| Error::config(format!("toml parse error: {e}")))?;
		cfg.validate()?;
		Ok(cfg)
	}

	pub fn from_env() -> Result<Self> {
		let mut cfg = Self::default();
		if let Ok(v) = std::env::var("PQPROV_PROVIDER") { cfg.provider = v; }
		if let Ok(v) = std::env::var("PQPROV_LOG_LEVEL") { cfg.log_level = v; }
		if let Ok(v) = std::env::var("PQPROV_OVERRIDE_POLICY") { cfg.override_policy = v.parse()?; }
		cfg.validate()?;
		Ok(cfg)
	}

	pub fn validate(&self) -> Result<()> {
		if self.provider.trim().is_empty() {
			return Err(Error::config("provider name must not be empty"));
		}
		let allowed = ["trace","debug","info","warn","error"];
		if !allowed.contains(&self.log_level.as_str()) {
			return Err(Error::config(format!("invalid log_level: {}", self.log_level)));
		}
		for (key, value) in &self.codepoints {
			if !key.starts_with(ENV_PREFIX) {
				return Err(Error::config(format!("codepoint key {key} must start with {ENV_PREFIX}")));
			}
			// Lenient mode defers bad values to the resolver, which logs and skips them.
			if self.override_policy == OverridePolicy::Strict {
				let raw = value.as_raw();
				parse_codepoint(&raw).map_err(|reason| Error::InvalidCodepoint { key: key.clone(), value: raw, reason })?;
			}
		}
		Ok(())
	}

	/// The `[codepoints]` table in the shape the override resolver consumes.
	pub fn codepoint_overrides(&self) -> BTreeMap<String, String> {
		self.codepoints.iter().map(|(k, v)| (k.clone(), v.as_raw())).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_validate() {
		let cfg = ProviderConfig::default();
		cfg.validate().unwrap();
		assert_eq!(cfg.provider, "pqprov");
		assert_eq!(cfg.override_policy, OverridePolicy::Strict);
	}

	#[test]
	fn parses_full_file() {
		let cfg = ProviderConfig::from_toml_str(
			r#"
provider = "oqsprovider"
log_level = "debug"
override_policy = "lenient"

[codepoints]
OQS_CODEPOINT_KYBER512 = "0x0300"
OQS_CODEPOINT_P256_KYBER512 = 12000
"#,
		)
		.unwrap();
		assert_eq!(cfg.provider, "oqsprovider");
		assert_eq!(cfg.override_policy, OverridePolicy::Lenient);
		let overrides = cfg.codepoint_overrides();
		assert_eq!(overrides.get("OQS_CODEPOINT_KYBER512").map(String::as_str), Some("0x0300"));
		assert_eq!(overrides.get("OQS_CODEPOINT_P256_KYBER512").map(String::as_str), Some("12000"));
	}

	#[test]
	fn rejects_bad_log_level() {
		let err = ProviderConfig::from_toml_str("log_level = \"loud\"").unwrap_err();
		assert!(err.to_string().contains("log_level"));
	}

	#[test]
	fn strict_rejects_bad_codepoint_value() {
		let err = ProviderConfig::from_toml_str("[codepoints]\nOQS_CODEPOINT_KYBER512 = 70000\n").unwrap_err();
		assert!(matches!(err, Error::InvalidCodepoint { .. }), "{err}");
	}

	#[test]
	fn lenient_defers_bad_codepoint_value() {
		let cfg = ProviderConfig::from_toml_str("override_policy = \"lenient\"\n[codepoints]\nOQS_CODEPOINT_KYBER512 = \"zero\"\n");
		assert!(cfg.is_ok());
	}

	#[test]
	fn rejects_foreign_keys() {
		let err = ProviderConfig::from_toml_str("[codepoints]\nKYBER512 = 1\n").unwrap_err();
		assert!(err.to_string().contains("OQS_CODEPOINT_"));
	}
}
