#![forbid(unsafe_code)]

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use console::style;
use pqprov_core::{CapabilityClass, ProcessEnv, Provider, ProviderConfig, TLS_GROUP, TLS_SIGALG};
use pqprov_crypto::selftest::{run_suite, Outcome};
use pqprov_crypto::KemFactory;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pqprov-cli", version, about = "Post-quantum TLS provider tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	/// Round-trip every enabled key-exchange group through its KEM backend
	TestKems {
		/// Provider module name; must match `provider` in the config file
		module: String,
		/// Provider configuration (TOML)
		config: PathBuf,
	},
	/// List the TLS-GROUP records the provider would advertise
	ListGroups {
		#[arg(long)] config: Option<PathBuf>,
		/// Emit the raw parameter sets as JSON
		#[arg(long)] json: bool,
	},
	/// List the TLS-SIGALG records the provider would advertise
	ListSigalgs {
		#[arg(long)] config: Option<PathBuf>,
		#[arg(long)] json: bool,
	},
}

fn init_tracing(log_level: &str) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
	// Diagnostics go to stderr so listings stay machine-readable.
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init().ok();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ProviderConfig> {
	match path {
		Some(p) => ProviderConfig::load_from_file(p).with_context(|| format!("loading {}", p.display())),
		None => ProviderConfig::from_env().context("reading PQPROV_* environment"),
	}
}

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();
	match cli.command {
		Commands::TestKems { module, config } => test_kems(&module, &config),
		Commands::ListGroups { config, json } => list(CapabilityClass::TlsGroup, config.as_deref(), json),
		Commands::ListSigalgs { config, json } => list(CapabilityClass::TlsSigAlg, config.as_deref(), json),
	}
}

fn test_kems(module: &str, config_path: &Path) -> anyhow::Result<ExitCode> {
	let cfg = load_config(Some(config_path))?;
	init_tracing(&cfg.log_level);
	if cfg.provider != module {
		bail!("provider module {module:?} is not configured in {} (found {:?})", config_path.display(), cfg.provider);
	}

	let provider = Provider::init(&cfg, &ProcessEnv)?;
	let names: Vec<String> = provider.registry().groups().map(|g| g.algorithm().into_owned()).collect();
	tracing::info!(module, groups = names.len(), "running kem self-test");
	let report = run_suite(&names, &KemFactory::new());

	for (name, outcome) in &report.results {
		match outcome {
			Outcome::Passed(_) => println!("{} {name}", style("PASS").green()),
			Outcome::Skipped => println!("{} {name} (no backend linked)", style("SKIP").yellow()),
			Outcome::Failed(why) => println!("{} {name}: {why}", style("FAIL").red().bold()),
		}
	}
	println!(
		"{} passed, {} skipped, {} failed",
		report.passed(),
		report.skipped(),
		report.failures()
	);

	Ok(if report.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn list(class: CapabilityClass, config_path: Option<&Path>, json: bool) -> anyhow::Result<ExitCode> {
	let cfg = load_config(config_path)?;
	init_tracing(&cfg.log_level);
	let provider = Provider::init(&cfg, &ProcessEnv)?;

	if json {
		let records = pqprov_core::capability::capability_params(provider.registry(), class);
		println!("{}", serde_json::to_string_pretty(&records)?);
		return Ok(ExitCode::SUCCESS);
	}

	let mut lines = Vec::new();
	let ok = match class {
		CapabilityClass::TlsGroup => provider.get_capabilities(TLS_GROUP, |p| {
			lines.push(format!(
				"{:#06x}  {:>3}  {}",
				p.get_uint("tls-group-id").unwrap_or_default(),
				p.get_uint("tls-group-sec-bits").unwrap_or_default(),
				p.get_utf8("tls-group-name").unwrap_or_default()
			));
			true
		}),
		CapabilityClass::TlsSigAlg => provider.get_capabilities(TLS_SIGALG, |p| {
			lines.push(format!(
				"{:#06x}  {:>3}  {:<32} {}",
				p.get_uint("tls-sigalg-code-point").unwrap_or_default(),
				p.get_uint("tls-sigalg-sec-bits").unwrap_or_default(),
				p.get_utf8("tls-sigalg-name").unwrap_or_default(),
				p.get_utf8("tls-sigalg-oid").unwrap_or_default()
			));
			true
		}),
	};
	if !ok {
		bail!("{class} enumeration failed");
	}
	for line in &lines {
		println!("{line}");
	}
	println!("{} {} records", style(lines.len()).bold(), class);
	Ok(ExitCode::SUCCESS)
}
