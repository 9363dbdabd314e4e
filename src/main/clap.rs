//! Integration with `clap`

use std::path::PathBuf;

use buildvars_core::{Error, Result, config::ENV_CONFIG, version};
use clap::{Parser, ValueEnum};
use figment::{
	Figment, Profile,
	providers::{Format as _, Toml},
};

/// Commandline arguments
#[derive(Parser, Debug)]
#[clap(
	about,
	long_about = None,
	name = "buildvars",
	version = version::version(),
)]
pub(crate) struct Args {
	/// Path to the config TOML file (optional)
	#[arg(short, long, env = ENV_CONFIG)]
	pub(crate) config: Option<PathBuf>,

	/// Override a configuration variable using TOML 'key=value' syntax
	#[arg(long, short('O'))]
	pub(crate) option: Vec<String>,

	/// Directory the revision is queried in (default: current directory)
	#[arg(long)]
	pub(crate) repo_root: Option<PathBuf>,

	/// Milliseconds to wait for the version control query
	#[arg(long)]
	pub(crate) timeout_ms: Option<u64>,

	/// Use this revision instead of querying version control
	#[arg(long)]
	pub(crate) commit: Option<String>,

	/// Content of the NODE_ENV define
	#[arg(long)]
	pub(crate) node_env: Option<String>,

	/// Set the USE_SENTRY define to "1"
	#[arg(long)]
	pub(crate) use_sentry: bool,

	/// Output format
	#[arg(long, value_enum, default_value_t = Format::Json)]
	pub(crate) format: Format,

	/// Pretty-print JSON output
	#[arg(long)]
	pub(crate) pretty: bool,

	/// Log filter directive, e.g. "debug" (RUST_LOG takes precedence)
	#[arg(long)]
	pub(crate) log: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
	/// JSON object of define key to source text
	Json,
	/// KEY=value lines
	Env,
	/// The bare build identifier
	Version,
}

/// Parse commandline arguments into structured data
#[must_use]
pub(crate) fn parse() -> Args { Args::parse() }

/// Synthesize any command line options with configuration file options.
pub(crate) fn update(mut config: Figment, args: &Args) -> Result<Figment> {
	if let Some(repo_root) = &args.repo_root {
		config = config.merge(("repo_root", repo_root));
	}

	if let Some(timeout_ms) = args.timeout_ms {
		config = config.merge(("git_timeout_ms", timeout_ms));
	}

	if let Some(commit) = &args.commit {
		config = config.merge(("commit", commit));
	}

	if let Some(node_env) = &args.node_env {
		config = config.merge(("node_env", node_env));
	}

	if args.use_sentry {
		config = config.merge(("use_sentry", true));
	}

	if let Some(log) = &args.log {
		config = config.merge(("log", log));
	}

	// All other individual overrides can go last in case we have options which
	// set multiple conf items at once and the user still needs granular overrides.
	for option in &args.option {
		let (key, val) = option
			.split_once('=')
			.ok_or_else(|| Error::config(format!("missing '=' in -O/--option: {option:?}")))?;

		if key.trim().is_empty() {
			return Err(Error::config(format!("missing key in -O/--option: {option:?}")));
		}

		// tuples merged above are global-profile data, so options must be too
		config = config.merge(Toml::string(&format!("{key} = {val}")).profile(Profile::Global));
	}

	Ok(config)
}
