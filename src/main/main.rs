mod clap;

use std::{io::Write, process::ExitCode};

use buildvars_core::{Config, Result, log, version};
use buildvars_resolver::{DefineMap, VERSION, VersionResolver};

use crate::clap::{Args, Format};

/// Set by the build script; absent when built outside a checkout.
const BUILD_ID: Option<&str> = option_env!("BUILDVARS_BUILD_ID");

fn main() -> ExitCode {
	version::init(BUILD_ID);
	let args = clap::parse();

	match run(&args) {
		| Ok(()) => ExitCode::SUCCESS,
		| Err(e) => {
			eprintln!("{}: {e}", version::name());
			ExitCode::FAILURE
		},
	}
}

fn run(args: &Args) -> Result {
	let raw = clap::update(Config::load(args.config.as_deref())?, args)?;
	let config = Config::new(&raw)?;
	log::init(&config.log)?;

	let defines = VersionResolver::from_config(&config)?.resolve();
	let output = render(&defines, args.format, args.pretty)?;
	std::io::stdout().lock().write_all(output.as_bytes())?;

	Ok(())
}

fn render(defines: &DefineMap, format: Format, pretty: bool) -> Result<String> {
	let output = match format {
		| Format::Json => defines.to_json(pretty)? + "\n",
		| Format::Env => defines.to_env(),
		| Format::Version => defines
			.get(VERSION)
			.map_or_else(String::new, |version| format!("{}\n", version.value())),
	};

	Ok(output)
}
