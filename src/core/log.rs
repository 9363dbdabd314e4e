//! Logging setup. Output goes to stderr so stdout carries only the rendered
//! defines.

use std::{
	io,
	sync::{Arc, Mutex, PoisonError},
};

use tracing_subscriber::{EnvFilter, fmt::MakeWriter};

use crate::{Error, Result};

/// Builds the filter from `RUST_LOG` when set, otherwise from the configured
/// directive.
pub fn filter(directive: &str) -> Result<EnvFilter> {
	let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
	filter_from(env.as_deref(), directive)
}

/// An invalid non-empty `env` directive is an error rather than being
/// skipped for the configured one.
fn filter_from(env: Option<&str>, directive: &str) -> Result<EnvFilter> {
	match env.filter(|env| !env.trim().is_empty()) {
		| Some(env) => EnvFilter::try_new(env).map_err(|e| {
			Error::config(format!("{} filter {env:?}: {e}", EnvFilter::DEFAULT_ENV))
		}),
		| None => EnvFilter::try_new(directive)
			.map_err(|e| Error::config(format!("log filter {directive:?}: {e}"))),
	}
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(directive: &str) -> Result {
	tracing_subscriber::fmt()
		.with_env_filter(filter(directive)?)
		.with_writer(io::stderr)
		.with_target(false)
		.without_time()
		.try_init()
		.map_err(|e| Error::config(format!("failed to install logger: {e}")))
}

/// Runs `f` with a thread-local subscriber at `directive` and returns what it
/// logged, one event per line, formatted like [`init`] minus colors.
pub fn capture<F: FnOnce()>(directive: &str, f: F) -> Result<String> {
	let buffer = Buffer::default();
	let subscriber = tracing_subscriber::fmt()
		.with_env_filter(filter_from(None, directive)?)
		.with_writer(buffer.clone())
		.with_target(false)
		.with_ansi(false)
		.without_time()
		.finish();

	tracing::subscriber::with_default(subscriber, f);

	let bytes = buffer
		.0
		.lock()
		.unwrap_or_else(PoisonError::into_inner)
		.clone();

	String::from_utf8(bytes).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.extend_from_slice(buf);

		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

impl<'a> MakeWriter<'a> for Buffer {
	type Writer = Self;

	fn make_writer(&'a self) -> Self::Writer { self.clone() }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_filter() {
		assert!(filter_from(None, "info").is_ok(), "plain level parses");
		assert!(filter_from(None, "buildvars_resolver=debug,warn").is_ok(), "targets parse");
		assert!(filter_from(Some(""), "info").is_ok(), "empty RUST_LOG is unset");
	}

	#[test]
	fn test_invalid_env_filter() {
		let err = filter_from(Some("x=[["), "info").expect_err("invalid RUST_LOG");
		assert!(err.to_string().contains("RUST_LOG"), "names the variable: {err}");
	}

	#[test]
	fn test_capture() {
		let logs = capture("info", || {
			tracing::info!("kept");
			tracing::debug!("dropped");
		})
		.expect("captured");

		assert!(logs.contains("INFO kept"), "info line captured: {logs:?}");
		assert!(!logs.contains("dropped"), "debug filtered out: {logs:?}");
	}
}
