use std::{
	path::{Path, PathBuf},
	time::Duration,
};

use figment::{
	Figment,
	providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{Error, Result};

/// File read from the working directory (or its ancestors) when no explicit
/// path is given.
pub const DEFAULT_FILE: &str = "buildvars.toml";

/// Environment variables with this prefix override file values.
pub const ENV_PREFIX: &str = "BUILDVARS_";

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "BUILDVARS_CONFIG";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
	/// Working directory of the revision query. Defaults to the current
	/// directory of the process.
	pub repo_root: Option<PathBuf>,

	/// Executable queried for the current revision.
	///
	/// default: "git"
	pub git_program: String,

	/// Upper bound on the revision query; the child is killed afterwards.
	///
	/// default: 3000
	pub git_timeout_ms: u64,

	/// Number of leading revision characters kept in the identifier.
	///
	/// default: 5
	pub commit_length: usize,

	/// Commit token used whenever the revision cannot be obtained.
	///
	/// default: "dev"
	pub fallback_commit: String,

	/// Pins the revision instead of querying version control, for builds
	/// from a source tarball or a CI checkout without `.git`. A blank value
	/// counts as unset.
	pub commit: Option<String>,

	/// default: "development"
	pub node_env: String,

	/// Accepts `true`/`false` as well as `1`/`0`.
	#[serde(deserialize_with = "flag")]
	pub use_sentry: bool,

	/// tracing filter directive, overridden by `RUST_LOG`.
	///
	/// default: "info"
	pub log: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			repo_root: None,
			git_program: "git".to_owned(),
			git_timeout_ms: 3000,
			commit_length: 5,
			fallback_commit: "dev".to_owned(),
			commit: None,
			node_env: "development".to_owned(),
			use_sentry: false,
			log: "info".to_owned(),
		}
	}
}

impl Config {
	/// Layers defaults, the config file and the environment. Later layers
	/// win; callers may merge further overrides onto the returned figment.
	pub fn load(path: Option<&Path>) -> Result<Figment> {
		let file = match path {
			| Some(path) if !path.is_file() => {
				return Err(Error::config(format!(
					"config file {} does not exist",
					path.display()
				)));
			},
			| Some(path) => Toml::file_exact(path),
			| None => Toml::file(DEFAULT_FILE),
		};

		Ok(Figment::from(Serialized::defaults(Self::default()))
			.merge(file)
			.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"])))
	}

	/// Extracts and validates a config from a loaded figment.
	pub fn new(raw: &Figment) -> Result<Self> {
		let mut config: Self = raw.extract()?;
		config.commit = config.commit.take().filter(|c| !c.trim().is_empty());
		config.check()?;

		Ok(config)
	}

	pub fn check(&self) -> Result {
		if self.commit_length == 0 {
			return Err(Error::config("commit_length must be greater than zero"));
		}

		if self.git_timeout_ms == 0 {
			return Err(Error::config("git_timeout_ms must be greater than zero"));
		}

		if self.git_program.trim().is_empty() {
			return Err(Error::config("git_program must not be empty"));
		}

		if self.fallback_commit.is_empty() {
			return Err(Error::config("fallback_commit must not be empty"));
		}

		Ok(())
	}

	#[inline]
	#[must_use]
	pub fn git_timeout(&self) -> Duration { Duration::from_millis(self.git_timeout_ms) }

	/// The configured repository root, or the current directory.
	pub fn repo_root(&self) -> Result<PathBuf> {
		match &self.repo_root {
			| Some(root) => Ok(root.clone()),
			| None => Ok(std::env::current_dir()?),
		}
	}
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Flag {
		Bool(bool),
		Int(u64),
		Str(String),
	}

	match Flag::deserialize(deserializer)? {
		| Flag::Bool(value) => Ok(value),
		| Flag::Int(0) => Ok(false),
		| Flag::Int(1) => Ok(true),
		| Flag::Str(s) => match s.trim() {
			| "0" | "false" => Ok(false),
			| "1" | "true" => Ok(true),
			| other => Err(de::Error::custom(format!("expected a boolean or 0/1, found {other:?}"))),
		},
		| Flag::Int(n) => Err(de::Error::custom(format!("expected a boolean or 0/1, found {n}"))),
	}
}

#[cfg(test)]
mod tests {
	use figment::Jail;

	use super::*;

	fn load(path: Option<&Path>) -> std::result::Result<Config, figment::Error> {
		Config::load(path)
			.and_then(|raw| Config::new(&raw))
			.map_err(|e| e.to_string().into())
	}

	#[test]
	fn test_defaults() {
		Jail::expect_with(|_jail| {
			let config = load(None)?;
			assert_eq!(config.git_program, "git");
			assert_eq!(config.git_timeout(), Duration::from_secs(3));
			assert_eq!(config.commit_length, 5);
			assert_eq!(config.fallback_commit, "dev");
			assert_eq!(config.node_env, "development");
			assert!(!config.use_sentry, "sentry is off unless enabled");
			assert!(config.commit.is_none(), "no pinned commit by default");
			assert!(config.repo_root.is_none(), "repo root follows the cwd by default");
			Ok(())
		});
	}

	#[test]
	fn test_file_then_env() {
		Jail::expect_with(|jail| {
			jail.create_file(
				DEFAULT_FILE,
				r#"
				node_env = "production"
				use_sentry = true
				commit_length = 7
				"#,
			)?;
			jail.set_env("BUILDVARS_NODE_ENV", "staging");
			jail.set_env("BUILDVARS_COMMIT", "0123456789abcdef");

			let config = load(None)?;
			assert_eq!(config.node_env, "staging");
			assert!(config.use_sentry, "file value survives the env layer");
			assert_eq!(config.commit_length, 7);
			assert_eq!(config.commit.as_deref(), Some("0123456789abcdef"));
			Ok(())
		});
	}

	#[test]
	fn test_explicit_file() {
		Jail::expect_with(|jail| {
			jail.create_file("custom.toml", r#"fallback_commit = "local""#)?;

			let config = load(Some(Path::new("custom.toml")))?;
			assert_eq!(config.fallback_commit, "local");

			assert!(load(Some(Path::new("missing.toml"))).is_err(), "explicit file must exist");
			Ok(())
		});
	}

	#[test]
	fn test_blank_commit_is_unset() {
		Jail::expect_with(|jail| {
			jail.set_env("BUILDVARS_COMMIT", "");
			assert!(load(None)?.commit.is_none(), "empty env commit");

			jail.set_env("BUILDVARS_COMMIT", "  ");
			assert!(load(None)?.commit.is_none(), "blank env commit");
			Ok(())
		});
	}

	#[test]
	fn test_use_sentry_flag() {
		Jail::expect_with(|jail| {
			jail.set_env("BUILDVARS_USE_SENTRY", "1");
			assert!(load(None)?.use_sentry, "1 enables");

			jail.set_env("BUILDVARS_USE_SENTRY", "0");
			assert!(!load(None)?.use_sentry, "0 disables");

			jail.set_env("BUILDVARS_USE_SENTRY", "true");
			assert!(load(None)?.use_sentry, "true enables");

			jail.set_env("BUILDVARS_USE_SENTRY", "2");
			assert!(load(None).is_err(), "2 is not a flag");
			Ok(())
		});
	}

	#[test]
	fn test_check() {
		let config = Config { commit_length: 0, ..Config::default() };
		assert!(matches!(config.check(), Err(Error::Config(_))));

		let config = Config { git_timeout_ms: 0, ..Config::default() };
		assert!(matches!(config.check(), Err(Error::Config(_))));

		let config = Config { fallback_commit: String::new(), ..Config::default() };
		assert!(matches!(config.check(), Err(Error::Config(_))));

		assert!(Config::default().check().is_ok(), "defaults are valid");
	}

	#[test]
	fn test_repo_root() {
		let config = Config {
			repo_root: Some(PathBuf::from("/srv/app")),
			..Config::default()
		};
		assert_eq!(config.repo_root().ok(), Some(PathBuf::from("/srv/app")));
	}
}
