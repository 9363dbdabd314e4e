use buildvars_core::{Config, Result, debug, info};
use chrono::NaiveDate;

use crate::{
	BuildIdentifier, DefineMap, DefineValue, Git, NODE_ENV, Pinned, RevisionSource, USE_SENTRY,
	VERSION, short_commit, today,
};

const DEFAULT_COMMIT_LENGTH: usize = 5;
const DEFAULT_FALLBACK: &str = "dev";
const DEFAULT_NODE_ENV: &str = "development";

/// Computes the build identifier and the define map for one build.
///
/// Resolution never fails: when the revision source is unavailable for any
/// reason the commit becomes the fallback token.
pub struct VersionResolver {
	source: Box<dyn RevisionSource>,
	commit_length: usize,
	fallback: String,
	node_env: String,
	use_sentry: bool,
}

impl VersionResolver {
	#[must_use]
	pub fn new(source: impl RevisionSource + 'static) -> Self {
		Self {
			source: Box::new(source),
			commit_length: DEFAULT_COMMIT_LENGTH,
			fallback: DEFAULT_FALLBACK.to_owned(),
			node_env: DEFAULT_NODE_ENV.to_owned(),
			use_sentry: false,
		}
	}

	/// A pinned `commit` takes the place of the version control query.
	pub fn from_config(config: &Config) -> Result<Self> {
		config.check()?;
		let resolver = match &config.commit {
			| Some(commit) => Self::new(Pinned::new(commit.clone())),
			| None => Self::new(
				Git::new(config.repo_root()?)
					.program(config.git_program.clone())
					.timeout(config.git_timeout()),
			),
		};

		Ok(resolver
			.commit_length(config.commit_length)
			.fallback(config.fallback_commit.clone())
			.node_env(config.node_env.clone())
			.use_sentry(config.use_sentry))
	}

	#[must_use]
	pub fn commit_length(mut self, len: usize) -> Self {
		self.commit_length = len;
		self
	}

	#[must_use]
	pub fn fallback(mut self, fallback: impl Into<String>) -> Self {
		self.fallback = fallback.into();
		self
	}

	#[must_use]
	pub fn node_env(mut self, node_env: impl Into<String>) -> Self {
		self.node_env = node_env.into();
		self
	}

	#[must_use]
	pub fn use_sentry(mut self, use_sentry: bool) -> Self {
		self.use_sentry = use_sentry;
		self
	}

	/// The revision prefix, or the fallback token.
	#[must_use]
	pub fn commit(&self) -> String {
		match self.source.revision() {
			| Ok(revision) => short_commit(&revision, self.commit_length).to_owned(),
			| Err(e) => {
				debug!(fallback = %self.fallback, "revision unavailable: {e}");
				self.fallback.clone()
			},
		}
	}

	#[must_use]
	pub fn identifier_at(&self, date: NaiveDate) -> BuildIdentifier {
		BuildIdentifier::new(date, self.commit())
	}

	#[must_use]
	pub fn identifier(&self) -> BuildIdentifier { self.identifier_at(today()) }

	/// The define map for a build on `date`.
	#[must_use]
	pub fn resolve_at(&self, date: NaiveDate) -> DefineMap {
		let version = DefineValue::literal(self.identifier_at(date).to_string());
		info!("current version is {version}");

		let mut defines = DefineMap::new();
		defines.insert(NODE_ENV, DefineValue::literal(self.node_env.clone()));
		defines.insert(VERSION, version);
		defines.insert(USE_SENTRY, DefineValue::literal(if self.use_sentry { "1" } else { "0" }));
		defines
	}

	/// The define map for a build today, in local time.
	#[must_use]
	pub fn resolve(&self) -> DefineMap { self.resolve_at(today()) }
}
