use std::{borrow::Cow, io};

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	/// The revision query could not produce an identifier. Covers a missing
	/// executable, a non-zero exit, a timeout and unusable output alike.
	#[error("version control unavailable: {0}")]
	VersionControlUnavailable(Cow<'static, str>),

	#[error("invalid configuration: {0}")]
	Config(Cow<'static, str>),

	#[error(transparent)]
	Figment(#[from] Box<figment::Error>),

	#[error(transparent)]
	Io(#[from] io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl Error {
	#[inline]
	#[must_use]
	pub fn vcs(reason: impl Into<Cow<'static, str>>) -> Self {
		Self::VersionControlUnavailable(reason.into())
	}

	#[inline]
	#[must_use]
	pub fn config(reason: impl Into<Cow<'static, str>>) -> Self { Self::Config(reason.into()) }

	/// True for the class of errors that callers are expected to recover from
	/// by substituting a fallback.
	#[inline]
	#[must_use]
	pub fn is_recoverable(&self) -> bool { matches!(self, Self::VersionControlUnavailable(_)) }
}

impl From<figment::Error> for Error {
	fn from(e: figment::Error) -> Self { Self::Figment(Box::new(e)) }
}
