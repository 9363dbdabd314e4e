//! Derives the `YYYYMMDD-COMMIT` build identifier and the define map handed
//! to a bundler's build-variable injection.

pub mod cargo;
mod date;
mod defines;
mod git;
mod identifier;
mod resolver;

pub use date::{DATE_FORMAT, format_date, today};
pub use defines::{DefineMap, DefineValue, NODE_ENV, USE_SENTRY, VERSION};
pub use git::{DEFAULT_TIMEOUT, Git, Pinned, RevisionSource};
pub use identifier::{BuildIdentifier, short_commit};
pub use resolver::VersionResolver;
