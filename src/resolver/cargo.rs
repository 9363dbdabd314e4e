//! Build script support for crates that embed their own build identifier.
//!
//! ```ignore
//! fn main() {
//! 	let root = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
//! 	buildvars_resolver::cargo::emit(root.as_ref());
//! }
//! ```
//!
//! The crate then reads it back with `option_env!("BUILDVARS_BUILD_ID")`.

use std::path::{Path, PathBuf};

use crate::{BuildIdentifier, Git, Pinned, VersionResolver};

/// Variable the identifier is exported under at compile time.
pub const BUILD_ID_ENV: &str = "BUILDVARS_BUILD_ID";

/// Pins the commit instead of querying git, e.g. when building from a
/// tarball.
pub const COMMIT_ENV: &str = "BUILDVARS_COMMIT";

/// Resolves the identifier for the repository containing `repo_root`, prints
/// the cargo directives and returns it.
pub fn emit(repo_root: &Path) -> BuildIdentifier {
	let git = Git::new(repo_root);
	let resolver = match get_env(COMMIT_ENV) {
		| Some(commit) => VersionResolver::new(Pinned::new(commit)),
		| None => VersionResolver::new(git.clone()),
	};

	let identifier = resolver.identifier();
	for directive in directives(&identifier, &rerun_paths(&git)) {
		println!("{directive}");
	}

	identifier
}

/// Files whose change means HEAD moved: the HEAD file itself, packed refs,
/// and the loose ref of the current branch.
#[must_use]
pub fn rerun_paths(git: &Git) -> Vec<PathBuf> {
	let mut paths: Vec<PathBuf> = ["HEAD", "packed-refs"]
		.into_iter()
		.filter_map(|name| git.git_path(name))
		.collect();

	if let Ok(reference) = git.run(&["symbolic-ref", "--quiet", "HEAD"]) {
		paths.extend(git.git_path(&reference));
	}

	paths.retain(|path| path.exists());
	paths
}

#[must_use]
pub fn directives(identifier: &BuildIdentifier, rerun_paths: &[PathBuf]) -> Vec<String> {
	let mut directives = vec![format!("cargo:rustc-env={BUILD_ID_ENV}={identifier}")];
	directives.extend(
		rerun_paths
			.iter()
			.map(|path| format!("cargo:rerun-if-changed={}", path.display())),
	);
	directives.push(format!("cargo:rerun-if-env-changed={COMMIT_ENV}"));
	directives
}

fn get_env(env_var: &str) -> Option<String> {
	match std::env::var(env_var) {
		| Ok(val) if !val.is_empty() => Some(val),
		| _ => None,
	}
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDate;

	use super::*;

	#[test]
	fn test_directives() {
		let date = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
		let identifier = BuildIdentifier::new(date, "abc12");
		let paths = [PathBuf::from("/src/.git/HEAD")];

		assert_eq!(directives(&identifier, &paths), [
			"cargo:rustc-env=BUILDVARS_BUILD_ID=20240115-abc12",
			"cargo:rerun-if-changed=/src/.git/HEAD",
			"cargo:rerun-if-env-changed=BUILDVARS_COMMIT",
		]);
	}

	#[test]
	fn test_rerun_paths_without_repository() {
		let dir = tempfile::tempdir().expect("tempdir");
		assert!(rerun_paths(&Git::new(dir.path())).is_empty(), "nothing to watch");
	}
}
