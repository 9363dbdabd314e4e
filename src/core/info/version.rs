//! one true function for returning the buildvars version
//!
//! The binary's build script resolves its own build identifier with the same
//! resolver it ships and passes it to [`init`] before anything asks for the
//! version. Without one the plain SemVer version is reported.

use std::sync::OnceLock;

static BRANDING: &str = "buildvars";
static SEMANTIC: &str = env!("CARGO_PKG_VERSION");

static VERSION: OnceLock<String> = OnceLock::new();

#[inline]
#[must_use]
pub fn name() -> &'static str { BRANDING }

#[inline]
#[must_use]
pub fn semantic() -> &'static str { SEMANTIC }

/// Records the build identifier. Only the first call has any effect.
pub fn init(build_id: Option<&str>) -> &'static str {
	VERSION.get_or_init(|| format_version(build_id))
}

#[inline]
#[must_use]
pub fn version() -> &'static str { VERSION.get_or_init(|| format_version(None)) }

fn format_version(build_id: Option<&str>) -> String {
	build_id
		.filter(|id| !id.is_empty())
		.map_or_else(|| SEMANTIC.to_owned(), |id| format!("{SEMANTIC} ({id})"))
}
