use std::path::PathBuf;

fn main() {
	let root = std::env::var_os("CARGO_MANIFEST_DIR")
		.map(PathBuf::from)
		.unwrap_or_default();

	buildvars_resolver::cargo::emit(&root);
}
