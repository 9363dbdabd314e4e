//! Information about the tool itself.

pub mod version;
