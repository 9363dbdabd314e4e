pub mod config;
pub mod error;
pub mod info;
pub mod log;

pub use ::tracing;
pub use config::Config;
pub use error::{Error, Result};
pub use info::version;
pub use tracing::{debug, info, trace, warn};
