mod backend;
pub mod logging;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use logging::{LoggingConfig, init_logging};
pub use paths::{BASE_DIR_ENV, ConfigError, SetlistPaths};

use once_cell::sync::Lazy;

// Singleton de paths (portable / system)
pub static PATHS: Lazy<SetlistPaths> =
  Lazy::new(|| SetlistPaths::detect().expect("failed to init SetlistPaths"));

// Singleton del backend de config
pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> =
  Lazy::new(|| TomlConfigBackend::new(PATHS.clone()));
