use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{CONFIG_BACKEND, ConfigError};

/// Sección `[logging]` de setlist.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
  /// Directivas de `EnvFilter` (p. ej. `"info,setlist_storage=debug"`).
  #[serde(default = "default_filter")]
  pub filter: String,

  /// Incluir el target (módulo) en cada línea.
  #[serde(default)]
  pub with_target: bool,
}

fn default_filter() -> String {
  "info".to_string()
}

impl Default for LoggingConfig {
  fn default() -> Self {
    LoggingConfig { filter: default_filter(), with_target: false }
  }
}

impl LoggingConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init_section("logging")
  }

  /// `RUST_LOG` tiene prioridad sobre lo configurado en el archivo.
  pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
    let filter = match std::env::var("RUST_LOG") {
      Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
      _ => EnvFilter::try_new(&self.filter),
    };

    filter.map_err(|e| ConfigError::Logging(e.to_string()))
  }
}

/// Instala el subscriber global de `tracing`.
///
/// Falla si ya había uno instalado.
pub fn init_logging(cfg: &LoggingConfig) -> Result<(), ConfigError> {
  let filter = cfg.env_filter()?;
  let fmt_layer = fmt::layer().with_target(cfg.with_target);

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt_layer)
    .try_init()
    .map_err(|e| ConfigError::Logging(e.to_string()))
}
