use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("logging error: {0}")]
  Logging(String),
  #[error("other: {0}")]
  Other(String),
}

/// Directorios de trabajo de la aplicación.
///
/// Si `SETLIST_BASE_DIR` está definida, todo cuelga de ese directorio
/// (modo portable / tests). Si no, se usan los directorios del sistema.
#[derive(Debug, Clone)]
pub struct SetlistPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: PathBuf,
}

/// Variable de entorno que fija la raíz de todos los directorios.
pub const BASE_DIR_ENV: &str = "SETLIST_BASE_DIR";

impl SetlistPaths {
  pub fn new() -> Result<Self, ConfigError> {
    if let Some(base) = std::env::var_os(BASE_DIR_ENV).filter(|v| !v.is_empty()) {
      return Self::under(PathBuf::from(base));
    }

    let proj_dirs =
      ProjectDirs::from("com", "setlist", "setlist").ok_or(ConfigError::Directories)?;
    let paths = Self {
      base_dir: proj_dirs.config_dir().to_path_buf(),
      config_dir: proj_dirs.config_dir().to_path_buf(),
      data_dir: proj_dirs.data_dir().to_path_buf(),
      cache_dir: proj_dirs.cache_dir().to_path_buf(),
    };
    paths.ensure_dirs()?;

    Ok(paths)
  }

  pub fn detect() -> Result<Self, ConfigError> {
    Self::new()
  }

  /// Directorios bajo una raíz explícita, sin consultar el entorno.
  pub fn under(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let base_dir = base.into();
    let paths = Self {
      config_dir: base_dir.join("config"),
      data_dir: base_dir.join("data"),
      cache_dir: base_dir.join("cache"),
      base_dir,
    };
    paths.ensure_dirs()?;

    Ok(paths)
  }

  fn ensure_dirs(&self) -> Result<(), ConfigError> {
    for dir in [&self.config_dir, &self.data_dir, &self.cache_dir] {
      std::fs::create_dir_all(dir)?;
    }
    Ok(())
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("setlist.toml")
  }

  /// Carpeta por defecto para los CSV exportados.
  pub fn export_dir(&self) -> PathBuf {
    self.data_dir.join("exports")
  }
}
