use crate::paths::{ConfigError, SetlistPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use tracing::debug;

/// toml_edit para escribir preservando comentarios del usuario
use toml_edit::{DocumentMut, Item};

pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  paths: SetlistPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: SetlistPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &SetlistPaths {
    &self.paths
  }

  /// Contenido actual de setlist.toml; `None` si el archivo no existe.
  fn read_document(&self) -> Result<Option<toml::Table>, ConfigError> {
    match fs::read_to_string(self.paths.config_file()) {
      Ok(content) => Ok(Some(toml::from_str(&content)?)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  /// Igual que [`ConfigBackend::load_section`], pero si el archivo o la
  /// sección no existen devuelve `T::default()`.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    match self.read_document()?.as_ref().and_then(|doc| doc.get(section)) {
      Some(value) => decode_section(section, value),
      None => Ok(T::default()),
    }
  }

  /// Carga la sección con defaults y la vuelve a escribir, de modo que el
  /// archivo siempre refleje todas las claves conocidas.
  pub fn load_or_init_section<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Serialize + Default,
  {
    let cfg = self.load_section_with_default(section)?;
    self.save_section(section, &cfg)?;
    Ok(cfg)
  }
}

fn decode_section<T: DeserializeOwned>(section: &str, value: &toml::Value) -> Result<T, ConfigError> {
  value
    .clone()
    .try_into()
    .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let path = self.paths.config_file();
    let doc = self
      .read_document()?
      .ok_or_else(|| ConfigError::Other(format!("config file not found: {}", path.display())))?;

    let value = doc
      .get(section)
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {}", path.display())))?;

    decode_section(section, value)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let path = self.paths.config_file();

    // 1) Documento actual, o uno vacío si todavía no hay archivo.
    let mut doc: DocumentMut = match fs::read_to_string(&path) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // 2) La sección se serializa sin cabecera ("foo = 1\nbar = 2\n")...
    let section_str = toml::to_string(value)
      .map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    // 3) ...y se convierte en tabla de toml_edit.
    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    // 4) Reemplazo en la raíz; el resto del documento queda intacto.
    doc[section] = section_item;

    setlist_fs::atomic_write_str(&path, &doc.to_string())?;
    debug!(section, path = %path.display(), "config section written");

    Ok(())
  }
}
