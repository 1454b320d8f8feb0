use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::ids::SetlistId;
use crate::domain::ownership::owned_by;
use crate::domain::setlist::Setlist;
use crate::errors::{CoreError, map_repo_error};
use crate::export::{render_setlist_csv, setlist_filename};
use crate::ports::{Clock, SetlistRepository};
use crate::services::require_user;

/// Resultado de exportar un setlist: nombre sugerido y contenido UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
  pub filename: String,
  pub bytes: Vec<u8>,
}

/// Exportación de setlists a CSV.
pub struct ExportService<R, C>
where
  R: SetlistRepository,
  C: Clock,
{
  repo: R,
  clock: C,
}

impl<R, C> ExportService<R, C>
where
  R: SetlistRepository,
  C: Clock,
{
  pub fn new(repo: R, clock: C) -> Self {
    Self { repo, clock }
  }

  /// CSV del setlist `id` si pertenece a `user_id`.
  ///
  /// Un setlist inexistente y uno ajeno dan el mismo `Ok(None)`.
  pub fn export_setlist_csv(
    &self,
    id: SetlistId,
    user_id: &str,
  ) -> Result<Option<Vec<u8>>, CoreError> {
    Ok(self.export(id, user_id)?.map(|export| export.bytes))
  }

  /// Igual que [`Self::export_setlist_csv`] pero junto al nombre de archivo.
  pub fn export(&self, id: SetlistId, user_id: &str) -> Result<Option<CsvExport>, CoreError> {
    require_user(user_id)?;

    let setlist = self.repo.find_setlist(id).map_err(map_repo_error)?;
    let Some(setlist) = owned_by(setlist, user_id) else {
      debug!(setlist_id = %id, user_id, "export skipped: setlist not found for user");
      return Ok(None);
    };

    let bytes = render_setlist_csv(&setlist)?;
    let filename = self.generate_filename(Some(&setlist))?;
    info!(setlist_id = %id, user_id, songs = setlist.total_songs(), %filename, "setlist exported");

    Ok(Some(CsvExport { filename, bytes }))
  }

  /// Nombre de archivo seguro para el setlist.
  ///
  /// Sin fecha de actuación se usa la fecha actual del reloj.
  pub fn generate_filename(&self, setlist: Option<&Setlist>) -> Result<String, CoreError> {
    let setlist =
      setlist.ok_or_else(|| CoreError::InvalidArgument("setlist cannot be null".to_string()))?;
    Ok(setlist_filename(setlist, self.clock.now().date_naive()))
  }

  /// Exporta y escribe el CSV dentro de `dir` (que se crea si hace falta).
  ///
  /// Devuelve la ruta escrita, o `None` con la misma regla que [`Self::export`].
  pub fn export_to_file(
    &self,
    id: SetlistId,
    user_id: &str,
    dir: &Path,
  ) -> Result<Option<PathBuf>, CoreError> {
    let Some(export) = self.export(id, user_id)? else {
      return Ok(None);
    };

    std::fs::create_dir_all(dir)?;
    let path = dir.join(&export.filename);
    setlist_fs::atomic_write_bytes(&path, &export.bytes)?;
    info!(path = %path.display(), "csv written");

    Ok(Some(path))
  }
}
