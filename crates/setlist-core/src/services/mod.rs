pub mod export_service;
pub mod setlist_service;
pub mod song_service;

pub use export_service::{CsvExport, ExportService};
pub use setlist_service::SetlistService;
pub use song_service::SongService;

use crate::errors::CoreError;

/// Los servicios rechazan un user id vacío antes de consultar nada.
pub(crate) fn require_user(user_id: &str) -> Result<(), CoreError> {
  if user_id.trim().is_empty() {
    return Err(CoreError::InvalidArgument("user id cannot be null or empty".to_string()));
  }
  Ok(())
}
