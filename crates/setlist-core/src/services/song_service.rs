use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::domain::catalog::{Page, SongFilter};
use crate::domain::ids::SongId;
use crate::domain::ownership::owned_by;
use crate::domain::song::Song;
use crate::domain::tags::distinct_tags;
use crate::errors::{CoreError, map_repo_error};
use crate::ports::{Clock, SongRepository};
use crate::services::require_user;
use crate::validation::{ensure_valid, validate_song};

/// Catálogo de canciones de cada usuario.
pub struct SongService<R, C>
where
  R: SongRepository,
  C: Clock,
{
  repo: R,
  clock: C,
}

impl<R, C> SongService<R, C>
where
  R: SongRepository,
  C: Clock,
{
  pub fn new(repo: R, clock: C) -> Self {
    Self { repo, clock }
  }

  /// Ver [`validate_song`].
  pub fn validate(&self, song: Option<&Song>) -> Vec<String> {
    validate_song(song)
  }

  // -------- COMMAND (write) --------

  /// Valida y guarda una canción nueva.
  ///
  /// Fija `created_at` a la hora actual y deja `updated_at` vacío.
  pub fn create_song(&self, mut song: Song) -> Result<Song, CoreError> {
    self.check(&song)?;

    song.created_at = self.clock.now();
    song.updated_at = None;

    self.repo.insert_song(&song).map_err(map_repo_error)?;
    info!(song_id = %song.id, user_id = %song.user_id, "song created");

    Ok(song)
  }

  /// Actualiza una canción propia del usuario.
  ///
  /// Conserva dueño y `created_at` del registro guardado y marca
  /// `updated_at`. `Ok(None)` si la canción no existe o es de otro usuario.
  pub fn update_song(&self, mut song: Song, user_id: &str) -> Result<Option<Song>, CoreError> {
    require_user(user_id)?;
    self.check(&song)?;

    let existing = self.repo.find_song(song.id).map_err(map_repo_error)?;
    let Some(existing) = owned_by(existing, user_id) else {
      debug!(song_id = %song.id, user_id, "update skipped: song not found for user");
      return Ok(None);
    };

    song.user_id = existing.user_id;
    song.created_at = existing.created_at;
    song.updated_at = Some(self.clock.now());

    self.repo.update_song(&song).map_err(map_repo_error)?;
    info!(song_id = %song.id, user_id, "song updated");

    Ok(Some(song))
  }

  /// `false` si la canción no existe o no es del usuario.
  pub fn delete_song(&self, id: SongId, user_id: &str) -> Result<bool, CoreError> {
    require_user(user_id)?;

    let existing = self.repo.find_song(id).map_err(map_repo_error)?;
    if owned_by(existing, user_id).is_none() {
      return Ok(false);
    }

    let deleted = self.repo.delete_song(id).map_err(map_repo_error)?;
    info!(song_id = %id, user_id, deleted, "song deleted");
    Ok(deleted)
  }

  // -------- QUERY (read) --------

  pub fn get_song(&self, id: SongId, user_id: &str) -> Result<Option<Song>, CoreError> {
    require_user(user_id)?;
    let song = self.repo.find_song(id).map_err(map_repo_error)?;
    Ok(owned_by(song, user_id))
  }

  pub fn list_songs(&self, user_id: &str, filter: &SongFilter) -> Result<Page<Song>, CoreError> {
    require_user(user_id)?;
    let filter = filter.normalized();
    debug!(user_id, page = filter.page, page_size = filter.page_size, "listing songs");
    self.repo.list_songs(user_id, &filter).map_err(map_repo_error)
  }

  /// Todas las etiquetas distintas del usuario, ordenadas.
  pub fn get_distinct_tags(&self, user_id: &str) -> Result<BTreeSet<String>, CoreError> {
    require_user(user_id)?;
    let raw = self.repo.list_song_tags(user_id).map_err(map_repo_error)?;
    Ok(distinct_tags(raw))
  }

  fn check(&self, song: &Song) -> Result<(), CoreError> {
    let errors = validate_song(Some(song));
    if !errors.is_empty() {
      warn!(song_id = %song.id, errors = ?errors, "song rejected by validation");
    }
    ensure_valid(errors)
  }
}
