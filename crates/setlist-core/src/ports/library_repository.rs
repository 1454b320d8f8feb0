use crate::domain::catalog::{Page, SongFilter};
use crate::domain::ids::{SetlistId, SongId};
use crate::domain::setlist::{Setlist, SetlistSong};
use crate::domain::song::Song;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
  #[error("entity not found")]
  NotFound,
  #[error("storage error: {0}")]
  Storage(String),
}

/// Port de persistencia del catálogo de canciones.
///
/// Las búsquedas por id no filtran por dueño: esa comprobación la hace el
/// servicio con [`crate::domain::Owned`].
pub trait SongRepository {
  fn find_song(&self, id: SongId) -> Result<Option<Song>, RepoError>;

  /// Canciones del usuario que cumplen el filtro, paginadas y ordenadas por
  /// título y artista. El filtro llega ya normalizado.
  fn list_songs(&self, user_id: &str, filter: &SongFilter) -> Result<Page<Song>, RepoError>;

  /// Campos `tags` no nulos de todas las canciones del usuario, sin procesar.
  fn list_song_tags(&self, user_id: &str) -> Result<Vec<String>, RepoError>;

  fn insert_song(&self, song: &Song) -> Result<(), RepoError>;

  /// Reescribe una canción existente; `RepoError::NotFound` si no existe.
  fn update_song(&self, song: &Song) -> Result<(), RepoError>;

  /// Borra la canción y sus apariciones en setlists. `false` si no existía.
  fn delete_song(&self, id: SongId) -> Result<bool, RepoError>;
}

/// Port de persistencia de setlists.
pub trait SetlistRepository {
  /// Setlist con sus entradas y las canciones de cada entrada ya cargadas.
  fn find_setlist(&self, id: SetlistId) -> Result<Option<Setlist>, RepoError>;

  fn list_setlists(&self, user_id: &str) -> Result<Vec<Setlist>, RepoError>;

  /// Inserta la cabecera del setlist (las entradas van por `insert_entry`).
  fn insert_setlist(&self, setlist: &Setlist) -> Result<(), RepoError>;

  /// Reescribe la cabecera; `RepoError::NotFound` si no existe.
  fn update_setlist(&self, setlist: &Setlist) -> Result<(), RepoError>;

  fn delete_setlist(&self, id: SetlistId) -> Result<bool, RepoError>;

  fn insert_entry(&self, setlist_id: SetlistId, entry: &SetlistSong) -> Result<(), RepoError>;

  /// Sustituye todas las entradas del setlist de una vez.
  fn replace_entries(&self, setlist_id: SetlistId, entries: &[SetlistSong]) -> Result<(), RepoError>;
}

impl<T: SongRepository + ?Sized> SongRepository for &T {
  fn find_song(&self, id: SongId) -> Result<Option<Song>, RepoError> {
    (**self).find_song(id)
  }

  fn list_songs(&self, user_id: &str, filter: &SongFilter) -> Result<Page<Song>, RepoError> {
    (**self).list_songs(user_id, filter)
  }

  fn list_song_tags(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
    (**self).list_song_tags(user_id)
  }

  fn insert_song(&self, song: &Song) -> Result<(), RepoError> {
    (**self).insert_song(song)
  }

  fn update_song(&self, song: &Song) -> Result<(), RepoError> {
    (**self).update_song(song)
  }

  fn delete_song(&self, id: SongId) -> Result<bool, RepoError> {
    (**self).delete_song(id)
  }
}

impl<T: SetlistRepository + ?Sized> SetlistRepository for &T {
  fn find_setlist(&self, id: SetlistId) -> Result<Option<Setlist>, RepoError> {
    (**self).find_setlist(id)
  }

  fn list_setlists(&self, user_id: &str) -> Result<Vec<Setlist>, RepoError> {
    (**self).list_setlists(user_id)
  }

  fn insert_setlist(&self, setlist: &Setlist) -> Result<(), RepoError> {
    (**self).insert_setlist(setlist)
  }

  fn update_setlist(&self, setlist: &Setlist) -> Result<(), RepoError> {
    (**self).update_setlist(setlist)
  }

  fn delete_setlist(&self, id: SetlistId) -> Result<bool, RepoError> {
    (**self).delete_setlist(id)
  }

  fn insert_entry(&self, setlist_id: SetlistId, entry: &SetlistSong) -> Result<(), RepoError> {
    (**self).insert_entry(setlist_id, entry)
  }

  fn replace_entries(&self, setlist_id: SetlistId, entries: &[SetlistSong]) -> Result<(), RepoError> {
    (**self).replace_entries(setlist_id, entries)
  }
}
