use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::SongId;
use crate::domain::ownership::Owned;

/// Canción del catálogo de un usuario.
///
/// Los campos opcionales en `None` siempre son válidos; los límites de
/// longitud y rango viven en [`crate::validation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
  pub id: SongId,
  pub title: String,
  pub artist: String,
  pub album: Option<String>,
  pub genre: Option<String>,
  /// Tonalidad de referencia (`"Am"`, `"F#"`, ...).
  pub musical_key: Option<String>,
  pub notes: Option<String>,
  /// Etiquetas libres separadas por comas, tal como las escribió el usuario.
  pub tags: Option<String>,
  pub bpm: Option<i32>,
  pub duration_seconds: Option<i32>,
  /// Dificultad de 1 a 5.
  pub difficulty_rating: Option<i32>,
  /// Dueño de la canción.
  pub user_id: String,
  pub created_at: DateTime<Utc>,
  /// `None` hasta la primera actualización.
  pub updated_at: Option<DateTime<Utc>>,
}

impl Song {
  /// Canción mínima: solo los campos obligatorios.
  pub fn new(title: impl Into<String>, artist: impl Into<String>, user_id: impl Into<String>) -> Self {
    Song {
      id: SongId::new(),
      title: title.into(),
      artist: artist.into(),
      album: None,
      genre: None,
      musical_key: None,
      notes: None,
      tags: None,
      bpm: None,
      duration_seconds: None,
      difficulty_rating: None,
      user_id: user_id.into(),
      created_at: Utc::now(),
      updated_at: None,
    }
  }
}

impl Owned for Song {
  fn owner_id(&self) -> &str {
    &self.user_id
  }
}
