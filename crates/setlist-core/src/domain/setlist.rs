use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::SetlistId;
use crate::domain::ownership::Owned;
use crate::domain::song::Song;

/// Programa de actuación: una lista ordenada de canciones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setlist {
  pub id: SetlistId,
  pub name: String,
  pub description: Option<String>,
  pub venue: Option<String>,
  pub performance_date: Option<NaiveDateTime>,
  pub expected_duration_minutes: Option<i32>,
  pub user_id: String,
  /// Entradas del setlist. El orden del `Vec` no importa: manda `position`.
  pub songs: Vec<SetlistSong>,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
}

impl Setlist {
  /// Entradas ordenadas por posición ascendente.
  ///
  /// No se asume que las posiciones sean contiguas.
  pub fn ordered_songs(&self) -> Vec<&SetlistSong> {
    let mut entries: Vec<&SetlistSong> = self.songs.iter().collect();
    entries.sort_by_key(|entry| entry.position);
    entries
  }

  pub fn total_songs(&self) -> usize {
    self.songs.len()
  }

  /// Siguiente posición libre (1 si está vacío).
  pub fn next_position(&self) -> u32 {
    self.songs.iter().map(|entry| entry.position).max().unwrap_or(0) + 1
  }
}

impl Owned for Setlist {
  fn owner_id(&self) -> &str {
    &self.user_id
  }
}

/// Una canción colocada en una posición concreta de un setlist.
///
/// `custom_bpm` / `custom_key` sustituyen a los valores de la canción solo
/// para esta actuación.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetlistSong {
  /// Posición 1-based dentro del setlist.
  pub position: u32,
  pub song: Song,
  pub custom_bpm: Option<i32>,
  pub custom_key: Option<String>,
  pub performance_notes: Option<String>,
  pub transition_notes: Option<String>,
  pub is_encore: bool,
  pub is_optional: bool,
}

impl SetlistSong {
  pub fn new(position: u32, song: Song) -> Self {
    Self::with_options(position, song, SetlistSongOptions::default())
  }

  pub fn with_options(position: u32, song: Song, options: SetlistSongOptions) -> Self {
    SetlistSong {
      position,
      song,
      custom_bpm: options.custom_bpm,
      custom_key: options.custom_key,
      performance_notes: options.performance_notes,
      transition_notes: options.transition_notes,
      is_encore: options.is_encore,
      is_optional: options.is_optional,
    }
  }

  /// BPM para esta actuación: el override si existe, si no el de la canción.
  pub fn effective_bpm(&self) -> Option<i32> {
    self.custom_bpm.or(self.song.bpm)
  }

  /// Tonalidad para esta actuación, con la misma regla que [`Self::effective_bpm`].
  pub fn effective_key(&self) -> Option<&str> {
    self.custom_key.as_deref().or(self.song.musical_key.as_deref())
  }
}

/// Datos editables de un setlist (alta y modificación).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSetlist {
  pub name: String,
  pub description: Option<String>,
  pub venue: Option<String>,
  pub performance_date: Option<NaiveDateTime>,
  pub expected_duration_minutes: Option<i32>,
}

/// Ajustes por actuación al añadir una canción a un setlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetlistSongOptions {
  pub custom_bpm: Option<i32>,
  pub custom_key: Option<String>,
  pub performance_notes: Option<String>,
  pub transition_notes: Option<String>,
  pub is_encore: bool,
  pub is_optional: bool,
}
