use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

use setlist_core::domain::ids::{SetlistId, SongId};
use setlist_core::domain::setlist::{Setlist, SetlistSong};
use setlist_core::domain::song::Song;
use setlist_core::ports::RepoError;

use crate::schema::{setlist_songs, setlists, songs};

/// Formato de `performance_date` en la base (hora local del concierto, sin zona).
const PERFORMANCE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn corrupt(what: &str, value: &str, err: impl std::fmt::Display) -> RepoError {
  RepoError::Storage(format!("invalid {what} in DB ({value}): {err}"))
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
  ts.to_rfc3339()
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepoError> {
  DateTime::parse_from_rfc3339(value)
    .map(|ts| ts.with_timezone(&Utc))
    .map_err(|e| corrupt("timestamp", value, e))
}

fn parse_optional_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>, RepoError> {
  value.as_deref().map(parse_timestamp).transpose()
}

fn format_performance_date(date: &NaiveDateTime) -> String {
  date.format(PERFORMANCE_DATE_FORMAT).to_string()
}

fn parse_performance_date(value: &str) -> Result<NaiveDateTime, RepoError> {
  NaiveDateTime::parse_from_str(value, PERFORMANCE_DATE_FORMAT)
    .map_err(|e| corrupt("performance date", value, e))
}

fn position_to_db(position: u32) -> Result<i32, RepoError> {
  i32::try_from(position).map_err(|e| corrupt("position", &position.to_string(), e))
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = songs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct SongRow {
  pub id: String,
  pub user_id: String,
  pub title: String,
  pub artist: String,
  pub album: Option<String>,
  pub genre: Option<String>,
  pub musical_key: Option<String>,
  pub notes: Option<String>,
  pub tags: Option<String>,
  pub bpm: Option<i32>,
  pub duration_seconds: Option<i32>,
  pub difficulty_rating: Option<i32>,
  pub created_at: String,
  pub updated_at: Option<String>,
}

impl From<&Song> for SongRow {
  fn from(song: &Song) -> Self {
    SongRow {
      id: song.id.to_string(),
      user_id: song.user_id.clone(),
      title: song.title.clone(),
      artist: song.artist.clone(),
      album: song.album.clone(),
      genre: song.genre.clone(),
      musical_key: song.musical_key.clone(),
      notes: song.notes.clone(),
      tags: song.tags.clone(),
      bpm: song.bpm,
      duration_seconds: song.duration_seconds,
      difficulty_rating: song.difficulty_rating,
      created_at: format_timestamp(&song.created_at),
      updated_at: song.updated_at.as_ref().map(format_timestamp),
    }
  }
}

impl TryFrom<SongRow> for Song {
  type Error = RepoError;

  fn try_from(row: SongRow) -> Result<Self, Self::Error> {
    Ok(Song {
      id: row.id.parse::<SongId>().map_err(|e| corrupt("song id", &row.id, e))?,
      created_at: parse_timestamp(&row.created_at)?,
      updated_at: parse_optional_timestamp(row.updated_at)?,
      user_id: row.user_id,
      title: row.title,
      artist: row.artist,
      album: row.album,
      genre: row.genre,
      musical_key: row.musical_key,
      notes: row.notes,
      tags: row.tags,
      bpm: row.bpm,
      duration_seconds: row.duration_seconds,
      difficulty_rating: row.difficulty_rating,
    })
  }
}

/// Cabecera de un setlist; las entradas viven en `setlist_songs`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = setlists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct SetlistRow {
  pub id: String,
  pub user_id: String,
  pub name: String,
  pub description: Option<String>,
  pub venue: Option<String>,
  pub performance_date: Option<String>,
  pub expected_duration_minutes: Option<i32>,
  pub created_at: String,
  pub updated_at: Option<String>,
}

impl From<&Setlist> for SetlistRow {
  fn from(setlist: &Setlist) -> Self {
    SetlistRow {
      id: setlist.id.to_string(),
      user_id: setlist.user_id.clone(),
      name: setlist.name.clone(),
      description: setlist.description.clone(),
      venue: setlist.venue.clone(),
      performance_date: setlist.performance_date.as_ref().map(format_performance_date),
      expected_duration_minutes: setlist.expected_duration_minutes,
      created_at: format_timestamp(&setlist.created_at),
      updated_at: setlist.updated_at.as_ref().map(format_timestamp),
    }
  }
}

impl SetlistRow {
  /// Convierte la cabecera y le adjunta las entradas ya cargadas.
  pub fn into_setlist(self, songs: Vec<SetlistSong>) -> Result<Setlist, RepoError> {
    Ok(Setlist {
      id: self.id.parse::<SetlistId>().map_err(|e| corrupt("setlist id", &self.id, e))?,
      performance_date: self.performance_date.as_deref().map(parse_performance_date).transpose()?,
      created_at: parse_timestamp(&self.created_at)?,
      updated_at: parse_optional_timestamp(self.updated_at)?,
      name: self.name,
      description: self.description,
      venue: self.venue,
      expected_duration_minutes: self.expected_duration_minutes,
      user_id: self.user_id,
      songs,
    })
  }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = setlist_songs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SetlistSongRow {
  pub setlist_id: String,
  pub position: i32,
  pub song_id: String,
  pub custom_bpm: Option<i32>,
  pub custom_key: Option<String>,
  pub performance_notes: Option<String>,
  pub transition_notes: Option<String>,
  pub is_encore: bool,
  pub is_optional: bool,
}

impl SetlistSongRow {
  pub fn from_entry(setlist_id: SetlistId, entry: &SetlistSong) -> Result<Self, RepoError> {
    Ok(SetlistSongRow {
      setlist_id: setlist_id.to_string(),
      position: position_to_db(entry.position)?,
      song_id: entry.song.id.to_string(),
      custom_bpm: entry.custom_bpm,
      custom_key: entry.custom_key.clone(),
      performance_notes: entry.performance_notes.clone(),
      transition_notes: entry.transition_notes.clone(),
      is_encore: entry.is_encore,
      is_optional: entry.is_optional,
    })
  }

  /// Une la fila de la entrada con su canción (resultado del join).
  pub fn into_entry(self, song: Song) -> Result<SetlistSong, RepoError> {
    let position =
      u32::try_from(self.position).map_err(|e| corrupt("position", &self.position.to_string(), e))?;

    Ok(SetlistSong {
      position,
      song,
      custom_bpm: self.custom_bpm,
      custom_key: self.custom_key,
      performance_notes: self.performance_notes,
      transition_notes: self.transition_notes,
      is_encore: self.is_encore,
      is_optional: self.is_optional,
    })
  }
}
