//! Reglas de validación de canciones y setlists.
//!
//! Las funciones `validate_*` acumulan todos los mensajes aplicables;
//! [`ensure_valid`] convierte la lista en el error que devuelven los
//! servicios (solo con el primer mensaje).

use crate::domain::setlist::{NewSetlist, SetlistSongOptions};
use crate::domain::song::Song;
use crate::errors::CoreError;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_ARTIST_CHARS: usize = 200;
pub const MAX_ALBUM_CHARS: usize = 200;
pub const MAX_GENRE_CHARS: usize = 50;
pub const MAX_KEY_CHARS: usize = 10;
pub const MAX_NOTES_CHARS: usize = 2000;
pub const MAX_TAGS_CHARS: usize = 500;

pub const BPM_RANGE: std::ops::RangeInclusive<i32> = 40..=250;
pub const DURATION_RANGE: std::ops::RangeInclusive<i32> = 1..=3600;
pub const DIFFICULTY_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

pub const MAX_SETLIST_NAME_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;
pub const MAX_VENUE_CHARS: usize = 200;
pub const MAX_ENTRY_NOTES_CHARS: usize = 500;
pub const EXPECTED_DURATION_RANGE: std::ops::RangeInclusive<i32> = 1..=1440;

pub const SONG_NULL: &str = "Song cannot be null";
pub const TITLE_REQUIRED: &str = "Song title is required";
pub const TITLE_TOO_LONG: &str = "Song title cannot exceed 200 characters";
pub const ARTIST_REQUIRED: &str = "Artist name is required";
pub const ARTIST_TOO_LONG: &str = "Artist name cannot exceed 200 characters";
pub const ALBUM_TOO_LONG: &str = "Album name cannot exceed 200 characters";
pub const GENRE_TOO_LONG: &str = "Genre cannot exceed 50 characters";
pub const KEY_TOO_LONG: &str = "Musical key cannot exceed 10 characters";
pub const NOTES_TOO_LONG: &str = "Notes cannot exceed 2000 characters";
pub const TAGS_TOO_LONG: &str = "Tags cannot exceed 500 characters";
pub const BPM_OUT_OF_RANGE: &str = "BPM must be between 40 and 250";
pub const DURATION_OUT_OF_RANGE: &str = "Duration must be between 1 second and 1 hour";
pub const DIFFICULTY_OUT_OF_RANGE: &str = "Difficulty rating must be between 1 and 5";
pub const USER_ID_REQUIRED: &str = "User ID is required";

pub const SETLIST_NAME_REQUIRED: &str = "Setlist name is required";
pub const SETLIST_NAME_TOO_LONG: &str = "Setlist name cannot exceed 200 characters";
pub const DESCRIPTION_TOO_LONG: &str = "Description cannot exceed 1000 characters";
pub const VENUE_TOO_LONG: &str = "Venue cannot exceed 200 characters";
pub const EXPECTED_DURATION_OUT_OF_RANGE: &str =
  "Expected duration must be between 1 and 1440 minutes";
pub const PERFORMANCE_NOTES_TOO_LONG: &str = "Performance notes cannot exceed 500 characters";
pub const TRANSITION_NOTES_TOO_LONG: &str = "Transition notes cannot exceed 500 characters";

fn is_blank(value: &str) -> bool {
  value.trim().is_empty()
}

// Longitud en caracteres Unicode, no en bytes.
fn exceeds(value: &str, max: usize) -> bool {
  value.chars().count() > max
}

fn check_required(errors: &mut Vec<String>, value: &str, max: usize, required: &str, too_long: &str) {
  if is_blank(value) {
    errors.push(required.to_string());
  } else if exceeds(value, max) {
    errors.push(too_long.to_string());
  }
}

fn check_optional_len(errors: &mut Vec<String>, value: Option<&str>, max: usize, message: &str) {
  if value.is_some_and(|v| exceeds(v, max)) {
    errors.push(message.to_string());
  }
}

fn check_optional_range(
  errors: &mut Vec<String>,
  value: Option<i32>,
  range: std::ops::RangeInclusive<i32>,
  message: &str,
) {
  if value.is_some_and(|v| !range.contains(&v)) {
    errors.push(message.to_string());
  }
}

/// Valida una canción y devuelve todos los mensajes de error (vacío = válida).
///
/// Una canción ausente produce exactamente `"Song cannot be null"`.
pub fn validate_song(song: Option<&Song>) -> Vec<String> {
  let Some(song) = song else {
    return vec![SONG_NULL.to_string()];
  };

  let mut errors = Vec::new();

  check_required(&mut errors, &song.title, MAX_TITLE_CHARS, TITLE_REQUIRED, TITLE_TOO_LONG);
  check_required(&mut errors, &song.artist, MAX_ARTIST_CHARS, ARTIST_REQUIRED, ARTIST_TOO_LONG);

  check_optional_len(&mut errors, song.album.as_deref(), MAX_ALBUM_CHARS, ALBUM_TOO_LONG);
  check_optional_len(&mut errors, song.genre.as_deref(), MAX_GENRE_CHARS, GENRE_TOO_LONG);
  check_optional_len(&mut errors, song.musical_key.as_deref(), MAX_KEY_CHARS, KEY_TOO_LONG);
  check_optional_len(&mut errors, song.notes.as_deref(), MAX_NOTES_CHARS, NOTES_TOO_LONG);
  check_optional_len(&mut errors, song.tags.as_deref(), MAX_TAGS_CHARS, TAGS_TOO_LONG);

  check_optional_range(&mut errors, song.bpm, BPM_RANGE, BPM_OUT_OF_RANGE);
  check_optional_range(&mut errors, song.duration_seconds, DURATION_RANGE, DURATION_OUT_OF_RANGE);
  check_optional_range(&mut errors, song.difficulty_rating, DIFFICULTY_RANGE, DIFFICULTY_OUT_OF_RANGE);

  if is_blank(&song.user_id) {
    errors.push(USER_ID_REQUIRED.to_string());
  }

  errors
}

/// Valida los datos editables de un setlist.
pub fn validate_setlist(draft: &NewSetlist) -> Vec<String> {
  let mut errors = Vec::new();

  check_required(
    &mut errors,
    &draft.name,
    MAX_SETLIST_NAME_CHARS,
    SETLIST_NAME_REQUIRED,
    SETLIST_NAME_TOO_LONG,
  );
  check_optional_len(&mut errors, draft.description.as_deref(), MAX_DESCRIPTION_CHARS, DESCRIPTION_TOO_LONG);
  check_optional_len(&mut errors, draft.venue.as_deref(), MAX_VENUE_CHARS, VENUE_TOO_LONG);
  check_optional_range(
    &mut errors,
    draft.expected_duration_minutes,
    EXPECTED_DURATION_RANGE,
    EXPECTED_DURATION_OUT_OF_RANGE,
  );

  errors
}

/// Valida los overrides de una entrada de setlist.
///
/// BPM y tonalidad siguen los mismos límites que en la canción.
pub fn validate_entry_options(options: &SetlistSongOptions) -> Vec<String> {
  let mut errors = Vec::new();

  check_optional_range(&mut errors, options.custom_bpm, BPM_RANGE, BPM_OUT_OF_RANGE);
  check_optional_len(&mut errors, options.custom_key.as_deref(), MAX_KEY_CHARS, KEY_TOO_LONG);
  check_optional_len(
    &mut errors,
    options.performance_notes.as_deref(),
    MAX_ENTRY_NOTES_CHARS,
    PERFORMANCE_NOTES_TOO_LONG,
  );
  check_optional_len(
    &mut errors,
    options.transition_notes.as_deref(),
    MAX_ENTRY_NOTES_CHARS,
    TRANSITION_NOTES_TOO_LONG,
  );

  errors
}

/// `Ok(())` si no hay errores; si no, `CoreError::Validation` con el primero.
pub fn ensure_valid(errors: Vec<String>) -> Result<(), CoreError> {
  match errors.into_iter().next() {
    None => Ok(()),
    Some(first) => Err(CoreError::Validation(first)),
  }
}
