use std::borrow::Cow;
use std::io;

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};

use crate::domain::setlist::{Setlist, SetlistSong};
use crate::errors::CoreError;

/// Columnas en el orden en que se escriben.
pub const COLUMNS: [&str; 12] = [
  "Position",
  "Title",
  "Artist",
  "Key",
  "BPM",
  "Duration (sec)",
  "Genre",
  "Difficulty",
  "Notes",
  "Transition Notes",
  "Encore",
  "Optional",
];

/// Cabecera de columnas. Los consumidores existentes dependen del texto exacto.
pub const COLUMN_HEADER: &str =
  "Position,Title,Artist,Key,BPM,Duration (sec),Genre,Difficulty,Notes,Transition Notes,Encore,Optional";

const METADATA_PREFIX: &str = "# ";

/// Writer RFC 4180 con `\n` como fin de registro y comillas solo donde hacen falta.
fn csv_writer<W: io::Write>(out: W) -> Writer<W> {
  WriterBuilder::new()
    .terminator(Terminator::Any(b'\n'))
    .quote_style(QuoteStyle::Necessary)
    .from_writer(out)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>, CoreError> {
  writer.into_inner().map_err(|e| CoreError::Io(e.into_error()))
}

/// Escapado de un campo suelto, con las mismas reglas que las filas.
///
/// Si el campo contiene coma, comilla doble o salto de línea se envuelve en
/// comillas y las comillas internas se duplican. Si no, se devuelve tal cual.
pub fn escape_field(value: &str) -> Result<Cow<'_, str>, CoreError> {
  if value.is_empty() {
    return Ok(Cow::Borrowed(value));
  }

  let mut writer = csv_writer(Vec::new());
  writer.write_field(value)?;
  let encoded = String::from_utf8(finish(writer)?)
    .map_err(|e| CoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;

  if encoded == value { Ok(Cow::Borrowed(value)) } else { Ok(Cow::Owned(encoded)) }
}

fn text(value: Option<&str>) -> String {
  value.map(str::to_string).unwrap_or_default()
}

fn number(value: Option<i32>) -> String {
  value.map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: bool) -> String {
  let label = if value { "Yes" } else { "No" };
  label.to_string()
}

/// Valor de metadatos en una sola línea: los saltos de línea pasan a espacio.
fn present(value: Option<&str>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty()).map(single_line)
}

fn single_line(value: &str) -> String {
  value.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

fn metadata_lines(setlist: &Setlist) -> Vec<String> {
  let mut lines = vec![format!("{METADATA_PREFIX}Name: {}", single_line(&setlist.name))];

  if let Some(description) = present(setlist.description.as_deref()) {
    lines.push(format!("{METADATA_PREFIX}Description: {description}"));
  }
  if let Some(venue) = present(setlist.venue.as_deref()) {
    lines.push(format!("{METADATA_PREFIX}Venue: {venue}"));
  }
  if let Some(date) = setlist.performance_date {
    lines.push(format!("{METADATA_PREFIX}Performance Date: {}", date.format("%Y-%m-%d")));
  }
  if let Some(minutes) = setlist.expected_duration_minutes {
    lines.push(format!("{METADATA_PREFIX}Expected Duration: {minutes} minutes"));
  }
  lines.push(format!("{METADATA_PREFIX}Total Songs: {}", setlist.total_songs()));

  lines
}

fn row(entry: &SetlistSong) -> [String; 12] {
  let song = &entry.song;

  [
    entry.position.to_string(),
    song.title.clone(),
    song.artist.clone(),
    text(entry.effective_key()),
    number(entry.effective_bpm()),
    number(song.duration_seconds),
    text(song.genre.as_deref()),
    number(song.difficulty_rating),
    text(entry.performance_notes.as_deref()),
    text(entry.transition_notes.as_deref()),
    flag(entry.is_encore),
    flag(entry.is_optional),
  ]
}

/// Serializa un setlist a CSV UTF-8 (`\n` como fin de línea).
///
/// Bloque de metadatos con prefijo `# `, línea en blanco, cabecera de
/// columnas y una fila por entrada en orden de posición.
pub fn render_setlist_csv(setlist: &Setlist) -> Result<Vec<u8>, CoreError> {
  let mut out = Vec::new();
  for line in metadata_lines(setlist) {
    out.extend_from_slice(line.as_bytes());
    out.push(b'\n');
  }
  out.push(b'\n');

  let mut writer = csv_writer(out);
  writer.write_record(COLUMNS)?;
  for entry in setlist.ordered_songs() {
    writer.write_record(row(entry))?;
  }

  finish(writer)
}
