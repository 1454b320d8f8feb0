use chrono::NaiveDate;

use crate::domain::setlist::Setlist;

/// Máximo de caracteres del nombre dentro del archivo.
pub const MAX_NAME_CHARS: usize = 50;

const ILLEGAL_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

fn sanitize_name(name: &str) -> String {
  let cleaned: String = name
    .trim()
    .chars()
    .map(|c| if ILLEGAL_CHARS.contains(&c) || c.is_control() || c.is_whitespace() { '_' } else { c })
    .take(MAX_NAME_CHARS)
    .collect();

  if cleaned.is_empty() { "untitled".to_string() } else { cleaned }
}

/// `setlist_{nombre}_{yyyy-MM-dd}.csv`.
///
/// La fecha es la de la actuación; si no hay, `today`.
pub fn setlist_filename(setlist: &Setlist, today: NaiveDate) -> String {
  let date = setlist.performance_date.map(|d| d.date()).unwrap_or(today);
  format!("setlist_{}_{}.csv", sanitize_name(&setlist.name), date.format("%Y-%m-%d"))
}
