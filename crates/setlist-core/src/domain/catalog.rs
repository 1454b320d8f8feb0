use serde::{Deserialize, Serialize};

use crate::domain::song::Song;

/// Tamaño de página por defecto para listados.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Tamaño máximo de página aceptado.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Criterios de búsqueda sobre el catálogo de un usuario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongFilter {
  /// Texto libre; busca en título, artista y álbum sin distinguir mayúsculas.
  pub search: Option<String>,
  pub genre: Option<String>,
  pub musical_key: Option<String>,
  pub difficulty: Option<i32>,
  /// Subcadena dentro del campo de etiquetas.
  pub tag: Option<String>,
  /// Página 1-based.
  pub page: u32,
  pub page_size: u32,
}

impl Default for SongFilter {
  fn default() -> Self {
    SongFilter {
      search: None,
      genre: None,
      musical_key: None,
      difficulty: None,
      tag: None,
      page: 1,
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

impl SongFilter {
  /// Copia con página y tamaño dentro de rango y textos vacíos descartados.
  pub fn normalized(&self) -> SongFilter {
    fn clean(value: &Option<String>) -> Option<String> {
      value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
    }

    SongFilter {
      search: clean(&self.search),
      genre: clean(&self.genre),
      musical_key: clean(&self.musical_key),
      difficulty: self.difficulty,
      tag: clean(&self.tag),
      page: self.page.max(1),
      page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
    }
  }

  pub fn offset(&self) -> u64 {
    u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
  }

  /// Evaluación en memoria del filtro (sin paginar).
  ///
  /// Los adapters SQL traducen las mismas reglas a su consulta.
  pub fn matches(&self, song: &Song) -> bool {
    if let Some(search) = &self.search {
      let needle = search.to_lowercase();
      let hit = song.title.to_lowercase().contains(&needle)
        || song.artist.to_lowercase().contains(&needle)
        || song.album.as_deref().is_some_and(|a| a.to_lowercase().contains(&needle));
      if !hit {
        return false;
      }
    }

    if let Some(genre) = &self.genre {
      if song.genre.as_deref() != Some(genre.as_str()) {
        return false;
      }
    }

    if let Some(key) = &self.musical_key {
      if song.musical_key.as_deref() != Some(key.as_str()) {
        return false;
      }
    }

    if let Some(difficulty) = self.difficulty {
      if song.difficulty_rating != Some(difficulty) {
        return false;
      }
    }

    if let Some(tag) = &self.tag {
      if !song.tags.as_deref().is_some_and(|t| t.contains(tag.as_str())) {
        return false;
      }
    }

    true
  }
}

/// Una página de resultados más el total sin paginar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub total: u64,
  pub page: u32,
  pub page_size: u32,
}

impl<T> Page<T> {
  pub fn total_pages(&self) -> u64 {
    if self.page_size == 0 {
      return 0;
    }
    self.total.div_ceil(u64::from(self.page_size))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn song(title: &str, artist: &str) -> Song {
    Song::new(title, artist, "user-1")
  }

  #[test]
  fn normalized_clamps_paging() {
    let filter = SongFilter { page: 0, page_size: 1000, ..Default::default() }.normalized();
    assert_eq!(filter.page, 1);
    assert_eq!(filter.page_size, MAX_PAGE_SIZE);

    let filter = SongFilter { page_size: 0, ..Default::default() }.normalized();
    assert_eq!(filter.page_size, 1);
  }

  #[test]
  fn normalized_drops_blank_text() {
    let filter = SongFilter { search: Some("   ".to_string()), ..Default::default() }.normalized();
    assert_eq!(filter.search, None);
  }

  #[test]
  fn offset_is_zero_based() {
    let filter = SongFilter { page: 3, page_size: 10, ..Default::default() };
    assert_eq!(filter.offset(), 20);
  }

  #[test]
  fn search_is_case_insensitive_over_title_artist_album() {
    let filter = SongFilter { search: Some("queen".to_string()), ..Default::default() };

    assert!(filter.matches(&song("Bohemian Rhapsody", "Queen")));
    assert!(filter.matches(&song("Dancing QUEEN", "ABBA")));

    let mut on_album = song("Track", "Someone");
    on_album.album = Some("Queen of the Night".to_string());
    assert!(filter.matches(&on_album));

    assert!(!filter.matches(&song("Yesterday", "The Beatles")));
  }

  #[test]
  fn exact_filters_require_value() {
    let mut rock = song("A", "B");
    rock.genre = Some("Rock".to_string());
    rock.difficulty_rating = Some(3);

    let genre = SongFilter { genre: Some("Rock".to_string()), ..Default::default() };
    assert!(genre.matches(&rock));
    assert!(!genre.matches(&song("C", "D")));

    let difficulty = SongFilter { difficulty: Some(4), ..Default::default() };
    assert!(!difficulty.matches(&rock));
  }

  #[test]
  fn tag_filter_matches_substring() {
    let mut tagged = song("A", "B");
    tagged.tags = Some("jazz, live".to_string());

    let filter = SongFilter { tag: Some("live".to_string()), ..Default::default() };
    assert!(filter.matches(&tagged));
    assert!(!filter.matches(&song("C", "D")));
  }

  #[test]
  fn total_pages_rounds_up() {
    let page: Page<()> = Page { items: vec![], total: 41, page: 1, page_size: 20 };
    assert_eq!(page.total_pages(), 3);
  }
}
