//! Dobles de prueba: repositorio en memoria y reloj fijo.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::catalog::{Page, SongFilter};
use crate::domain::ids::{SetlistId, SongId};
use crate::domain::setlist::{Setlist, SetlistSong};
use crate::domain::song::Song;
use crate::ports::{Clock, RepoError, SetlistRepository, SongRepository};

/// Reloj que devuelve siempre la misma hora hasta que se avanza a mano.
pub struct FixedClock {
  now: Cell<DateTime<Utc>>,
}

impl FixedClock {
  pub fn at(now: DateTime<Utc>) -> Self {
    Self { now: Cell::new(now) }
  }

  pub fn advance(&self, by: Duration) {
    self.now.set(self.now.get() + by);
  }
}

impl Default for FixedClock {
  fn default() -> Self {
    Self::at(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    self.now.get()
  }
}

/// Entrada guardada: la canción se referencia por id, como en una tabla.
#[derive(Clone)]
struct StoredEntry {
  song_id: SongId,
  entry: SetlistSong,
}

/// Repositorio en memoria con la misma semántica que el adapter SQLite.
#[derive(Default)]
pub struct InMemoryStore {
  songs: RefCell<BTreeMap<SongId, Song>>,
  setlists: RefCell<BTreeMap<SetlistId, Setlist>>,
  entries: RefCell<BTreeMap<SetlistId, Vec<StoredEntry>>>,
  pub fail_writes: Cell<bool>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_songs(songs: impl IntoIterator<Item = Song>) -> Self {
    let store = Self::new();
    for song in songs {
      store.songs.borrow_mut().insert(song.id, song);
    }
    store
  }

  /// Guarda un setlist completo (cabecera, canciones y entradas).
  pub fn put_setlist(&self, setlist: Setlist) {
    let stored: Vec<StoredEntry> = setlist
      .songs
      .iter()
      .map(|entry| StoredEntry { song_id: entry.song.id, entry: entry.clone() })
      .collect();

    let mut songs = self.songs.borrow_mut();
    for entry in &setlist.songs {
      songs.entry(entry.song.id).or_insert_with(|| entry.song.clone());
    }

    self.entries.borrow_mut().insert(setlist.id, stored);
    self.setlists.borrow_mut().insert(setlist.id, Setlist { songs: vec![], ..setlist });
  }

  pub fn song_count(&self) -> usize {
    self.songs.borrow().len()
  }

  fn check_writable(&self) -> Result<(), RepoError> {
    if self.fail_writes.get() {
      return Err(RepoError::Storage("disk full".to_string()));
    }
    Ok(())
  }

  fn hydrate(&self, header: &Setlist) -> Setlist {
    let songs = self.songs.borrow();
    let mut entries: Vec<SetlistSong> = self
      .entries
      .borrow()
      .get(&header.id)
      .map(|stored| {
        stored
          .iter()
          .filter_map(|s| {
            let song = songs.get(&s.song_id)?.clone();
            Some(SetlistSong { song, ..s.entry.clone() })
          })
          .collect()
      })
      .unwrap_or_default();
    entries.sort_by_key(|e| e.position);

    Setlist { songs: entries, ..header.clone() }
  }
}

impl SongRepository for InMemoryStore {
  fn find_song(&self, id: SongId) -> Result<Option<Song>, RepoError> {
    Ok(self.songs.borrow().get(&id).cloned())
  }

  fn list_songs(&self, user_id: &str, filter: &SongFilter) -> Result<Page<Song>, RepoError> {
    let mut matching: Vec<Song> = self
      .songs
      .borrow()
      .values()
      .filter(|s| s.user_id == user_id && filter.matches(s))
      .cloned()
      .collect();
    matching.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.artist.cmp(&b.artist)));

    let total = matching.len() as u64;
    let items = matching
      .into_iter()
      .skip(filter.offset() as usize)
      .take(filter.page_size as usize)
      .collect();

    Ok(Page { items, total, page: filter.page, page_size: filter.page_size })
  }

  fn list_song_tags(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
    Ok(
      self
        .songs
        .borrow()
        .values()
        .filter(|s| s.user_id == user_id)
        .filter_map(|s| s.tags.clone())
        .collect(),
    )
  }

  fn insert_song(&self, song: &Song) -> Result<(), RepoError> {
    self.check_writable()?;
    self.songs.borrow_mut().insert(song.id, song.clone());
    Ok(())
  }

  fn update_song(&self, song: &Song) -> Result<(), RepoError> {
    self.check_writable()?;
    let mut songs = self.songs.borrow_mut();
    let slot = songs.get_mut(&song.id).ok_or(RepoError::NotFound)?;
    *slot = song.clone();
    Ok(())
  }

  fn delete_song(&self, id: SongId) -> Result<bool, RepoError> {
    self.check_writable()?;
    for stored in self.entries.borrow_mut().values_mut() {
      stored.retain(|s| s.song_id != id);
    }
    Ok(self.songs.borrow_mut().remove(&id).is_some())
  }
}

impl SetlistRepository for InMemoryStore {
  fn find_setlist(&self, id: SetlistId) -> Result<Option<Setlist>, RepoError> {
    let header = self.setlists.borrow().get(&id).cloned();
    Ok(header.map(|h| self.hydrate(&h)))
  }

  fn list_setlists(&self, user_id: &str) -> Result<Vec<Setlist>, RepoError> {
    let headers: Vec<Setlist> =
      self.setlists.borrow().values().filter(|s| s.user_id == user_id).cloned().collect();
    Ok(headers.iter().map(|h| self.hydrate(h)).collect())
  }

  fn insert_setlist(&self, setlist: &Setlist) -> Result<(), RepoError> {
    self.check_writable()?;
    self.setlists.borrow_mut().insert(setlist.id, Setlist { songs: vec![], ..setlist.clone() });
    Ok(())
  }

  fn update_setlist(&self, setlist: &Setlist) -> Result<(), RepoError> {
    self.check_writable()?;
    let mut setlists = self.setlists.borrow_mut();
    let slot = setlists.get_mut(&setlist.id).ok_or(RepoError::NotFound)?;
    *slot = Setlist { songs: vec![], ..setlist.clone() };
    Ok(())
  }

  fn delete_setlist(&self, id: SetlistId) -> Result<bool, RepoError> {
    self.check_writable()?;
    self.entries.borrow_mut().remove(&id);
    Ok(self.setlists.borrow_mut().remove(&id).is_some())
  }

  fn insert_entry(&self, setlist_id: SetlistId, entry: &SetlistSong) -> Result<(), RepoError> {
    self.check_writable()?;
    if !self.setlists.borrow().contains_key(&setlist_id) {
      return Err(RepoError::NotFound);
    }
    self
      .entries
      .borrow_mut()
      .entry(setlist_id)
      .or_default()
      .push(StoredEntry { song_id: entry.song.id, entry: entry.clone() });
    Ok(())
  }

  fn replace_entries(&self, setlist_id: SetlistId, entries: &[SetlistSong]) -> Result<(), RepoError> {
    self.check_writable()?;
    let stored =
      entries.iter().map(|e| StoredEntry { song_id: e.song.id, entry: e.clone() }).collect();
    self.entries.borrow_mut().insert(setlist_id, stored);
    Ok(())
  }
}
