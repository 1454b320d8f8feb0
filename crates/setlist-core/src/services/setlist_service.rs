use std::cmp::Reverse;

use tracing::{debug, info, warn};

use crate::domain::ids::{SetlistId, SongId};
use crate::domain::ownership::owned_by;
use crate::domain::setlist::{NewSetlist, Setlist, SetlistSong, SetlistSongOptions};
use crate::errors::{CoreError, map_repo_error};
use crate::ports::{Clock, SetlistRepository, SongRepository};
use crate::services::require_user;
use crate::validation::{ensure_valid, validate_entry_options, validate_setlist};

/// Alta, edición y composición de setlists.
///
/// Cada operación comprueba primero que el setlist (y la canción, cuando
/// aplica) pertenece al usuario; si no, responde como si no existiera.
pub struct SetlistService<S, R, C>
where
  S: SetlistRepository,
  R: SongRepository,
  C: Clock,
{
  setlists: S,
  songs: R,
  clock: C,
}

impl<S, R, C> SetlistService<S, R, C>
where
  S: SetlistRepository,
  R: SongRepository,
  C: Clock,
{
  pub fn new(setlists: S, songs: R, clock: C) -> Self {
    Self { setlists, songs, clock }
  }

  // -------- COMMAND (write) --------

  pub fn create_setlist(&self, draft: NewSetlist, user_id: &str) -> Result<Setlist, CoreError> {
    require_user(user_id)?;
    check(validate_setlist(&draft))?;

    let setlist = Setlist {
      id: SetlistId::new(),
      name: draft.name,
      description: draft.description,
      venue: draft.venue,
      performance_date: draft.performance_date,
      expected_duration_minutes: draft.expected_duration_minutes,
      user_id: user_id.to_string(),
      songs: Vec::new(),
      created_at: self.clock.now(),
      updated_at: None,
    };

    self.setlists.insert_setlist(&setlist).map_err(map_repo_error)?;
    info!(setlist_id = %setlist.id, user_id, "setlist created");

    Ok(setlist)
  }

  /// Reemplaza los datos editables. Las entradas no se tocan.
  pub fn update_setlist(
    &self,
    id: SetlistId,
    draft: NewSetlist,
    user_id: &str,
  ) -> Result<Option<Setlist>, CoreError> {
    require_user(user_id)?;
    check(validate_setlist(&draft))?;

    let Some(mut setlist) = self.find_owned(id, user_id)? else {
      return Ok(None);
    };

    setlist.name = draft.name;
    setlist.description = draft.description;
    setlist.venue = draft.venue;
    setlist.performance_date = draft.performance_date;
    setlist.expected_duration_minutes = draft.expected_duration_minutes;
    setlist.updated_at = Some(self.clock.now());

    self.setlists.update_setlist(&setlist).map_err(map_repo_error)?;
    info!(setlist_id = %id, user_id, "setlist updated");

    Ok(Some(setlist))
  }

  pub fn delete_setlist(&self, id: SetlistId, user_id: &str) -> Result<bool, CoreError> {
    require_user(user_id)?;

    if self.find_owned(id, user_id)?.is_none() {
      return Ok(false);
    }

    let deleted = self.setlists.delete_setlist(id).map_err(map_repo_error)?;
    info!(setlist_id = %id, user_id, deleted, "setlist deleted");
    Ok(deleted)
  }

  /// Añade una canción al final del setlist.
  ///
  /// `Ok(None)` si el setlist o la canción no existen o no son del usuario.
  pub fn add_song(
    &self,
    setlist_id: SetlistId,
    song_id: SongId,
    options: SetlistSongOptions,
    user_id: &str,
  ) -> Result<Option<SetlistSong>, CoreError> {
    require_user(user_id)?;
    check(validate_entry_options(&options))?;

    let Some(mut setlist) = self.find_owned(setlist_id, user_id)? else {
      return Ok(None);
    };

    let song = self.songs.find_song(song_id).map_err(map_repo_error)?;
    let Some(song) = owned_by(song, user_id) else {
      debug!(%setlist_id, %song_id, user_id, "add skipped: song not found for user");
      return Ok(None);
    };

    let entry = SetlistSong::with_options(setlist.next_position(), song, options);
    self.setlists.insert_entry(setlist_id, &entry).map_err(map_repo_error)?;

    setlist.updated_at = Some(self.clock.now());
    self.setlists.update_setlist(&setlist).map_err(map_repo_error)?;
    info!(%setlist_id, %song_id, position = entry.position, "song added to setlist");

    Ok(Some(entry))
  }

  /// Quita la entrada en `position` y renumera las siguientes (1..n).
  ///
  /// `false` si el setlist no es del usuario o la posición no existe.
  pub fn remove_song(
    &self,
    setlist_id: SetlistId,
    position: u32,
    user_id: &str,
  ) -> Result<bool, CoreError> {
    require_user(user_id)?;

    let Some(mut setlist) = self.find_owned(setlist_id, user_id)? else {
      return Ok(false);
    };

    let before = setlist.songs.len();
    setlist.songs.retain(|entry| entry.position != position);
    if setlist.songs.len() == before {
      return Ok(false);
    }

    setlist.songs.sort_by_key(|entry| entry.position);
    for (index, entry) in setlist.songs.iter_mut().enumerate() {
      entry.position = index as u32 + 1;
    }

    self.setlists.replace_entries(setlist_id, &setlist.songs).map_err(map_repo_error)?;

    setlist.updated_at = Some(self.clock.now());
    self.setlists.update_setlist(&setlist).map_err(map_repo_error)?;
    info!(%setlist_id, position, "song removed from setlist");

    Ok(true)
  }

  // -------- QUERY (read) --------

  pub fn get_setlist(&self, id: SetlistId, user_id: &str) -> Result<Option<Setlist>, CoreError> {
    require_user(user_id)?;
    self.find_owned(id, user_id)
  }

  /// Setlists del usuario: fecha de actuación más reciente primero, los que
  /// no tienen fecha al final (por nombre).
  pub fn list_setlists(&self, user_id: &str) -> Result<Vec<Setlist>, CoreError> {
    require_user(user_id)?;

    let mut setlists = self.setlists.list_setlists(user_id).map_err(map_repo_error)?;
    setlists.sort_by(|a, b| {
      let key = |s: &Setlist| (s.performance_date.is_none(), Reverse(s.performance_date));
      key(a).cmp(&key(b)).then_with(|| a.name.cmp(&b.name))
    });

    Ok(setlists)
  }

  fn find_owned(&self, id: SetlistId, user_id: &str) -> Result<Option<Setlist>, CoreError> {
    let setlist = self.setlists.find_setlist(id).map_err(map_repo_error)?;
    let owned = owned_by(setlist, user_id);
    if owned.is_none() {
      debug!(setlist_id = %id, user_id, "setlist not found for user");
    }
    Ok(owned)
  }
}

fn check(errors: Vec<String>) -> Result<(), CoreError> {
  if !errors.is_empty() {
    warn!(errors = ?errors, "setlist change rejected by validation");
  }
  ensure_valid(errors)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::song::Song;
  use crate::testing::{FixedClock, InMemoryStore};
  use chrono::{Duration, NaiveDate};

  const USER: &str = "user-123";
  const OTHER: &str = "user-456";

  fn draft(name: &str) -> NewSetlist {
    NewSetlist { name: name.to_string(), ..Default::default() }
  }

  fn service<'a>(
    store: &'a InMemoryStore,
    clock: &'a FixedClock,
  ) -> SetlistService<&'a InMemoryStore, &'a InMemoryStore, &'a FixedClock> {
    SetlistService::new(store, store, clock)
  }

  #[test]
  fn create_assigns_owner_and_timestamps() {
    let store = InMemoryStore::new();
    let clock = FixedClock::default();

    let setlist = service(&store, &clock).create_setlist(draft("Friday Gig"), USER).unwrap();

    assert_eq!(setlist.user_id, USER);
    assert_eq!(setlist.created_at, clock.now());
    assert_eq!(setlist.updated_at, None);
    assert!(setlist.songs.is_empty());
    assert!(store.find_setlist(setlist.id).unwrap().is_some());
  }

  #[test]
  fn create_validates_with_first_error() {
    let store = InMemoryStore::new();
    let clock = FixedClock::default();

    let err = service(&store, &clock)
      .create_setlist(NewSetlist { expected_duration_minutes: Some(0), ..draft("") }, USER)
      .unwrap_err();

    assert_eq!(err.to_string(), "Validation failed: Setlist name is required");
  }

  #[test]
  fn create_requires_user() {
    let store = InMemoryStore::new();
    let clock = FixedClock::default();

    let err = service(&store, &clock).create_setlist(draft("Gig"), "").unwrap_err();

    assert!(matches!(err, CoreError::InvalidArgument(_)));
  }

  #[test]
  fn update_changes_details_for_owner_only() {
    let store = InMemoryStore::new();
    let clock = FixedClock::default();
    let svc = service(&store, &clock);
    let created = svc.create_setlist(draft("Old"), USER).unwrap();

    assert!(svc.update_setlist(created.id, draft("Stolen"), OTHER).unwrap().is_none());

    clock.advance(Duration::minutes(5));
    let updated = svc
      .update_setlist(
        created.id,
        NewSetlist { venue: Some("Blue Note".to_string()), ..draft("New") },
        USER,
      )
      .unwrap()
      .unwrap();

    assert_eq!(updated.name, "New");
    assert_eq!(updated.venue.as_deref(), Some("Blue Note"));
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.updated_at, Some(clock.now()));
  }

  #[test]
  fn add_song_appends_positions() {
    let first = Song::new("First", "Band", USER);
    let second = Song::new("Second", "Band", USER);
    let (first_id, second_id) = (first.id, second.id);
    let store = InMemoryStore::with_songs([first, second]);
    let clock = FixedClock::default();
    let svc = service(&store, &clock);
    let setlist = svc.create_setlist(draft("Gig"), USER).unwrap();

    let a = svc.add_song(setlist.id, first_id, Default::default(), USER).unwrap().unwrap();
    let b = svc
      .add_song(
        setlist.id,
        second_id,
        SetlistSongOptions { is_encore: true, ..Default::default() },
        USER,
      )
      .unwrap()
      .unwrap();

    assert_eq!((a.position, b.position), (1, 2));
    assert!(b.is_encore);

    let loaded = svc.get_setlist(setlist.id, USER).unwrap().unwrap();
    let titles: Vec<&str> = loaded.songs.iter().map(|e| e.song.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert_eq!(loaded.updated_at, Some(clock.now()));
  }

  #[test]
  fn add_song_rejects_foreign_song_or_setlist() {
    let foreign_song = Song::new("Theirs", "Band", OTHER);
    let own_song = Song::new("Mine", "Band", USER);
    let (foreign_id, own_id) = (foreign_song.id, own_song.id);
    let store = InMemoryStore::with_songs([foreign_song, own_song]);
    let clock = FixedClock::default();
    let svc = service(&store, &clock);
    let mine = svc.create_setlist(draft("Mine"), USER).unwrap();
    let theirs = svc.create_setlist(draft("Theirs"), OTHER).unwrap();

    assert!(svc.add_song(mine.id, foreign_id, Default::default(), USER).unwrap().is_none());
    assert!(svc.add_song(theirs.id, own_id, Default::default(), USER).unwrap().is_none());
    assert!(svc.add_song(mine.id, SongId::new(), Default::default(), USER).unwrap().is_none());
    assert!(svc.get_setlist(mine.id, USER).unwrap().unwrap().songs.is_empty());
  }

  #[test]
  fn add_song_validates_overrides() {
    let song = Song::new("Tune", "Band", USER);
    let song_id = song.id;
    let store = InMemoryStore::with_songs([song]);
    let clock = FixedClock::default();
    let svc = service(&store, &clock);
    let setlist = svc.create_setlist(draft("Gig"), USER).unwrap();

    let err = svc
      .add_song(
        setlist.id,
        song_id,
        SetlistSongOptions { custom_bpm: Some(999), ..Default::default() },
        USER,
      )
      .unwrap_err();

    assert_eq!(err.to_string(), "Validation failed: BPM must be between 40 and 250");
  }

  #[test]
  fn remove_song_renumbers_following_entries() {
    let songs: Vec<Song> =
      ["One", "Two", "Three"].iter().map(|t| Song::new(*t, "Band", USER)).collect();
    let ids: Vec<SongId> = songs.iter().map(|s| s.id).collect();
    let store = InMemoryStore::with_songs(songs);
    let clock = FixedClock::default();
    let svc = service(&store, &clock);
    let setlist = svc.create_setlist(draft("Gig"), USER).unwrap();
    for id in ids {
      svc.add_song(setlist.id, id, Default::default(), USER).unwrap();
    }

    assert!(svc.remove_song(setlist.id, 2, USER).unwrap());

    let loaded = svc.get_setlist(setlist.id, USER).unwrap().unwrap();
    let order: Vec<(u32, &str)> =
      loaded.songs.iter().map(|e| (e.position, e.song.title.as_str())).collect();
    assert_eq!(order, vec![(1, "One"), (2, "Three")]);
  }

  #[test]
  fn remove_song_unknown_position_or_owner() {
    let store = InMemoryStore::new();
    let clock = FixedClock::default();
    let svc = service(&store, &clock);
    let setlist = svc.create_setlist(draft("Gig"), USER).unwrap();

    assert!(!svc.remove_song(setlist.id, 1, USER).unwrap());
    assert!(!svc.remove_song(setlist.id, 1, OTHER).unwrap());
  }

  #[test]
  fn delete_only_by_owner() {
    let store = InMemoryStore::new();
    let clock = FixedClock::default();
    let svc = service(&store, &clock);
    let setlist = svc.create_setlist(draft("Gig"), USER).unwrap();

    assert!(!svc.delete_setlist(setlist.id, OTHER).unwrap());
    assert!(svc.delete_setlist(setlist.id, USER).unwrap());
    assert!(svc.get_setlist(setlist.id, USER).unwrap().is_none());
  }

  #[test]
  fn list_orders_by_date_desc_then_undated() {
    let store = InMemoryStore::new();
    let clock = FixedClock::default();
    let svc = service(&store, &clock);
    let at = |y, m, d| Some(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(20, 0, 0).unwrap());

    svc.create_setlist(NewSetlist { performance_date: at(2024, 1, 10), ..draft("Old") }, USER).unwrap();
    svc.create_setlist(draft("Undated B"), USER).unwrap();
    svc.create_setlist(NewSetlist { performance_date: at(2025, 5, 2), ..draft("Recent") }, USER).unwrap();
    svc.create_setlist(draft("Undated A"), USER).unwrap();
    svc.create_setlist(draft("Someone else"), OTHER).unwrap();

    let names: Vec<String> = svc.list_setlists(USER).unwrap().into_iter().map(|s| s.name).collect();

    assert_eq!(names, vec!["Recent", "Old", "Undated A", "Undated B"]);
  }
}
