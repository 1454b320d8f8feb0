use anyhow::{Context, Result};
use chrono::NaiveDate;
use setlist_config::{LoggingConfig, PATHS, init_logging};
use setlist_core::domain::{NewSetlist, SetlistSongOptions, Song};
use setlist_core::ports::SystemClock;
use setlist_core::services::{ExportService, SetlistService, SongService};
use setlist_storage::SqliteSetlistStore;

const USER: &str = "smoke-user";

fn main() -> Result<()> {
  init_logging(&LoggingConfig::load()?)?;

  let store = SqliteSetlistStore::new_from_config().context("open sqlite store")?;
  let songs = SongService::new(&store, SystemClock);
  let setlists = SetlistService::new(&store, &store, SystemClock);
  let exporter = ExportService::new(&store, SystemClock);

  let mut opener = Song::new("Back in Black", "AC/DC", USER);
  opener.bpm = Some(94);
  opener.musical_key = Some("E".to_string());
  opener.tags = Some("rock, classic".to_string());
  let opener = songs.create_song(opener)?;

  let mut closer = Song::new("Song, with, commas", "The \"Quoted\" Band", USER);
  closer.duration_seconds = Some(245);
  let closer = songs.create_song(closer)?;

  let setlist = setlists.create_setlist(
    NewSetlist {
      name: "Rock Concert".to_string(),
      venue: Some("Madison Square Garden".to_string()),
      performance_date: NaiveDate::from_ymd_opt(2024, 12, 31).and_then(|d| d.and_hms_opt(20, 0, 0)),
      expected_duration_minutes: Some(120),
      ..NewSetlist::default()
    },
    USER,
  )?;

  setlists.add_song(setlist.id, opener.id, SetlistSongOptions::default(), USER)?;
  let encore = SetlistSongOptions { is_encore: true, ..SetlistSongOptions::default() };
  setlists.add_song(setlist.id, closer.id, encore, USER)?;

  println!("Tags for {USER}: {:?}", songs.get_distinct_tags(USER)?);

  let path = exporter
    .export_to_file(setlist.id, USER, &PATHS.export_dir())?
    .context("setlist vanished before export")?;
  println!("Exported setlist {} to {}", setlist.id, path.display());

  Ok(())
}
