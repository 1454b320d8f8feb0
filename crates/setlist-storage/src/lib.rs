pub mod config;
pub mod models;
pub mod schema;

use std::cell::RefCell;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use setlist_config::ConfigError;
use setlist_core::domain::catalog::{Page, SongFilter};
use setlist_core::domain::ids::{SetlistId, SongId};
use setlist_core::domain::setlist::{Setlist, SetlistSong};
use setlist_core::domain::song::Song;
use setlist_core::ports::{RepoError, SetlistRepository, SongRepository};

use crate::config::StorageConfig;
use crate::models::{SetlistRow, SetlistSongRow, SongRow};
use crate::schema::{setlist_songs, setlists, songs};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const JOURNAL_MODES: [&str; 6] = ["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("connection error: {0}")]
  Connection(#[from] ConnectionError),
  #[error("migration error: {0}")]
  Migration(String),
  #[error("unsupported journal mode: {0}")]
  JournalMode(String),
  #[error("database error: {0}")]
  Database(#[from] diesel::result::Error),
}

fn db_err(e: diesel::result::Error) -> RepoError {
  RepoError::Storage(e.to_string())
}

/// `%needle%` con los comodines de LIKE escapados.
fn like_pattern(needle: &str) -> String {
  let mut pattern = String::with_capacity(needle.len() + 2);
  pattern.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

/// Canciones del usuario que cumplen el filtro, sin orden ni paginación.
fn filtered_songs<'a>(user_id: &'a str, filter: &SongFilter) -> songs::BoxedQuery<'a, Sqlite> {
  let mut query = songs::table.filter(songs::user_id.eq(user_id)).into_boxed();

  if let Some(search) = &filter.search {
    let pattern = like_pattern(search);
    query = query.filter(
      songs::title
        .like(pattern.clone())
        .escape('\\')
        .or(songs::artist.like(pattern.clone()).escape('\\'))
        .or(songs::album.assume_not_null().like(pattern).escape('\\')),
    );
  }
  if let Some(genre) = &filter.genre {
    query = query.filter(songs::genre.eq(genre.clone()));
  }
  if let Some(key) = &filter.musical_key {
    query = query.filter(songs::musical_key.eq(key.clone()));
  }
  if let Some(difficulty) = filter.difficulty {
    query = query.filter(songs::difficulty_rating.eq(difficulty));
  }
  if let Some(tag) = &filter.tag {
    query = query.filter(songs::tags.assume_not_null().like(like_pattern(tag)).escape('\\'));
  }

  query
}

/// Entradas del setlist con su canción, por posición ascendente.
fn load_entries(
  conn: &mut SqliteConnection,
  setlist_id: &str,
) -> Result<Vec<SetlistSong>, RepoError> {
  let rows = setlist_songs::table
    .inner_join(songs::table)
    .filter(setlist_songs::setlist_id.eq(setlist_id))
    .order(setlist_songs::position.asc())
    .select((SetlistSongRow::as_select(), SongRow::as_select()))
    .load::<(SetlistSongRow, SongRow)>(conn)
    .map_err(db_err)?;

  rows.into_iter().map(|(entry, song)| entry.into_entry(Song::try_from(song)?)).collect()
}

fn hydrate(conn: &mut SqliteConnection, row: SetlistRow) -> Result<Setlist, RepoError> {
  let entries = load_entries(conn, &row.id)?;
  row.into_setlist(entries)
}

/// Repositorio SQLite de canciones y setlists.
///
/// Una sola conexión; el mismo valor implementa ambos ports, así que los
/// servicios lo comparten por referencia.
pub struct SqliteSetlistStore {
  conn: RefCell<SqliteConnection>,
}

impl SqliteSetlistStore {
  /// Abre (o crea) la base y aplica las migraciones pendientes.
  pub fn new(database_url: &str) -> Result<Self, StorageError> {
    Self::open(database_url, None)
  }

  /// Base en memoria, útil para tests.
  pub fn in_memory() -> Result<Self, StorageError> {
    Self::open(":memory:", None)
  }

  pub fn new_from_config() -> Result<Self, StorageError> {
    let cfg = StorageConfig::load()?;
    Self::from_config(&cfg)
  }

  pub fn from_config(cfg: &StorageConfig) -> Result<Self, StorageError> {
    if let Some(parent) = cfg.db_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    Self::open(&cfg.database_url(), cfg.journal_mode.as_deref())
  }

  fn open(database_url: &str, journal_mode: Option<&str>) -> Result<Self, StorageError> {
    let mut conn = SqliteConnection::establish(database_url)?;

    conn.batch_execute("PRAGMA foreign_keys = ON;")?;
    if let Some(mode) = journal_mode {
      let mode = mode.trim().to_ascii_uppercase();
      if !JOURNAL_MODES.contains(&mode.as_str()) {
        return Err(StorageError::JournalMode(mode));
      }
      conn.batch_execute(&format!("PRAGMA journal_mode = {mode};"))?;
    }

    let applied =
      conn.run_pending_migrations(MIGRATIONS).map_err(|e| StorageError::Migration(e.to_string()))?;
    info!(database_url, migrations = applied.len(), "sqlite store ready");

    Ok(Self { conn: RefCell::new(conn) })
  }
}

impl SongRepository for SqliteSetlistStore {
  fn find_song(&self, id: SongId) -> Result<Option<Song>, RepoError> {
    let mut conn = self.conn.borrow_mut();

    let row = songs::table
      .find(id.to_string())
      .select(SongRow::as_select())
      .first::<SongRow>(&mut *conn)
      .optional()
      .map_err(db_err)?;

    row.map(Song::try_from).transpose()
  }

  fn list_songs(&self, user_id: &str, filter: &SongFilter) -> Result<Page<Song>, RepoError> {
    let mut conn = self.conn.borrow_mut();

    let total: i64 =
      filtered_songs(user_id, filter).count().get_result(&mut *conn).map_err(db_err)?;

    let offset = i64::try_from(filter.offset()).unwrap_or(i64::MAX);
    let rows = filtered_songs(user_id, filter)
      .order_by((songs::title.asc(), songs::artist.asc()))
      .limit(i64::from(filter.page_size))
      .offset(offset)
      .load::<SongRow>(&mut *conn)
      .map_err(db_err)?;
    debug!(user_id, total, returned = rows.len(), "songs listed");

    let items = rows.into_iter().map(Song::try_from).collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
      items,
      total: u64::try_from(total).unwrap_or_default(),
      page: filter.page,
      page_size: filter.page_size,
    })
  }

  fn list_song_tags(&self, user_id: &str) -> Result<Vec<String>, RepoError> {
    let mut conn = self.conn.borrow_mut();

    let tags = songs::table
      .filter(songs::user_id.eq(user_id))
      .filter(songs::tags.is_not_null())
      .select(songs::tags)
      .load::<Option<String>>(&mut *conn)
      .map_err(db_err)?;

    Ok(tags.into_iter().flatten().collect())
  }

  fn insert_song(&self, song: &Song) -> Result<(), RepoError> {
    let row = SongRow::from(song);
    let mut conn = self.conn.borrow_mut();

    diesel::insert_into(songs::table).values(&row).execute(&mut *conn).map_err(db_err)?;
    debug!(song_id = %song.id, "song inserted");

    Ok(())
  }

  fn update_song(&self, song: &Song) -> Result<(), RepoError> {
    let row = SongRow::from(song);
    let mut conn = self.conn.borrow_mut();

    let updated = diesel::update(songs::table.find(&row.id))
      .set(&row)
      .execute(&mut *conn)
      .map_err(db_err)?;

    if updated == 0 {
      return Err(RepoError::NotFound);
    }
    Ok(())
  }

  fn delete_song(&self, id: SongId) -> Result<bool, RepoError> {
    let id = id.to_string();
    let mut conn = self.conn.borrow_mut();

    let deleted = conn
      .transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::delete(setlist_songs::table.filter(setlist_songs::song_id.eq(&id)))
          .execute(conn)?;
        diesel::delete(songs::table.find(&id)).execute(conn)
      })
      .map_err(db_err)?;

    Ok(deleted > 0)
  }
}

impl SetlistRepository for SqliteSetlistStore {
  fn find_setlist(&self, id: SetlistId) -> Result<Option<Setlist>, RepoError> {
    let mut conn = self.conn.borrow_mut();

    let row = setlists::table
      .find(id.to_string())
      .select(SetlistRow::as_select())
      .first::<SetlistRow>(&mut *conn)
      .optional()
      .map_err(db_err)?;

    row.map(|row| hydrate(&mut conn, row)).transpose()
  }

  fn list_setlists(&self, user_id: &str) -> Result<Vec<Setlist>, RepoError> {
    let mut conn = self.conn.borrow_mut();

    let rows = setlists::table
      .filter(setlists::user_id.eq(user_id))
      .select(SetlistRow::as_select())
      .load::<SetlistRow>(&mut *conn)
      .map_err(db_err)?;

    rows.into_iter().map(|row| hydrate(&mut conn, row)).collect()
  }

  fn insert_setlist(&self, setlist: &Setlist) -> Result<(), RepoError> {
    let row = SetlistRow::from(setlist);
    let mut conn = self.conn.borrow_mut();

    diesel::insert_into(setlists::table).values(&row).execute(&mut *conn).map_err(db_err)?;
    debug!(setlist_id = %setlist.id, "setlist inserted");

    Ok(())
  }

  fn update_setlist(&self, setlist: &Setlist) -> Result<(), RepoError> {
    let row = SetlistRow::from(setlist);
    let mut conn = self.conn.borrow_mut();

    let updated = diesel::update(setlists::table.find(&row.id))
      .set(&row)
      .execute(&mut *conn)
      .map_err(db_err)?;

    if updated == 0 {
      return Err(RepoError::NotFound);
    }
    Ok(())
  }

  fn delete_setlist(&self, id: SetlistId) -> Result<bool, RepoError> {
    let id = id.to_string();
    let mut conn = self.conn.borrow_mut();

    let deleted = conn
      .transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::delete(setlist_songs::table.filter(setlist_songs::setlist_id.eq(&id)))
          .execute(conn)?;
        diesel::delete(setlists::table.find(&id)).execute(conn)
      })
      .map_err(db_err)?;

    Ok(deleted > 0)
  }

  fn insert_entry(&self, setlist_id: SetlistId, entry: &SetlistSong) -> Result<(), RepoError> {
    let row = SetlistSongRow::from_entry(setlist_id, entry)?;
    let mut conn = self.conn.borrow_mut();

    diesel::insert_into(setlist_songs::table).values(&row).execute(&mut *conn).map_err(db_err)?;

    Ok(())
  }

  fn replace_entries(&self, setlist_id: SetlistId, entries: &[SetlistSong]) -> Result<(), RepoError> {
    let rows = entries
      .iter()
      .map(|entry| SetlistSongRow::from_entry(setlist_id, entry))
      .collect::<Result<Vec<_>, _>>()?;
    let id = setlist_id.to_string();
    let mut conn = self.conn.borrow_mut();

    conn
      .transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::delete(setlist_songs::table.filter(setlist_songs::setlist_id.eq(&id)))
          .execute(conn)?;
        if !rows.is_empty() {
          diesel::insert_into(setlist_songs::table).values(&rows).execute(conn)?;
        }
        Ok(())
      })
      .map_err(db_err)?;
    debug!(%setlist_id, entries = rows.len(), "setlist entries replaced");

    Ok(())
  }
}
