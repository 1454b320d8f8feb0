use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Identificador único de una canción del catálogo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SongId(Uuid);

impl SongId {
  /// Genera un nuevo identificador único.
  pub fn new() -> Self {
    SongId(Uuid::new_v4())
  }

  pub fn from_uuid(u: Uuid) -> Self {
    SongId(u)
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for SongId {
  fn default() -> Self {
    Self::new()
  }
}

impl From<Uuid> for SongId {
  fn from(u: Uuid) -> Self {
    SongId(u)
  }
}

impl From<SongId> for Uuid {
  fn from(id: SongId) -> Self {
    id.0
  }
}

impl FromStr for SongId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Uuid::parse_str(s).map(SongId)
  }
}

impl fmt::Display for SongId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Identificador único de un setlist.
///
/// Igual que [`SongId`], es un UUID v4 sin relación con ninguna fuente externa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SetlistId(Uuid);

impl SetlistId {
  /// Crea un nuevo `SetlistId` único.
  pub fn new() -> Self {
    SetlistId(Uuid::new_v4())
  }

  /// Construye un `SetlistId` desde un UUID ya existente.
  pub fn from_uuid(u: Uuid) -> Self {
    SetlistId(u)
  }

  /// Devuelve el valor UUID interno.
  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for SetlistId {
  fn default() -> Self {
    Self::new()
  }
}

impl From<Uuid> for SetlistId {
  fn from(u: Uuid) -> Self {
    SetlistId(u)
  }
}

impl From<SetlistId> for Uuid {
  fn from(id: SetlistId) -> Self {
    id.0
  }
}

impl FromStr for SetlistId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Uuid::parse_str(s).map(SetlistId)
  }
}

impl fmt::Display for SetlistId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
