pub mod clock;
pub mod library_repository;

pub use clock::{Clock, SystemClock};
pub use library_repository::{RepoError, SetlistRepository, SongRepository};
