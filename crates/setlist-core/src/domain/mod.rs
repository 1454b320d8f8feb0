pub mod catalog;
pub mod ids;
pub mod ownership;
pub mod setlist;
pub mod song;
pub mod tags;

pub use catalog::{Page, SongFilter};
pub use ids::{SetlistId, SongId};
pub use ownership::Owned;
pub use setlist::{NewSetlist, Setlist, SetlistSong, SetlistSongOptions};
pub use song::Song;
