pub mod io;

pub use io::{atomic_write_bytes, atomic_write_str};
