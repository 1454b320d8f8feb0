pub mod filename;
pub mod setlist_csv;

pub use filename::setlist_filename;
pub use setlist_csv::{COLUMN_HEADER, COLUMNS, escape_field, render_setlist_csv};
