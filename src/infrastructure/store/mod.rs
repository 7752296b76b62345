//! Note storage adapters

pub mod fs_store;
pub mod sqlite_store;

pub use fs_store::FsNoteStore;
pub use sqlite_store::{default_database_path, SqliteNoteStore};
