//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like cpal, rodio, and SQLite.

pub mod capture;
pub mod config;
pub mod playback;
pub mod store;

// Re-export adapters
pub use capture::CpalCapture;
pub use config::XdgConfigStore;
pub use playback::RodioPlayer;
pub use store::{FsNoteStore, SqliteNoteStore};
