//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod player;
pub mod store;

// Re-export common types
pub use capture::{CaptureError, CaptureMode, CaptureSource, Permission};
pub use config::ConfigStore;
pub use player::{AudioPlayer, PlaybackError, PlaybackHandle};
pub use store::{NoteStore, StoreError};
