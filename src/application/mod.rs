//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod ports;
pub mod record;
pub mod registry;

// Re-export use cases
pub use record::{RecordingController, SessionError};
pub use registry::{NotesRegistry, RegistryError};
