//! Voice-note entities and value objects

pub mod note_id;
pub mod voice_note;

pub use note_id::NoteId;
pub use voice_note::{NoteLocation, VoiceNote};
