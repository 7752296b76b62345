//! Note storage port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::note::{NoteId, VoiceNote};
use crate::domain::recording::CapturedAudio;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Filesystem error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Sidecar metadata error: {0}")]
    Sidecar(String),

    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Invalid note id for this backend: {0}")]
    InvalidId(String),
}

/// Port for persisting voice notes.
///
/// Both backends present the same contract: ids are opaque and stable across
/// rename, and `delete` is idempotent (deleting an absent note succeeds).
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// List all notes, oldest first.
    async fn list(&self) -> Result<Vec<VoiceNote>, StoreError>;

    /// Persist captured audio as a new note.
    ///
    /// # Arguments
    /// * `audio` - Finalized capture output
    /// * `name` - Display name; a default of the form `<prefix>_<timestamp>`
    ///   is generated when absent
    async fn save(&self, audio: CapturedAudio, name: Option<&str>) -> Result<VoiceNote, StoreError>;

    /// Change a note's display name. The note keeps its id.
    async fn rename(&self, id: &NoteId, new_name: &str) -> Result<VoiceNote, StoreError>;

    /// Remove a note entirely. Succeeds when the note is already gone.
    async fn delete(&self, id: &NoteId) -> Result<(), StoreError>;

    /// Load a note's audio for playback.
    async fn load_audio(&self, id: &NoteId) -> Result<CapturedAudio, StoreError>;
}
