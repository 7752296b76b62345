//! Notes registry use case

use thiserror::Error;

use crate::domain::note::{NoteId, VoiceNote};

use super::ports::{AudioPlayer, NoteStore, PlaybackError, PlaybackHandle, StoreError};

/// Errors from the registry use case
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Storage failed: {0}")]
    Store(#[from] StoreError),

    #[error("Playback failed: {0}")]
    Playback(#[from] PlaybackError),
}

/// In-memory view over the note store.
///
/// Mutations delegate to the store first and patch the cached list only after
/// the store succeeds, so the list always reflects what a fresh `refresh`
/// would return. Playback is layered on top: the registry owns the active
/// playback handle and stops it before starting another, so at most one sound
/// plays at a time.
pub struct NotesRegistry<S, P>
where
    S: NoteStore,
    P: AudioPlayer,
{
    store: S,
    player: P,
    notes: Vec<VoiceNote>,
    playback: Option<Box<dyn PlaybackHandle>>,
}

impl<S, P> NotesRegistry<S, P>
where
    S: NoteStore,
    P: AudioPlayer,
{
    /// Create a registry with an empty cached list
    pub fn new(store: S, player: P) -> Self {
        Self {
            store,
            player,
            notes: Vec::new(),
            playback: None,
        }
    }

    /// Re-read the store, replacing the cached list
    pub async fn refresh(&mut self) -> Result<&[VoiceNote], RegistryError> {
        self.notes = self.store.list().await?;
        Ok(&self.notes)
    }

    /// The cached list, in store order
    pub fn notes(&self) -> &[VoiceNote] {
        &self.notes
    }

    /// Case-insensitive substring filter on display names.
    /// An empty query returns the full list in the same relative order.
    pub fn filter(&self, query: &str) -> Vec<&VoiceNote> {
        self.notes.iter().filter(|n| n.matches(query)).collect()
    }

    /// Rename a note, then patch the cached entry by id
    pub async fn rename(&mut self, id: &NoteId, new_name: &str) -> Result<VoiceNote, RegistryError> {
        let renamed = self.store.rename(id, new_name).await?;
        if let Some(entry) = self.notes.iter_mut().find(|n| n.id == *id) {
            *entry = renamed.clone();
        }
        Ok(renamed)
    }

    /// Delete a note, then drop the cached entry by id
    pub async fn delete(&mut self, id: &NoteId) -> Result<(), RegistryError> {
        self.store.delete(id).await?;
        self.notes.retain(|n| n.id != *id);
        Ok(())
    }

    /// Play a note's audio, stopping any current playback first
    pub async fn play(&mut self, id: &NoteId) -> Result<(), RegistryError> {
        self.stop_playback();
        let audio = self.store.load_audio(id).await?;
        let handle = self.player.play(audio).await?;
        self.playback = Some(handle);
        Ok(())
    }

    /// Stop the active playback, if any
    pub fn stop_playback(&mut self) {
        if let Some(handle) = self.playback.take() {
            handle.stop();
        }
    }

    /// Whether a sound is currently playing
    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}
