//! Playback port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::CapturedAudio;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("No audio output device available: {0}")]
    DeviceNotAvailable(String),

    #[error("Failed to decode audio: {0}")]
    DecodeFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Handle to an in-flight playback.
///
/// Dropping the handle does not stop the sound; call `stop` explicitly.
pub trait PlaybackHandle: Send {
    /// Stop playback immediately.
    fn stop(&self);

    /// True once the sound ran to completion or was stopped.
    fn is_finished(&self) -> bool;
}

/// Port for playing back note audio
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Start playing the given audio.
    ///
    /// # Returns
    /// A handle that can stop the sound and report completion
    async fn play(&self, audio: CapturedAudio) -> Result<Box<dyn PlaybackHandle>, PlaybackError>;
}
