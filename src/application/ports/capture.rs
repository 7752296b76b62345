//! Capture port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::{CapturedAudio, RecorderHandle};

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("No capture in progress for this handle")]
    NoActiveCapture,
}

/// Result of a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Capture tuning mode.
///
/// Voice prefers a low sample rate suited to speech; Standard takes
/// whatever the device offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    #[default]
    Voice,
    Standard,
}

/// Port for microphone capture.
///
/// The handle returned by `start` is opaque; it must be surrendered back to
/// `stop` to finalize the capture. Implementations support at most one
/// capture at a time.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Ask for access to the capture device.
    async fn request_permission(&self) -> Result<Permission, CaptureError>;

    /// Configure the device for the given mode. Called between permission
    /// grant and `start`.
    async fn configure(&self, mode: CaptureMode) -> Result<(), CaptureError>;

    /// Begin capturing. Returns the handle for the new session.
    async fn start(&self) -> Result<RecorderHandle, CaptureError>;

    /// Stop and finalize the capture identified by `handle`.
    ///
    /// # Returns
    /// The captured audio, encoded into its container format
    async fn stop(&self, handle: RecorderHandle) -> Result<CapturedAudio, CaptureError>;
}
