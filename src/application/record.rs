//! Recording session use case

use thiserror::Error;

use crate::domain::note::VoiceNote;
use crate::domain::recording::{InvalidStateTransition, RecorderHandle, RecordingSession};

use super::ports::{CaptureError, CaptureMode, CaptureSource, NoteStore, Permission, StoreError};

/// Errors from the recording use case
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Microphone permission is required to record audio")]
    PermissionDenied,

    #[error(transparent)]
    InvalidTransition(#[from] InvalidStateTransition),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Failed to save recording: {0}")]
    Store(#[from] StoreError),
}

/// Recording session controller.
///
/// Owns the lifecycle of "armed -> recording -> stopped -> persisted":
/// delegates raw capture to the capture port and, on stop, hands the captured
/// audio to the note store. The internal state machine enforces that only one
/// session is active at a time; a second `start` while recording is rejected
/// with a typed error rather than relying on the caller.
pub struct RecordingController<C, S>
where
    C: CaptureSource,
    S: NoteStore,
{
    capture: C,
    store: S,
    session: RecordingSession,
    handle: Option<RecorderHandle>,
}

impl<C, S> RecordingController<C, S>
where
    C: CaptureSource,
    S: NoteStore,
{
    /// Create a new controller in idle state
    pub fn new(capture: C, store: S) -> Self {
        Self {
            capture,
            store,
            session: RecordingSession::new(),
            handle: None,
        }
    }

    /// Whether a capture is currently active
    pub fn is_recording(&self) -> bool {
        self.session.is_recording()
    }

    /// Start a recording session.
    ///
    /// Requests permission, configures the device for `mode`, and begins
    /// capture. On permission denial or a capture failure the session returns
    /// to idle and the error is surfaced.
    pub async fn start(&mut self, mode: CaptureMode) -> Result<(), SessionError> {
        self.session.arm()?;

        match self.capture.request_permission().await {
            Ok(Permission::Granted) => {}
            Ok(Permission::Denied) => {
                self.session.disarm()?;
                return Err(SessionError::PermissionDenied);
            }
            Err(e) => {
                self.session.disarm()?;
                return Err(e.into());
            }
        }

        if let Err(e) = self.capture.configure(mode).await {
            self.session.disarm()?;
            return Err(e.into());
        }

        match self.capture.start().await {
            Ok(handle) => {
                self.handle = Some(handle);
                self.session.begin_capture()?;
                Ok(())
            }
            Err(e) => {
                self.session.disarm()?;
                Err(e.into())
            }
        }
    }

    /// Stop the active session, finalize capture, and persist the note.
    ///
    /// Stopping always finalizes; there is no discard path. The handle is
    /// cleared and the session returns to idle even when finalization fails.
    pub async fn stop(&mut self, name: Option<&str>) -> Result<VoiceNote, SessionError> {
        self.session.begin_stop()?;

        // Invariant: the handle is present for the whole of RECORDING
        let handle = self.handle.take().ok_or(CaptureError::NoActiveCapture)?;

        let audio = match self.capture.stop(handle).await {
            Ok(audio) => audio,
            Err(e) => {
                self.session.finish()?;
                return Err(e.into());
            }
        };

        let result = self.store.save(audio, name).await;
        self.session.finish()?;

        Ok(result?)
    }
}
