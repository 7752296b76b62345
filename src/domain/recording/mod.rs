//! Recording value objects and session state machine

pub mod audio_data;
pub mod duration;
pub mod session;

pub use audio_data::{AudioFormat, CapturedAudio};
pub use duration::Duration;
pub use session::{InvalidStateTransition, RecorderHandle, RecordingSession, SessionState};
