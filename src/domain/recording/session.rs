//! Recording session state machine

use std::fmt;
use thiserror::Error;

/// Opaque reference to an in-progress capture.
///
/// Issued by the capture source on start and surrendered back on stop.
/// The session controller owns it for the lifetime of the recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecorderHandle(u64);

impl RecorderHandle {
    pub const fn new(token: u64) -> Self {
        Self(token)
    }

    pub const fn token(&self) -> u64 {
        self.0
    }
}

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Armed,
    Recording,
    Stopping,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Armed => "armed",
            Self::Recording => "recording",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Recording session entity.
/// Manages state transitions for one capture lifecycle.
///
/// State machine:
///   IDLE -> ARMED (arm, permission requested)
///   ARMED -> IDLE (disarm, permission denied or start failed)
///   ARMED -> RECORDING (begin_capture)
///   RECORDING -> STOPPING (begin_stop)
///   STOPPING -> IDLE (finish)
#[derive(Debug, Default)]
pub struct RecordingSession {
    state: SessionState,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Check if capture is active
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Transition from IDLE to ARMED.
    /// Rejecting this while armed or recording is what enforces the
    /// one-active-session invariant.
    pub fn arm(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "start recording".to_string(),
            });
        }
        self.state = SessionState::Armed;
        Ok(())
    }

    /// Transition from ARMED back to IDLE (permission denied, start failed)
    pub fn disarm(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Armed {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "disarm".to_string(),
            });
        }
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Transition from ARMED to RECORDING
    pub fn begin_capture(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Armed {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "begin capture".to_string(),
            });
        }
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Transition from RECORDING to STOPPING
    pub fn begin_stop(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Recording {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "stop recording".to_string(),
            });
        }
        self.state = SessionState::Stopping;
        Ok(())
    }

    /// Transition from STOPPING to IDLE
    pub fn finish(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Stopping {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "finish".to_string(),
            });
        }
        self.state = SessionState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = RecordingSession::new();
        assert!(session.is_idle());
        assert!(!session.is_recording());
    }

    #[test]
    fn arm_from_idle() {
        let mut session = RecordingSession::new();
        assert!(session.arm().is_ok());
        assert_eq!(session.state(), SessionState::Armed);
    }

    #[test]
    fn arm_while_armed_fails() {
        let mut session = RecordingSession::new();
        session.arm().unwrap();

        let err = session.arm().unwrap_err();
        assert_eq!(err.current_state, SessionState::Armed);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn arm_while_recording_fails() {
        let mut session = RecordingSession::new();
        session.arm().unwrap();
        session.begin_capture().unwrap();

        let err = session.arm().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
    }

    #[test]
    fn disarm_returns_to_idle() {
        let mut session = RecordingSession::new();
        session.arm().unwrap();

        assert!(session.disarm().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn disarm_from_idle_fails() {
        let mut session = RecordingSession::new();
        assert!(session.disarm().is_err());
    }

    #[test]
    fn begin_capture_from_armed() {
        let mut session = RecordingSession::new();
        session.arm().unwrap();

        assert!(session.begin_capture().is_ok());
        assert!(session.is_recording());
    }

    #[test]
    fn begin_capture_from_idle_fails() {
        let mut session = RecordingSession::new();

        let err = session.begin_capture().unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
    }

    #[test]
    fn begin_stop_from_recording() {
        let mut session = RecordingSession::new();
        session.arm().unwrap();
        session.begin_capture().unwrap();

        assert!(session.begin_stop().is_ok());
        assert_eq!(session.state(), SessionState::Stopping);
    }

    #[test]
    fn begin_stop_from_idle_fails() {
        let mut session = RecordingSession::new();

        let err = session.begin_stop().unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
    }

    #[test]
    fn finish_from_stopping() {
        let mut session = RecordingSession::new();
        session.arm().unwrap();
        session.begin_capture().unwrap();
        session.begin_stop().unwrap();

        assert!(session.finish().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn finish_from_recording_fails() {
        let mut session = RecordingSession::new();
        session.arm().unwrap();
        session.begin_capture().unwrap();

        let err = session.finish().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
    }

    #[test]
    fn full_cycle() {
        let mut session = RecordingSession::new();
        assert!(session.is_idle());

        session.arm().unwrap();
        session.begin_capture().unwrap();
        assert!(session.is_recording());

        session.begin_stop().unwrap();
        session.finish().unwrap();
        assert!(session.is_idle());

        // Can start another cycle
        session.arm().unwrap();
        assert_eq!(session.state(), SessionState::Armed);
    }

    #[test]
    fn state_display() {
        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(SessionState::Armed.to_string(), "armed");
        assert_eq!(SessionState::Recording.to_string(), "recording");
        assert_eq!(SessionState::Stopping.to_string(), "stopping");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: SessionState::Recording,
            action: "start recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("recording"));
    }

    #[test]
    fn handle_token_round_trip() {
        let handle = RecorderHandle::new(17);
        assert_eq!(handle.token(), 17);
    }
}
