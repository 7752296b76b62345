//! Rodio-based playback adapter
//!
//! Decodes note audio and plays it through the default output device.
//! The OutputStream is not Send, so each playback runs on its own thread;
//! the returned handle talks to that thread through atomics.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};

use crate::application::ports::{AudioPlayer, PlaybackError, PlaybackHandle};
use crate::domain::recording::CapturedAudio;

/// How often the playback thread polls for stop/completion
const POLL_INTERVAL_MS: u64 = 50;

/// Handle to a playback thread
struct RodioHandle {
    stop: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl PlaybackHandle for RodioHandle {
    fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

/// Playback implementation using rodio
pub struct RodioPlayer;

impl RodioPlayer {
    /// Create a new rodio-based player
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn play(&self, audio: CapturedAudio) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        let stop = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));

        let thread_stop = Arc::clone(&stop);
        let thread_finished = Arc::clone(&finished);
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();

        std::thread::spawn(move || {
            let setup = || -> Result<(OutputStream, Sink, Decoder<Cursor<Vec<u8>>>), PlaybackError> {
                let (stream, stream_handle) = OutputStream::try_default()
                    .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;
                let sink = Sink::try_new(&stream_handle)
                    .map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;
                let source = Decoder::new(Cursor::new(audio.into_data()))
                    .map_err(|e| PlaybackError::DecodeFailed(e.to_string()))?;
                Ok((stream, sink, source))
            };

            match setup() {
                Ok((_stream, sink, source)) => {
                    sink.append(source);
                    let _ = ready_tx.send(Ok(()));

                    // Poll until the sound finishes naturally or is stopped
                    while !thread_stop.load(Ordering::SeqCst) && !sink.empty() {
                        std::thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
                    }
                    sink.stop();
                    thread_finished.store(true, Ordering::SeqCst);
                }
                Err(e) => {
                    thread_finished.store(true, Ordering::SeqCst);
                    let _ = ready_tx.send(Err(e));
                }
            }
        });

        ready_rx
            .await
            .map_err(|_| PlaybackError::PlaybackFailed("Playback thread exited".to_string()))??;

        Ok(Box::new(RodioHandle { stop, finished }))
    }
}
