//! Cross-platform microphone capture using cpal
//!
//! Captures mono PCM from the default input device and finalizes it as a WAV
//! container. Voice mode prefers a 16kHz stream; Standard prefers 44.1kHz.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use tokio::time::{sleep, Duration as TokioDuration};

use crate::application::ports::{CaptureError, CaptureMode, CaptureSource, Permission};
use crate::domain::recording::{AudioFormat, CapturedAudio, RecorderHandle};

/// Preferred sample rate for speech
const VOICE_SAMPLE_RATE: u32 = 16_000;

/// Preferred sample rate for general capture
const STANDARD_SAMPLE_RATE: u32 = 44_100;

/// Microphone capture adapter using cpal.
///
/// The stream is managed on a background thread because cpal::Stream is not
/// Send. At most one capture runs at a time; the issued handle token is
/// checked on stop so a stale handle cannot finalize someone else's capture.
pub struct CpalCapture {
    /// Recorded audio samples (mono, i16, at device sample rate)
    audio_buffer: Arc<StdMutex<Vec<i16>>>,
    /// Device sample rate for the active stream
    device_sample_rate: Arc<AtomicU32>,
    /// Preferred sample rate chosen by configure()
    preferred_rate: Arc<AtomicU32>,
    /// Recording state
    is_recording: Arc<AtomicBool>,
    /// Token of the active capture (0 = none)
    active_token: Arc<AtomicU64>,
    /// Token source for issued handles
    next_token: AtomicU64,
}

impl CpalCapture {
    /// Create a new cpal-based capture source
    pub fn new() -> Self {
        Self {
            audio_buffer: Arc::new(StdMutex::new(Vec::new())),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            preferred_rate: Arc::new(AtomicU32::new(VOICE_SAMPLE_RATE)),
            is_recording: Arc::new(AtomicBool::new(false)),
            active_token: Arc::new(AtomicU64::new(0)),
            next_token: AtomicU64::new(1),
        }
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(CaptureError::NoAudioDevice)
    }

    /// Get a suitable input configuration, preferring `target_rate`
    fn get_input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?;

        // Prefer mono and configs that can run at the target rate
        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= target_rate
                && config.max_sample_rate().0 >= target_rate;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > target_rate;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range =
            best_config.ok_or(CaptureError::StartFailed("No suitable config found".into()))?;

        let sample_rate = if config_range.min_sample_rate().0 <= target_rate
            && config_range.max_sample_rate().0 >= target_rate
        {
            SampleRate(target_rate)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix stereo (or more) down to mono
    fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// Encode PCM samples into a WAV container
    fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<CapturedAudio, CaptureError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| CaptureError::CaptureFailed(format!("WAV init failed: {}", e)))?;
            for &sample in samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| CaptureError::CaptureFailed(format!("WAV write failed: {}", e)))?;
            }
            writer
                .finalize()
                .map_err(|e| CaptureError::CaptureFailed(format!("WAV finalize failed: {}", e)))?;
        }

        Ok(CapturedAudio::new(cursor.into_inner(), AudioFormat::Wav))
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureSource for CpalCapture {
    async fn request_permission(&self) -> Result<Permission, CaptureError> {
        // Desktop platforms have no microphone permission prompt; device
        // availability is the closest observable analog
        let available = tokio::task::spawn_blocking(|| {
            cpal::default_host().default_input_device().is_some()
        })
        .await
        .map_err(|e| CaptureError::StartFailed(format!("Task join error: {}", e)))?;

        if available {
            Ok(Permission::Granted)
        } else {
            Ok(Permission::Denied)
        }
    }

    async fn configure(&self, mode: CaptureMode) -> Result<(), CaptureError> {
        let rate = match mode {
            CaptureMode::Voice => VOICE_SAMPLE_RATE,
            CaptureMode::Standard => STANDARD_SAMPLE_RATE,
        };
        self.preferred_rate.store(rate, Ordering::SeqCst);
        Ok(())
    }

    async fn start(&self) -> Result<RecorderHandle, CaptureError> {
        if self.is_recording.load(Ordering::SeqCst) {
            return Err(CaptureError::StartFailed(
                "Capture already in progress".to_string(),
            ));
        }

        {
            let mut buffer = self.audio_buffer.lock().unwrap();
            buffer.clear();
        }

        self.is_recording.store(true, Ordering::SeqCst);

        let target_rate = self.preferred_rate.load(Ordering::SeqCst);
        let audio_buffer = Arc::clone(&self.audio_buffer);
        let device_sample_rate = Arc::clone(&self.device_sample_rate);
        let is_recording = Arc::clone(&self.is_recording);

        // cpal::Stream is not Send, so the stream lives on its own thread
        std::thread::spawn(move || {
            let device = match CpalCapture::get_input_device() {
                Ok(d) => d,
                Err(_) => {
                    is_recording.store(false, Ordering::SeqCst);
                    return;
                }
            };

            let (config, sample_format) = match CpalCapture::get_input_config(&device, target_rate)
            {
                Ok(c) => c,
                Err(_) => {
                    is_recording.store(false, Ordering::SeqCst);
                    return;
                }
            };

            let sample_rate = config.sample_rate.0;
            let channels = config.channels;
            device_sample_rate.store(sample_rate, Ordering::SeqCst);

            let audio_buffer_clone = Arc::clone(&audio_buffer);
            let is_recording_clone = Arc::clone(&is_recording);

            let stream_result = match sample_format {
                SampleFormat::I16 => device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if is_recording_clone.load(Ordering::SeqCst) {
                            let mono = CpalCapture::mix_to_mono(data, channels);
                            if let Ok(mut buffer) = audio_buffer_clone.lock() {
                                buffer.extend_from_slice(&mono);
                            }
                        }
                    },
                    |err| eprintln!("Audio stream error: {}", err),
                    None,
                ),

                SampleFormat::F32 => {
                    let audio_buffer_clone = Arc::clone(&audio_buffer);
                    let is_recording_clone = Arc::clone(&is_recording);

                    device.build_input_stream(
                        &config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            if is_recording_clone.load(Ordering::SeqCst) {
                                let i16_data: Vec<i16> =
                                    data.iter().map(|&s| (s * 32767.0) as i16).collect();
                                let mono = CpalCapture::mix_to_mono(&i16_data, channels);
                                if let Ok(mut buffer) = audio_buffer_clone.lock() {
                                    buffer.extend_from_slice(&mono);
                                }
                            }
                        },
                        |err| eprintln!("Audio stream error: {}", err),
                        None,
                    )
                }

                _ => {
                    is_recording.store(false, Ordering::SeqCst);
                    return;
                }
            };

            let stream = match stream_result {
                Ok(s) => s,
                Err(_) => {
                    is_recording.store(false, Ordering::SeqCst);
                    return;
                }
            };

            if stream.play().is_err() {
                is_recording.store(false, Ordering::SeqCst);
                return;
            }

            while is_recording.load(Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(100));
            }

            drop(stream);
        });

        // Give the thread a moment to start
        sleep(TokioDuration::from_millis(50)).await;

        if !self.is_recording.load(Ordering::SeqCst) {
            return Err(CaptureError::StartFailed(
                "Failed to start capture".to_string(),
            ));
        }

        let token = self.next_token.fetch_add(1, Ordering::SeqCst);
        self.active_token.store(token, Ordering::SeqCst);
        Ok(RecorderHandle::new(token))
    }

    async fn stop(&self, handle: RecorderHandle) -> Result<CapturedAudio, CaptureError> {
        if !self.is_recording.load(Ordering::SeqCst)
            || self.active_token.load(Ordering::SeqCst) != handle.token()
        {
            return Err(CaptureError::NoActiveCapture);
        }

        self.is_recording.store(false, Ordering::SeqCst);
        self.active_token.store(0, Ordering::SeqCst);

        // Give the stream thread a moment to clean up
        sleep(TokioDuration::from_millis(100)).await;

        let sample_rate = self.device_sample_rate.load(Ordering::SeqCst);
        if sample_rate == 0 {
            return Err(CaptureError::CaptureFailed("Sample rate not set".into()));
        }

        let samples = {
            let mut buffer = self.audio_buffer.lock().unwrap();
            std::mem::take(&mut *buffer)
        };

        if samples.is_empty() {
            return Err(CaptureError::CaptureFailed(
                "No audio data captured".to_string(),
            ));
        }

        tokio::task::spawn_blocking(move || Self::encode_wav(&samples, sample_rate))
            .await
            .map_err(|e| CaptureError::CaptureFailed(format!("Encode task error: {}", e)))?
    }
}
