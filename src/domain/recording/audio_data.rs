//! Captured audio value object

use std::fmt;

/// Supported audio containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Wav,
    M4a,
    Ogg,
}

impl AudioFormat {
    /// Get the MIME type string
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::M4a => "audio/mp4",
            Self::Ogg => "audio/ogg",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
        }
    }

    /// Guess the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "m4a" => Some(Self::M4a),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::Wav
    }
}

/// Value object holding finalized capture output.
/// Raw container bytes plus the container format.
#[derive(Debug, Clone)]
pub struct CapturedAudio {
    data: Vec<u8>,
    format: AudioFormat,
}

impl CapturedAudio {
    /// Create CapturedAudio from raw container bytes
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Get the raw bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the container format
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_mime_type() {
        assert_eq!(AudioFormat::Wav.mime_type(), "audio/wav");
        assert_eq!(AudioFormat::M4a.mime_type(), "audio/mp4");
        assert_eq!(AudioFormat::Ogg.mime_type(), "audio/ogg");
    }

    #[test]
    fn format_extension() {
        assert_eq!(AudioFormat::Wav.extension(), "wav");
        assert_eq!(AudioFormat::M4a.extension(), "m4a");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(AudioFormat::from_extension("WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_extension("ogg"), Some(AudioFormat::Ogg));
        assert_eq!(AudioFormat::from_extension("txt"), None);
    }

    #[test]
    fn default_format_is_wav() {
        assert_eq!(AudioFormat::default(), AudioFormat::Wav);
    }

    #[test]
    fn audio_size() {
        let audio = CapturedAudio::new(vec![0u8; 1024], AudioFormat::Wav);
        assert_eq!(audio.size_bytes(), 1024);
    }

    #[test]
    fn human_readable_size_bytes() {
        let audio = CapturedAudio::new(vec![0u8; 500], AudioFormat::Wav);
        assert_eq!(audio.human_readable_size(), "500 B");
    }

    #[test]
    fn human_readable_size_kb() {
        let audio = CapturedAudio::new(vec![0u8; 2048], AudioFormat::Wav);
        assert_eq!(audio.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn human_readable_size_mb() {
        let audio = CapturedAudio::new(vec![0u8; 2 * 1024 * 1024], AudioFormat::Wav);
        assert_eq!(audio.human_readable_size(), "2.0 MB");
    }

    #[test]
    fn into_data_returns_bytes() {
        let audio = CapturedAudio::new(vec![1, 2, 3], AudioFormat::Wav);
        assert_eq!(audio.into_data(), vec![1, 2, 3]);
    }
}
