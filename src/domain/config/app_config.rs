//! Application configuration value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which storage backend holds the notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Notes directory plus JSON sidecar
    #[default]
    Files,
    /// Embedded SQLite database
    Database,
}

impl StorageBackend {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Database => "database",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "files" | "fs" => Ok(Self::Files),
            "database" | "db" => Ok(Self::Database),
            other => Err(format!(
                "Invalid backend: \"{}\". Valid backends are: files, database",
                other
            )),
        }
    }
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub notes_dir: Option<String>,
    pub backend: Option<String>,
    pub database_path: Option<String>,
    pub name_prefix: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            notes_dir: None,
            backend: Some("files".to_string()),
            database_path: None,
            name_prefix: Some("VoiceNote".to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            notes_dir: other.notes_dir.or(self.notes_dir),
            backend: other.backend.or(self.backend),
            database_path: other.database_path.or(self.database_path),
            name_prefix: other.name_prefix.or(self.name_prefix),
        }
    }

    /// Get backend as parsed StorageBackend, or Files if not set/invalid
    pub fn backend_or_default(&self) -> StorageBackend {
        self.backend
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get the default-name prefix, or "VoiceNote" if not set
    pub fn name_prefix_or_default(&self) -> &str {
        self.name_prefix.as_deref().unwrap_or("VoiceNote")
    }
}
