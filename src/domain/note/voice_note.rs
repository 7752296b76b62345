//! Voice note entity

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::NoteId;

/// Where a note's audio lives.
///
/// Only used for display; loading audio goes through the storage adapter so
/// neither variant leaks into calling code as a raw path or key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteLocation {
    /// Audio file inside the notes directory
    File(PathBuf),
    /// Row in the embedded database
    Database { key: i64 },
}

impl fmt::Display for NoteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Database { key } => write!(f, "db#{}", key),
        }
    }
}

/// A persisted voice note.
///
/// Created on a successful stop-and-persist, mutated on rename, destroyed on
/// delete. `name` is a display name and is unique only by convention.
#[derive(Debug, Clone)]
pub struct VoiceNote {
    pub id: NoteId,
    pub name: String,
    pub location: NoteLocation,
    pub created_at: DateTime<Utc>,
}

impl VoiceNote {
    /// Case-insensitive substring match on the display name.
    /// An empty query matches every note.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(name: &str) -> VoiceNote {
        VoiceNote {
            id: NoteId::new("1"),
            name: name.to_string(),
            location: NoteLocation::Database { key: 1 },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_query_matches() {
        assert!(note("Meeting Notes").matches(""));
    }

    #[test]
    fn match_is_case_insensitive() {
        let n = note("Meeting Notes");
        assert!(n.matches("meeting"));
        assert!(n.matches("NOTES"));
        assert!(n.matches("ing n"));
    }

    #[test]
    fn non_matching_query() {
        assert!(!note("Meeting Notes").matches("idea"));
    }

    #[test]
    fn location_display() {
        assert_eq!(
            NoteLocation::Database { key: 7 }.to_string(),
            "db#7".to_string()
        );
        assert_eq!(
            NoteLocation::File(PathBuf::from("/notes/a.wav")).to_string(),
            "/notes/a.wav".to_string()
        );
    }
}
