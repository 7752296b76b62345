//! Opaque note identifier

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value object identifying a voice note.
///
/// The inner string is a backend-specific encoding (an id token embedded in
/// the filename for the filesystem backend, the decimal row key for the
/// database backend). Callers must treat it as opaque; only the storage
/// adapter that issued an id can interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Create a NoteId from its backend encoding
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the encoded form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NoteId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_raw_string() {
        let id = NoteId::new("1724400000000");
        assert_eq!(id.as_str(), "1724400000000");
        assert_eq!(id.to_string(), "1724400000000");
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(NoteId::new("42"), NoteId::from("42"));
        assert_ne!(NoteId::new("42"), NoteId::new("43"));
    }
}
