//! SQLite note store
//!
//! Embedded database backend. Audio blobs live in the `notes` table next to
//! their metadata; the auto-increment row key, rendered as decimal digits,
//! is the note id. Deletes remove the row.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::application::ports::{NoteStore, StoreError};
use crate::domain::note::{NoteId, NoteLocation, VoiceNote};
use crate::domain::recording::{AudioFormat, CapturedAudio};

/// Note store over an embedded SQLite database.
///
/// rusqlite is blocking, so every operation clones the shared connection and
/// runs on the blocking thread pool.
pub struct SqliteNoteStore {
    conn: Arc<Mutex<Connection>>,
    prefix: String,
}

impl SqliteNoteStore {
    /// Open (or create) the database at the given path
    pub fn open(path: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            prefix: prefix.into(),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (used by tests)
    pub fn open_in_memory(prefix: impl Into<String>) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            prefix: prefix.into(),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                audio BLOB NOT NULL,
                format TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn parse_key(id: &NoteId) -> Result<i64, StoreError> {
        id.as_str()
            .parse()
            .map_err(|_| StoreError::InvalidId(id.to_string()))
    }

    fn parse_created_at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_note(key: i64, name: String, created_at: String) -> VoiceNote {
        VoiceNote {
            id: NoteId::new(key.to_string()),
            name,
            location: NoteLocation::Database { key },
            created_at: Self::parse_created_at(&created_at),
        }
    }

    /// Run a blocking closure against the shared connection
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| StoreError::Database(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Database(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn list(&self) -> Result<Vec<VoiceNote>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, created_at FROM notes ORDER BY id")
                .map_err(|e| StoreError::Database(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })
                .map_err(|e| StoreError::Database(e.to_string()))?;

            let mut notes = Vec::new();
            for row in rows {
                let (key, name, created_at) =
                    row.map_err(|e| StoreError::Database(e.to_string()))?;
                notes.push(Self::row_to_note(key, name, created_at));
            }
            Ok(notes)
        })
        .await
    }

    async fn save(&self, audio: CapturedAudio, name: Option<&str>) -> Result<VoiceNote, StoreError> {
        let prefix = self.prefix.clone();
        let name = name.map(str::to_string);
        let format = audio.format();
        let data = audio.into_data();

        self.with_conn(move |conn| {
            let created_at = Utc::now();
            let display_name = name
                .unwrap_or_else(|| format!("{}_{}", prefix, created_at.timestamp_millis()));

            conn.execute(
                "INSERT INTO notes (name, audio, format, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    display_name,
                    data,
                    format.extension(),
                    created_at.to_rfc3339()
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

            let key = conn.last_insert_rowid();
            Ok(VoiceNote {
                id: NoteId::new(key.to_string()),
                name: display_name,
                location: NoteLocation::Database { key },
                created_at,
            })
        })
        .await
    }

    async fn rename(&self, id: &NoteId, new_name: &str) -> Result<VoiceNote, StoreError> {
        let key = Self::parse_key(id)?;
        let id = id.clone();
        let new_name = new_name.to_string();

        self.with_conn(move |conn| {
            let updated = conn
                .execute(
                    "UPDATE notes SET name = ?1 WHERE id = ?2",
                    params![new_name, key],
                )
                .map_err(|e| StoreError::Database(e.to_string()))?;

            if updated == 0 {
                return Err(StoreError::NotFound(id.to_string()));
            }

            let created_at: String = conn
                .query_row(
                    "SELECT created_at FROM notes WHERE id = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .map_err(|e| StoreError::Database(e.to_string()))?;

            Ok(Self::row_to_note(key, new_name, created_at))
        })
        .await
    }

    async fn delete(&self, id: &NoteId) -> Result<(), StoreError> {
        // Unparseable ids cannot exist in this backend, so deleting one is
        // the idempotent no-op case
        let key = match Self::parse_key(id) {
            Ok(key) => key,
            Err(_) => return Ok(()),
        };

        self.with_conn(move |conn| {
            conn.execute("DELETE FROM notes WHERE id = ?1", params![key])
                .map_err(|e| StoreError::Database(e.to_string()))?;
            Ok(())
        })
        .await
    }

    async fn load_audio(&self, id: &NoteId) -> Result<CapturedAudio, StoreError> {
        let key = Self::parse_key(id)?;
        let id = id.clone();

        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT audio, format FROM notes WHERE id = ?1",
                    params![key],
                    |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()
                .map_err(|e| StoreError::Database(e.to_string()))?;

            let (data, format) = row.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            let format = AudioFormat::from_extension(&format).unwrap_or_default();
            Ok(CapturedAudio::new(data, format))
        })
        .await
    }
}

impl std::fmt::Debug for SqliteNoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteNoteStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Default database location under the platform data dir
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voxnote")
        .join("notes.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_accepts_digits() {
        assert_eq!(SqliteNoteStore::parse_key(&NoteId::new("42")).unwrap(), 42);
    }

    #[test]
    fn parse_key_rejects_non_numeric() {
        let err = SqliteNoteStore::parse_key(&NoteId::new("abc")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }

    #[test]
    fn parse_created_at_round_trips() {
        let now = Utc::now();
        let parsed = SqliteNoteStore::parse_created_at(&now.to_rfc3339());
        assert_eq!(parsed.timestamp_millis(), now.timestamp_millis());
    }
}
