//! Filesystem note store
//!
//! Notes live as audio files in a single directory, with display names kept
//! in a JSON sidecar (`notes.json`) beside them. The sidecar is keyed by a
//! stable id token embedded in each filename, so renaming a note never
//! touches the key space.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::fs;

use crate::application::ports::{NoteStore, StoreError};
use crate::domain::note::{NoteId, NoteLocation, VoiceNote};
use crate::domain::recording::{AudioFormat, CapturedAudio};

/// Sidecar filename, excluded from note listings
const SIDECAR_FILE: &str = "notes.json";

/// Minimum digit count for a filename suffix to count as an id token.
/// Millisecond timestamps are 13 digits; the floor keeps names like
/// "track_01" from being misread as tokenized.
const MIN_TOKEN_DIGITS: usize = 10;

/// Mapping from id token to display name
type Sidecar = BTreeMap<String, String>;

/// Note store over a notes directory plus JSON sidecar.
///
/// Filenames follow `<sanitized-name>_<token>.<ext>`. The token is assigned
/// at save time and survives renames; it is the note's id. Files dropped into
/// the directory by other means are listed too, with the filename itself as
/// both id and display name.
pub struct FsNoteStore {
    dir: PathBuf,
    prefix: String,
}

impl FsNoteStore {
    /// Create a store over the given notes directory
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    fn sidecar_path(&self) -> PathBuf {
        self.dir.join(SIDECAR_FILE)
    }

    async fn load_sidecar(&self) -> Result<Sidecar, StoreError> {
        let path = self.sidecar_path();
        if !path.exists() {
            return Ok(Sidecar::new());
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| StoreError::Sidecar(e.to_string()))
    }

    async fn save_sidecar(&self, sidecar: &Sidecar) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let content =
            serde_json::to_string_pretty(sidecar).map_err(|e| StoreError::Sidecar(e.to_string()))?;

        fs::write(self.sidecar_path(), content)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    /// Replace filename-hostile characters, keeping alphanumerics, '-' and '_'
    fn sanitize(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        if cleaned.is_empty() {
            "note".to_string()
        } else {
            cleaned
        }
    }

    /// Split a file stem into (display part, id token), if tokenized
    fn parse_stem(stem: &str) -> Option<(&str, &str)> {
        let (head, tail) = stem.rsplit_once('_')?;
        if tail.len() >= MIN_TOKEN_DIGITS && tail.chars().all(|c| c.is_ascii_digit()) {
            Some((head, tail))
        } else {
            None
        }
    }

    fn created_at_from_token(token: &str) -> Option<DateTime<Utc>> {
        let millis: i64 = token.parse().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }

    /// Find the file carrying the given id (token or literal filename)
    async fn resolve(&self, id: &NoteId) -> Result<Option<PathBuf>, StoreError> {
        for filename in self.list_filenames().await? {
            let path = self.dir.join(&filename);
            let stem = Path::new(&filename)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(&filename);

            match Self::parse_stem(stem) {
                Some((_, token)) if token == id.as_str() => return Ok(Some(path)),
                None if filename == id.as_str() => return Ok(Some(path)),
                _ => {}
            }
        }
        Ok(None)
    }

    async fn list_filenames(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let mut filenames = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
            if !file_type.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name == SIDECAR_FILE {
                continue;
            }
            filenames.push(name);
        }
        Ok(filenames)
    }

    async fn note_from_filename(
        &self,
        filename: &str,
        sidecar: &Sidecar,
    ) -> Result<VoiceNote, StoreError> {
        let path = self.dir.join(filename);
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);

        let (id, name, created_at) = match Self::parse_stem(stem) {
            Some((_, token)) => {
                let name = sidecar
                    .get(token)
                    .cloned()
                    .unwrap_or_else(|| stem.to_string());
                let created_at = match Self::created_at_from_token(token) {
                    Some(ts) => ts,
                    None => self.modified_time(&path).await?,
                };
                (NoteId::new(token), name, created_at)
            }
            // Pre-existing file without a token: the filename is the id and,
            // absent a sidecar entry, the name too
            None => {
                let name = sidecar
                    .get(filename)
                    .cloned()
                    .unwrap_or_else(|| stem.to_string());
                let created_at = self.modified_time(&path).await?;
                (NoteId::new(filename), name, created_at)
            }
        };

        Ok(VoiceNote {
            id,
            name,
            location: NoteLocation::File(path),
            created_at,
        })
    }

    async fn modified_time(&self, path: &Path) -> Result<DateTime<Utc>, StoreError> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        let modified = metadata.modified().map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(DateTime::<Utc>::from(modified))
    }
}

#[async_trait]
impl NoteStore for FsNoteStore {
    async fn list(&self) -> Result<Vec<VoiceNote>, StoreError> {
        let sidecar = self.load_sidecar().await?;

        let mut notes = Vec::new();
        for filename in self.list_filenames().await? {
            notes.push(self.note_from_filename(&filename, &sidecar).await?);
        }

        notes.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(notes)
    }

    async fn save(&self, audio: CapturedAudio, name: Option<&str>) -> Result<VoiceNote, StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let mut sidecar = self.load_sidecar().await?;
        let stem_base = match name {
            Some(n) => Self::sanitize(n),
            None => self.prefix.clone(),
        };
        let ext = audio.format().extension();

        // Millisecond timestamp as the id token, bumped on collision
        let mut token = Utc::now().timestamp_millis();
        let (token, path) = loop {
            let candidate = self.dir.join(format!("{}_{}.{}", stem_base, token, ext));
            if !candidate.exists() && !sidecar.contains_key(&token.to_string()) {
                break (token, candidate);
            }
            token += 1;
        };

        let display_name = match name {
            Some(n) => n.to_string(),
            None => format!("{}_{}", self.prefix, token),
        };

        fs::write(&path, audio.data())
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        sidecar.insert(token.to_string(), display_name.clone());
        self.save_sidecar(&sidecar).await?;

        Ok(VoiceNote {
            id: NoteId::new(token.to_string()),
            name: display_name,
            location: NoteLocation::File(path),
            created_at: Self::created_at_from_token(&token.to_string()).unwrap_or_else(Utc::now),
        })
    }

    async fn rename(&self, id: &NoteId, new_name: &str) -> Result<VoiceNote, StoreError> {
        let path = self
            .resolve(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        // Tokenized files move to the new display name; the token (and with
        // it the sidecar key) stays put. Foreign files keep their filename,
        // since it doubles as their id.
        let new_path = match Self::parse_stem(&stem) {
            Some((_, token)) => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("wav")
                    .to_string();
                let renamed = self
                    .dir
                    .join(format!("{}_{}.{}", Self::sanitize(new_name), token, ext));
                if renamed != path {
                    fs::rename(&path, &renamed)
                        .await
                        .map_err(|e| StoreError::Io(e.to_string()))?;
                }
                renamed
            }
            None => path,
        };

        let mut sidecar = self.load_sidecar().await?;
        sidecar.insert(id.as_str().to_string(), new_name.to_string());
        self.save_sidecar(&sidecar).await?;

        let created_at = match Self::created_at_from_token(id.as_str()) {
            Some(ts) => ts,
            None => self.modified_time(&new_path).await?,
        };

        Ok(VoiceNote {
            id: id.clone(),
            name: new_name.to_string(),
            location: NoteLocation::File(new_path),
            created_at,
        })
    }

    async fn delete(&self, id: &NoteId) -> Result<(), StoreError> {
        if let Some(path) = self.resolve(id).await? {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                // Already gone between resolve and remove: benign
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::Io(e.to_string())),
            }
        }

        let mut sidecar = self.load_sidecar().await?;
        if sidecar.remove(id.as_str()).is_some() {
            self.save_sidecar(&sidecar).await?;
        }
        Ok(())
    }

    async fn load_audio(&self, id: &NoteId) -> Result<CapturedAudio, StoreError> {
        let path = self
            .resolve(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let data = fs::read(&path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(AudioFormat::from_extension)
            .unwrap_or_default();

        Ok(CapturedAudio::new(data, format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(FsNoteStore::sanitize("My-note_1"), "My-note_1");
        assert_eq!(FsNoteStore::sanitize("Meeting Notes"), "Meeting-Notes");
        assert_eq!(FsNoteStore::sanitize("a/b\\c"), "a-b-c");
    }

    #[test]
    fn sanitize_empty_falls_back() {
        assert_eq!(FsNoteStore::sanitize(""), "note");
    }

    #[test]
    fn parse_stem_extracts_token() {
        let (head, token) = FsNoteStore::parse_stem("Idea_1724400000000").unwrap();
        assert_eq!(head, "Idea");
        assert_eq!(token, "1724400000000");
    }

    #[test]
    fn parse_stem_handles_underscored_names() {
        let (head, token) = FsNoteStore::parse_stem("my_note_1724400000000").unwrap();
        assert_eq!(head, "my_note");
        assert_eq!(token, "1724400000000");
    }

    #[test]
    fn parse_stem_rejects_short_numeric_suffix() {
        assert!(FsNoteStore::parse_stem("track_01").is_none());
        assert!(FsNoteStore::parse_stem("plain").is_none());
    }

    #[test]
    fn created_at_from_token_parses_millis() {
        let ts = FsNoteStore::created_at_from_token("1724400000000").unwrap();
        assert_eq!(ts.timestamp_millis(), 1724400000000);
    }

    #[test]
    fn created_at_from_token_rejects_garbage() {
        assert!(FsNoteStore::created_at_from_token("notanumber").is_none());
    }
}
