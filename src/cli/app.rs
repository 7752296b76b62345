//! Command runners
//!
//! Each subcommand resolves the configured backend, builds the matching
//! store, and hands it to a backend-generic runner.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::ports::{CaptureMode, ConfigStore, NoteStore};
use crate::application::{NotesRegistry, RecordingController};
use crate::domain::config::{AppConfig, StorageBackend};
use crate::domain::note::NoteId;
use crate::domain::recording::Duration;
use crate::infrastructure::store::default_database_path;
use crate::infrastructure::{CpalCapture, FsNoteStore, RodioPlayer, SqliteNoteStore, XdgConfigStore};

use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// How often the bounded-recording loop redraws its progress bar
const PROGRESS_TICK_MS: u64 = 250;

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Merge: defaults < file < cli (env vars arrive through clap's `env` attrs)
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Notes directory for the files backend
fn notes_dir(config: &AppConfig) -> PathBuf {
    config
        .notes_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_notes_dir)
}

fn default_notes_dir() -> PathBuf {
    dirs::audio_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voxnote")
}

fn fs_store(config: &AppConfig) -> FsNoteStore {
    FsNoteStore::new(notes_dir(config), config.name_prefix_or_default())
}

fn sqlite_store(config: &AppConfig) -> Result<SqliteNoteStore, String> {
    let path = config
        .database_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_database_path);
    SqliteNoteStore::open(path, config.name_prefix_or_default()).map_err(|e| e.to_string())
}

/// Dispatch a backend-generic runner to the configured store.
///
/// Opening the database can fail (unlike constructing the files store),
/// so the dispatch happens per command rather than through a trait object.
macro_rules! with_store {
    ($config:expr, $presenter:expr, |$store:ident| $body:expr) => {
        match $config.backend_or_default() {
            StorageBackend::Files => {
                let $store = fs_store($config);
                $body
            }
            StorageBackend::Database => match sqlite_store($config) {
                Ok($store) => $body,
                Err(e) => {
                    $presenter.error(&format!("Failed to open database: {}", e));
                    ExitCode::from(EXIT_ERROR)
                }
            },
        }
    };
}

/// Record a new voice note
pub async fn run_record(
    config: &AppConfig,
    name: Option<String>,
    duration: Option<String>,
) -> ExitCode {
    let presenter = Presenter::new();

    let limit = match duration.as_deref().map(str::parse::<Duration>) {
        Some(Ok(d)) => Some(d),
        Some(Err(e)) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        None => None,
    };

    with_store!(config, presenter, |store| {
        record_with(store, name.as_deref(), limit).await
    })
}

async fn record_with<S: NoteStore>(
    store: S,
    name: Option<&str>,
    limit: Option<Duration>,
) -> ExitCode {
    let mut presenter = Presenter::new();
    let capture = CpalCapture::new();
    let mut controller = RecordingController::new(capture, store);

    if let Err(e) = controller.start(CaptureMode::Voice).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    match limit {
        Some(limit) => {
            presenter.show_recording_progress("Recording...");
            let total_ms = limit.as_millis();
            let started = Instant::now();
            loop {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                if elapsed_ms >= total_ms {
                    break;
                }
                presenter.update_recording_progress(elapsed_ms, total_ms);
                tokio::time::sleep(std::time::Duration::from_millis(PROGRESS_TICK_MS)).await;
            }
        }
        None => {
            presenter.show_recording_progress("Recording... press Enter to stop");
            // Ctrl-C also stops and saves, the capture is finalized either way
            let mut line = String::new();
            let mut stdin = BufReader::new(tokio::io::stdin());
            tokio::select! {
                _ = stdin.read_line(&mut line) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
    }

    match controller.stop(name).await {
        Ok(note) => {
            presenter.spinner_success(&format!("Saved \"{}\" ({})", note.name, note.id));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// List all voice notes
pub async fn run_list(config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    with_store!(config, presenter, |store| list_with(store, "").await)
}

/// List voice notes matching a query
pub async fn run_search(config: &AppConfig, query: &str) -> ExitCode {
    let presenter = Presenter::new();
    with_store!(config, presenter, |store| list_with(store, query).await)
}

async fn list_with<S: NoteStore>(store: S, query: &str) -> ExitCode {
    let presenter = Presenter::new();
    let mut registry = NotesRegistry::new(store, RodioPlayer::new());

    if let Err(e) = registry.refresh().await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let matches = registry.filter(query);
    if matches.is_empty() {
        if query.is_empty() {
            presenter.info("No notes recorded yet");
        } else {
            presenter.info(&format!("No notes matching \"{}\"", query));
        }
    } else {
        presenter.note_list(&matches);
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Rename a voice note
pub async fn run_rename(config: &AppConfig, id: &str, new_name: &str) -> ExitCode {
    let presenter = Presenter::new();
    with_store!(config, presenter, |store| {
        rename_with(store, id, new_name).await
    })
}

async fn rename_with<S: NoteStore>(store: S, id: &str, new_name: &str) -> ExitCode {
    let presenter = Presenter::new();
    let mut registry = NotesRegistry::new(store, RodioPlayer::new());

    match registry.rename(&NoteId::new(id), new_name).await {
        Ok(note) => {
            presenter.success(&format!("Renamed to \"{}\" ({})", note.name, note.id));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Delete a voice note
pub async fn run_delete(config: &AppConfig, id: &str) -> ExitCode {
    let presenter = Presenter::new();
    with_store!(config, presenter, |store| delete_with(store, id).await)
}

async fn delete_with<S: NoteStore>(store: S, id: &str) -> ExitCode {
    let presenter = Presenter::new();
    let mut registry = NotesRegistry::new(store, RodioPlayer::new());

    match registry.delete(&NoteId::new(id)).await {
        Ok(()) => {
            presenter.success(&format!("Deleted {}", id));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Play a voice note through the default output device
pub async fn run_play(config: &AppConfig, id: &str) -> ExitCode {
    let presenter = Presenter::new();
    with_store!(config, presenter, |store| play_with(store, id).await)
}

async fn play_with<S: NoteStore>(store: S, id: &str) -> ExitCode {
    let mut presenter = Presenter::new();
    let mut registry = NotesRegistry::new(store, RodioPlayer::new());

    if let Err(e) = registry.play(&NoteId::new(id)).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.start_spinner(&format!("Playing {}... press Ctrl-C to stop", id));
    loop {
        if !registry.is_playing() {
            presenter.spinner_success("Playback finished");
            break;
        }
        tokio::select! {
            _ = tokio::time::sleep(std::time::Duration::from_millis(100)) => {}
            _ = tokio::signal::ctrl_c() => {
                registry.stop_playback();
                presenter.stop_spinner();
                presenter.info("Playback stopped");
                break;
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
