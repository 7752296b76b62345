//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// Voxnote - record, organize, and play back voice notes
#[derive(Parser, Debug)]
#[command(name = "voxnote")]
#[command(version)]
#[command(about = "Record, organize, and play back voice notes")]
#[command(long_about = None)]
pub struct Cli {
    /// Storage backend (files, database)
    #[arg(short = 'b', long, value_name = "BACKEND", env = "VOXNOTE_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Notes directory for the files backend
    #[arg(long, value_name = "DIR", env = "VOXNOTE_NOTES_DIR", global = true)]
    pub notes_dir: Option<String>,

    /// Database file for the database backend
    #[arg(long, value_name = "FILE", env = "VOXNOTE_DATABASE", global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new voice note
    Record {
        /// Display name for the note (default: <prefix>_<timestamp>)
        #[arg(short = 'n', long, value_name = "NAME")]
        name: Option<String>,

        /// Stop automatically after this long (e.g., 30s, 1m); otherwise
        /// recording stops on Enter
        #[arg(short = 'd', long, value_name = "TIME")]
        duration: Option<String>,
    },
    /// List all voice notes
    List,
    /// List voice notes whose name contains the query (case-insensitive)
    Search {
        /// Substring to match against note names
        query: String,
    },
    /// Rename a voice note
    Rename {
        /// Note id (see `voxnote list`)
        id: String,
        /// New display name
        name: String,
    },
    /// Delete a voice note
    Delete {
        /// Note id (see `voxnote list`)
        id: String,
    },
    /// Play a voice note
    Play {
        /// Note id (see `voxnote list`)
        id: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["notes_dir", "backend", "database_path", "name_prefix"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
