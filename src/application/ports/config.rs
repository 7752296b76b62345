//! Config store port interface

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for persisting application configuration
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the configuration (empty config if the file does not exist)
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Save the configuration
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Path to the backing file
    fn path(&self) -> PathBuf;

    /// Whether the backing file exists
    fn exists(&self) -> bool;

    /// Create the config file with defaults; fails if it already exists
    async fn init(&self) -> Result<(), ConfigError>;
}
