//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::StorageBackend;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    // Validate value based on key type
    validate_config_value(key, value)?;

    // Load existing config
    let mut config = store.load().await?;

    // Update the appropriate field
    match key {
        "notes_dir" => config.notes_dir = Some(value.to_string()),
        "backend" => config.backend = Some(value.to_lowercase()),
        "database_path" => config.database_path = Some(value.to_string()),
        "name_prefix" => config.name_prefix = Some(value.to_string()),
        _ => unreachable!(), // Already validated
    }

    // Save config
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;

    let value = match key {
        "notes_dir" => config.notes_dir,
        "backend" => config.backend,
        "database_path" => config.database_path,
        "name_prefix" => config.name_prefix,
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value(
        "notes_dir",
        config.notes_dir.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value("backend", config.backend.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "database_path",
        config.database_path.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "name_prefix",
        config.name_prefix.as_deref().unwrap_or("(not set)"),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "backend" => {
            value
                .parse::<StorageBackend>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e,
                })?;
        }
        "name_prefix" => {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must not be empty".to_string(),
                });
            }
        }
        _ => {} // notes_dir and database_path accept any path string
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_backend_valid() {
        assert!(validate_config_value("backend", "files").is_ok());
        assert!(validate_config_value("backend", "database").is_ok());
        assert!(validate_config_value("backend", "db").is_ok());
    }

    #[test]
    fn validate_backend_invalid() {
        assert!(validate_config_value("backend", "cloud").is_err());
    }

    #[test]
    fn validate_name_prefix_rejects_empty() {
        assert!(validate_config_value("name_prefix", "Memo").is_ok());
        assert!(validate_config_value("name_prefix", "  ").is_err());
    }

    #[test]
    fn validate_paths_accept_any_string() {
        assert!(validate_config_value("notes_dir", "/tmp/notes").is_ok());
        assert!(validate_config_value("database_path", "relative/notes.db").is_ok());
    }
}
