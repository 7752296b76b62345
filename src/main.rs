//! Voxnote CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voxnote::cli::{
    app::{
        load_merged_config, run_delete, run_list, run_play, run_record, run_rename, run_search,
        EXIT_ERROR,
    },
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use voxnote::domain::config::AppConfig;
use voxnote::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Build CLI config from args and merge with file config
    let cli_config = AppConfig {
        notes_dir: cli.notes_dir,
        backend: cli.backend,
        database_path: cli.database,
        name_prefix: None, // Prefix comes from the config file only
    };
    let config = load_merged_config(cli_config).await;

    match cli.command {
        Commands::Record { name, duration } => run_record(&config, name, duration).await,
        Commands::List => run_list(&config).await,
        Commands::Search { query } => run_search(&config, &query).await,
        Commands::Rename { id, name } => run_rename(&config, &id, &name).await,
        Commands::Delete { id } => run_delete(&config, &id).await,
        Commands::Play { id } => run_play(&config, &id).await,
        Commands::Config { action } => {
            // Config management bypasses backend resolution
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
    }
}
