pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod loader;
pub mod models;
pub mod provider;
pub mod services;

use anyhow::Context;
use clap::CommandFactory;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{
    Cli, Commands, cmd_details, cmd_discover, cmd_favorite, cmd_init, cmd_list_favorites,
    cmd_show_favorite, cmd_unfavorite,
};
pub use config::Config;
use config::{GeneralConfig, LogFormat};
pub use db::Store;
pub use provider::{FavoritesProvider, StoreError};

/// Loads the config named on the command line, or searches the usual
/// locations. A named file that does not exist yet yields the defaults so
/// `init` can create it.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) if path.exists() => Config::load_from_path(path),
        Some(_) => Config::load_defaults(),
        None => Config::load(),
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `general.log_level`.
pub fn init_tracing(general: &GeneralConfig) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level));

    let (pretty_layer, json_layer) = match general.log_format {
        LogFormat::Pretty => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty_layer)
        .with(json_layer)
        .try_init()
        .context("Failed to initialise logging")
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config.general)?;
    config.validate()?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };
    debug!(?command, "running command");

    match command {
        Commands::Discover { sort } => cmd_discover(&config, sort).await,
        Commands::Details { id } => cmd_details(&config, id).await,
        Commands::Favorite { id } => cmd_favorite(&config, id).await,
        Commands::Unfavorite { id } => cmd_unfavorite(&config, id).await,
        Commands::Favorites => cmd_list_favorites(&config).await,
        Commands::Show { id } => cmd_show_favorite(&config, id).await,
        Commands::Init => {
            let path = cli.config.unwrap_or_else(Config::default_config_path);
            cmd_init(&config, &path).await
        }
    }
}
