//! Init command handler

use std::path::Path;

use crate::config::Config;
use crate::db::{SchemaTransition, Store};

pub async fn cmd_init(config: &Config, config_path: &Path) -> anyhow::Result<()> {
    if Config::create_default_if_missing(config_path)? {
        println!("✓ Config file created at {}.", config_path.display());
        println!("  Set catalog.api_key (or POPMOVIES_API_KEY) before using the catalog.");
    } else {
        println!("Config file already exists at {}.", config_path.display());
    }

    let store = Store::from_config(&config.general).await?;
    match store.schema_transition() {
        SchemaTransition::Created => println!("✓ Favorites database created."),
        SchemaTransition::Unchanged => println!("Favorites database is up to date."),
        SchemaTransition::Upgraded { from, to } | SchemaTransition::Downgraded { from, to } => {
            println!("✓ Favorites database rebuilt (schema {from} -> {to}); stored favorites were cleared.");
        }
    }

    Ok(())
}
