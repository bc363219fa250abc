use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::tmdb;
use crate::domain::SortOrder;

/// Environment variable that overrides `catalog.api_key`.
pub const API_KEY_ENV: &str = "POPMOVIES_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    pub log_format: LogFormat,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Change notification buffer per subscriber (default: 64)
    pub event_bus_buffer_size: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/popmovies.db".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            worker_threads: 2,
            event_bus_buffer_size: 64,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,

    pub image_base_url: String,

    /// Poster width segment, e.g. `w185`.
    pub poster_size: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    pub request_timeout_seconds: u64,

    pub sort_order: SortOrder,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: tmdb::BASE_URL.to_string(),
            image_base_url: tmdb::IMAGE_BASE_URL.to_string(),
            poster_size: tmdb::POSTER_SIZE.to_string(),
            api_key: String::new(),
            request_timeout_seconds: 30,
            sort_order: SortOrder::Popular,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Self::load_defaults()
    }

    /// Built-in defaults plus environment overrides.
    pub fn load_defaults() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    /// `.env` is read first so it can supply the key without exporting it.
    fn apply_env_overrides(&mut self) {
        let _ = dotenvy::dotenv();
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.catalog.api_key = key.trim().to_string();
            }
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("popmovies").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".popmovies").join("config.toml"));
        }

        paths
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Writes a default `config.toml` at `path` unless one exists.
    pub fn create_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("general.database_path cannot be empty");
        }

        if self.general.max_db_connections == 0 {
            anyhow::bail!("general.max_db_connections must be > 0");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("general.min_db_connections cannot exceed max_db_connections");
        }

        url::Url::parse(&self.catalog.base_url).context("Invalid catalog.base_url")?;
        url::Url::parse(&self.catalog.image_base_url)
            .context("Invalid catalog.image_base_url")?;

        if self.catalog.request_timeout_seconds == 0 {
            anyhow::bail!("catalog.request_timeout_seconds must be > 0");
        }

        Ok(())
    }

    /// Commands that reach the catalog need a key; local ones do not.
    pub fn require_api_key(&self) -> Result<&str> {
        if self.catalog.api_key.is_empty() {
            anyhow::bail!(
                "No catalog API key configured. Set catalog.api_key in config.toml or {API_KEY_ENV}"
            );
        }
        Ok(&self.catalog.api_key)
    }
}
