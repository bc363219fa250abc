use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::GeneralConfig;
use crate::provider::{ChangeNotifier, FavoritesProvider};
use crate::services::SeaOrmFavoritesService;

pub mod migrator;
pub mod schema;

pub use schema::{FavoritesSchema, SCHEMA_VERSION, SchemaTransition};

#[derive(Clone, Debug)]
pub struct Store {
    pub conn: DatabaseConnection,
    notifier: ChangeNotifier,
    transition: SchemaTransition,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1, 64).await
    }

    pub async fn from_config(general: &GeneralConfig) -> Result<Self> {
        Self::with_pool_options(
            &general.database_path,
            general.max_db_connections,
            general.min_db_connections,
            general.event_bus_buffer_size,
        )
        .await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
        event_bus_buffer_size: usize,
    ) -> Result<Self> {
        if !is_memory_url(db_url) {
            ensure_database_file(db_url).await?;
        }
        let opt = connect_options(db_url, max_connections, min_connections);

        let conn = Database::connect(opt).await?;
        let transition = FavoritesSchema::open(&conn).await?;

        info!(
            ?transition,
            schema_version = SCHEMA_VERSION,
            "Database connected (pool: {}-{})",
            min_connections,
            max_connections
        );

        Ok(Self {
            conn,
            notifier: ChangeNotifier::new(event_bus_buffer_size),
            transition,
        })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// What opening this store did to the on-disk schema.
    #[must_use]
    pub const fn schema_transition(&self) -> SchemaTransition {
        self.transition
    }

    #[must_use]
    pub fn provider(&self) -> FavoritesProvider {
        FavoritesProvider::new(self.conn.clone(), self.notifier.clone())
    }

    #[must_use]
    pub fn favorites(&self) -> SeaOrmFavoritesService {
        SeaOrmFavoritesService::new(self.provider())
    }
}

/// Held for as long as the process runs; losing it drops the whole database.
const MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 100);

fn connect_options(db_url: &str, max_connections: u32, min_connections: u32) -> ConnectOptions {
    let mut opt = ConnectOptions::new(db_url.to_string());
    if is_memory_url(db_url) {
        // Every pooled connection would otherwise see its own empty database,
        // and a recycled one comes back without tables.
        opt.max_connections(1)
            .min_connections(1)
            .idle_timeout(MEMORY_CONNECTION_LIFETIME)
            .max_lifetime(MEMORY_CONNECTION_LIFETIME);
    } else {
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600));
    }
    opt.connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    opt
}

fn is_memory_url(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

/// Filesystem path behind a `sqlite:` URL, without query parameters.
fn database_file(db_url: &str) -> &str {
    let path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    path.split('?').next().unwrap_or(path)
}

async fn ensure_database_file(db_url: &str) -> Result<()> {
    let path = Path::new(database_file(db_url));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    if !path.exists() {
        tokio::fs::File::create(path).await?;
    }
    Ok(())
}
