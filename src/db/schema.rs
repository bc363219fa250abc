//! Versioned lifecycle of the favorites schema.
//!
//! The store is a cache of catalog data, so every version change discards
//! the tables instead of migrating rows.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use sea_orm_migration::MigratorTrait;
use std::cmp::Ordering;
use tracing::{info, warn};

use super::migrator::Migrator;
use crate::provider::StoreError;

/// Version written to `PRAGMA user_version` once the schema is in place.
pub const SCHEMA_VERSION: i32 = 2;

/// What opening the store did to the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaTransition {
    Created,
    Unchanged,
    Upgraded { from: i32, to: i32 },
    Downgraded { from: i32, to: i32 },
}

pub struct FavoritesSchema;

impl FavoritesSchema {
    /// Brings the database to [`SCHEMA_VERSION`].
    pub async fn open(conn: &DatabaseConnection) -> Result<SchemaTransition, StoreError> {
        let stored = Self::stored_version(conn).await?;

        let transition = match stored.cmp(&SCHEMA_VERSION) {
            _ if stored == 0 => {
                Self::create(conn).await?;
                SchemaTransition::Created
            }
            Ordering::Equal => {
                Self::create(conn).await?;
                SchemaTransition::Unchanged
            }
            Ordering::Less => {
                Self::upgrade(conn, stored, SCHEMA_VERSION).await?;
                SchemaTransition::Upgraded {
                    from: stored,
                    to: SCHEMA_VERSION,
                }
            }
            Ordering::Greater => {
                Self::downgrade(conn, stored, SCHEMA_VERSION).await?;
                SchemaTransition::Downgraded {
                    from: stored,
                    to: SCHEMA_VERSION,
                }
            }
        };

        Self::set_version(conn, SCHEMA_VERSION).await?;
        Ok(transition)
    }

    /// Creates the movie, trailer and review tables if they are absent.
    pub async fn create(conn: &DatabaseConnection) -> Result<(), StoreError> {
        Migrator::up(conn, None).await.map_err(StoreError::Schema)
    }

    /// Drops and recreates every table; existing rows are lost.
    pub async fn upgrade(
        conn: &DatabaseConnection,
        old_version: i32,
        new_version: i32,
    ) -> Result<(), StoreError> {
        warn!(
            old_version,
            new_version, "Upgrading favorites schema, cached favorites are discarded"
        );
        Self::recreate(conn).await
    }

    /// Same policy as [`FavoritesSchema::upgrade`].
    pub async fn downgrade(
        conn: &DatabaseConnection,
        old_version: i32,
        new_version: i32,
    ) -> Result<(), StoreError> {
        warn!(
            old_version,
            new_version, "Downgrading favorites schema, cached favorites are discarded"
        );
        Self::recreate(conn).await
    }

    async fn recreate(conn: &DatabaseConnection) -> Result<(), StoreError> {
        Migrator::fresh(conn).await.map_err(StoreError::Schema)?;
        info!("Favorites tables recreated");
        Ok(())
    }

    pub async fn stored_version(conn: &DatabaseConnection) -> Result<i32, StoreError> {
        let row = conn
            .query_one(Statement::from_string(
                DbBackend::Sqlite,
                "PRAGMA user_version".to_string(),
            ))
            .await
            .map_err(StoreError::Schema)?;

        match row {
            Some(row) => row.try_get_by_index::<i32>(0).map_err(StoreError::Schema),
            None => Ok(0),
        }
    }

    pub async fn set_version(conn: &DatabaseConnection, version: i32) -> Result<(), StoreError> {
        conn.execute_unprepared(&format!("PRAGMA user_version = {version}"))
            .await
            .map_err(StoreError::Schema)?;
        Ok(())
    }
}
