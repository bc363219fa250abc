//! Resource-addressed access to the favorites tables.
//!
//! One interface serves every caller: the address picks the table (or the
//! movie-with-trailers-and-reviews view), and every mutation that changes at
//! least one row is published on the store's [`ChangeNotifier`].

pub mod error;
pub mod notify;
pub mod query;
pub mod resource;
pub mod values;

pub use error::StoreError;
pub use notify::{ChangeNotifier, LiveRows, ResourceChange};
pub use query::{MOVIE_WITH_EXTRAS_COLUMNS, Query, Selection};
pub use resource::{InsertedRow, Resource, Table};
pub use values::{ColumnValue, ContentValues, Row};

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct FavoritesProvider {
    conn: DatabaseConnection,
    notifier: ChangeNotifier,
}

impl FavoritesProvider {
    #[must_use]
    pub const fn new(conn: DatabaseConnection, notifier: ChangeNotifier) -> Self {
        Self { conn, notifier }
    }

    /// Parses an address into the resource it designates.
    pub fn resolve(&self, address: &str) -> Result<Resource, StoreError> {
        address.parse()
    }

    /// Observes every change published by this provider.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ResourceChange> {
        self.notifier.subscribe()
    }

    /// Reads rows from the addressed table, or from the join view for
    /// `movie/{remoteId}`.
    ///
    /// The join view yields one row per trailer/review combination of the
    /// movie, with NULL trailer/review columns when either side is empty.
    /// Rows are not deduplicated.
    pub async fn query(&self, resource: &Resource, query: &Query) -> Result<LiveRows, StoreError> {
        let changes = self.notifier.subscribe();
        let plan = query::build_select(resource, query);
        debug!(%resource, sql = %plan.statement.sql, "query");

        let results = self.conn.query_all(plan.statement).await?;
        let mut rows = Vec::with_capacity(results.len());
        for result in &results {
            let values = (0..plan.labels.len())
                .map(|i| ColumnValue::decode(result, i))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(Row::new(plan.labels.clone(), values));
        }

        Ok(LiveRows::new(*resource, rows, changes))
    }

    /// Inserts one row. A clash on the table's remote-id column replaces the
    /// existing row.
    pub async fn insert(
        &self,
        resource: &Resource,
        values: &ContentValues,
    ) -> Result<InsertedRow, StoreError> {
        let table = Self::collection_table(resource)?;
        let row_id = Self::insert_row(&self.conn, resource, table, values).await?;
        debug!(%resource, row_id, "inserted row");

        self.notifier.notify(*resource, 1);
        Ok(InsertedRow { table, row_id })
    }

    /// Inserts a batch of rows and returns how many were written.
    ///
    /// Trailer and review batches run in one transaction: the first failing
    /// record rolls back the whole batch. Any other address degrades to
    /// independent [`FavoritesProvider::insert`] calls.
    pub async fn bulk_insert(
        &self,
        resource: &Resource,
        records: &[ContentValues],
    ) -> Result<u64, StoreError> {
        let table = match resource {
            Resource::Trailers | Resource::Reviews => resource.table(),
            _ => return self.insert_one_by_one(resource, records).await,
        };

        let txn = self.conn.begin().await?;
        let mut inserted = 0_u64;
        for values in records {
            // Dropping `txn` on the error path rolls the batch back.
            Self::insert_row(&txn, resource, table, values).await?;
            inserted += 1;
        }
        txn.commit().await?;

        debug!(%resource, inserted, "bulk insert committed");
        self.notifier.notify(*resource, inserted);
        Ok(inserted)
    }

    /// Updates the rows matching `selection`, or every row when it is
    /// missing or blank.
    pub async fn update(
        &self,
        resource: &Resource,
        values: &ContentValues,
        selection: Option<&Selection>,
    ) -> Result<u64, StoreError> {
        let table = Self::collection_table(resource)?;
        if values.is_empty() {
            return Err(StoreError::write_failed(resource, "no values to update"));
        }

        let result = self
            .conn
            .execute(query::build_update(table, values, selection))
            .await?;
        let updated = result.rows_affected();
        debug!(%resource, updated, "update");

        self.notifier.notify(*resource, updated);
        Ok(updated)
    }

    /// Deletes the rows matching `selection`.
    ///
    /// `None` or a blank selection deletes every row of the table.
    pub async fn delete(
        &self,
        resource: &Resource,
        selection: Option<&Selection>,
    ) -> Result<u64, StoreError> {
        let table = Self::collection_table(resource)?;

        let result = self
            .conn
            .execute(query::build_delete(table, selection))
            .await?;
        let deleted = result.rows_affected();
        debug!(%resource, deleted, "delete");

        self.notifier.notify(*resource, deleted);
        Ok(deleted)
    }

    async fn insert_one_by_one(
        &self,
        resource: &Resource,
        records: &[ContentValues],
    ) -> Result<u64, StoreError> {
        let mut inserted = 0_u64;
        for values in records {
            self.insert(resource, values).await?;
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn insert_row<C: ConnectionTrait>(
        conn: &C,
        resource: &Resource,
        table: Table,
        values: &ContentValues,
    ) -> Result<i64, StoreError> {
        let result = conn.execute(query::build_insert(table, values)).await?;
        let row_id = i64::try_from(result.last_insert_id()).unwrap_or_default();
        if row_id <= 0 {
            return Err(StoreError::write_failed(resource, "insert produced no row id"));
        }
        Ok(row_id)
    }

    /// Only the table addresses accept writes; the join view is read-only.
    fn collection_table(resource: &Resource) -> Result<Table, StoreError> {
        match resource {
            Resource::MovieWithExtras(_) => {
                Err(StoreError::UnsupportedResource(resource.to_string()))
            }
            other => Ok(other.table()),
        }
    }
}
