//! All-or-nothing write scope for a single run.

use crate::error::{ErrorKind, Result};
use crate::{Identifier, Schema, SnapshotStore, sql};
use async_trait::async_trait;
use exn::ResultExt;
use iradio_merge::{Operation, StreamRecord};
use sqlx::{Sqlite, Transaction};
use time::UtcDateTime;
use tracing::instrument;

/// One transaction spanning everything a "populate" or "update" run writes.
///
/// Nothing is visible to other connections until [`commit`](Self::commit).
/// Dropping a batch without committing (for example because an operation
/// failed and the error was propagated with `?`) rolls back every write made
/// through it.
pub struct Batch {
    tx: Transaction<'static, Sqlite>,
}
impl Batch {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    /// Create a schema, replacing (and cascading to the tables of) any
    /// existing schema with the same name.
    #[instrument(skip_all, fields(schema = %name))]
    pub async fn create_schema(&mut self, name: &Identifier) -> Result<Schema> {
        let created_at = UtcDateTime::now();
        sql::create_schema(&mut self.tx, name, created_at).await?;
        tracing::info!("Created schema");
        sql::require_schema(&mut self.tx, name).await
    }

    /// Create the schema if it does not exist yet; existing tables are kept.
    pub async fn ensure_schema(&mut self, name: &Identifier) -> Result<Schema> {
        if sql::ensure_schema(&mut self.tx, name, UtcDateTime::now()).await? {
            tracing::info!(schema = %name, "Created schema");
        }
        sql::require_schema(&mut self.tx, name).await
    }

    pub async fn get_schema(&mut self, name: &Identifier) -> Result<Option<Schema>> {
        sql::get_schema(&mut self.tx, name).await
    }

    pub async fn table_exists(&mut self, schema: &Identifier, table: &Identifier) -> Result<bool> {
        sql::table_exists(&mut self.tx, schema, table).await
    }

    /// Replace a table wholesale: drop it if it exists, then recreate it with
    /// exactly `records`.
    #[instrument(skip_all, fields(%schema, %table, records = records.len()))]
    pub async fn write_table(&mut self, schema: &Identifier, table: &Identifier, records: &[StreamRecord]) -> Result<()> {
        sql::create_table(&mut self.tx, schema, table).await?;
        for record in records {
            sql::insert(&mut self.tx, schema, table, record).await?;
        }
        tracing::debug!("Table written");
        Ok(())
    }

    /// Copy a whole table (identifiers included) from one schema into
    /// another, replacing any table of the same name in the target schema.
    ///
    /// Returns the number of rows copied.
    #[instrument(skip_all, fields(%from, %to, %table))]
    pub async fn copy_table(&mut self, from: &Identifier, to: &Identifier, table: &Identifier) -> Result<u64> {
        sql::copy_table(&mut self.tx, from, to, table).await
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.or_raise(|| ErrorKind::Database)
    }

    /// Explicitly discard every write made through this batch.
    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await.or_raise(|| ErrorKind::Database)
    }
}

#[async_trait]
impl SnapshotStore for Batch {
    async fn list_tables(&mut self, schema: &Identifier) -> Result<Vec<Identifier>> {
        sql::list_tables(&mut self.tx, schema).await
    }

    async fn read_table(&mut self, schema: &Identifier, table: &Identifier) -> Result<Vec<StreamRecord>> {
        sql::read_table(&mut self.tx, schema, table).await
    }

    async fn apply(&mut self, schema: &Identifier, table: &Identifier, operations: &[Operation]) -> Result<()> {
        sql::apply(&mut self.tx, schema, table, operations).await
    }
}
