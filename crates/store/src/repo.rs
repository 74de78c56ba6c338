//! Read access to committed snapshots, and the entry point for writes.

use crate::error::{ErrorKind, Result};
use crate::{Batch, Database, Identifier, Schema, sql};
use exn::ResultExt;
use iradio_merge::StreamRecord;
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqlitePool};

/// Repository for schemas and their snapshot tables.
///
/// Reads go straight to the pool and only see committed data. Writes are
/// grouped into a [`Batch`] via [`begin`](Self::begin).
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool.acquire().await.or_raise(|| ErrorKind::Database)
    }

    /// Start the single transaction of a run.
    ///
    /// The pool holds one connection, so reads through the repository must
    /// not be attempted while the batch is alive; read through the batch
    /// instead.
    pub async fn begin(&self) -> Result<Batch> {
        let tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        Ok(Batch::new(tx))
    }

    // =========================================================================
    // Schemas
    // =========================================================================

    /// List every schema except `excluding` (normally the destination),
    /// oldest first.
    pub async fn list_schemas(&self, excluding: &Identifier) -> Result<Vec<Schema>> {
        sql::list_schemas(&mut *self.connection().await?, excluding).await
    }

    pub async fn get_schema(&self, name: &Identifier) -> Result<Option<Schema>> {
        sql::get_schema(&mut *self.connection().await?, name).await
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Table names of a schema, in the order they were created.
    ///
    /// Returns [`ErrorKind::SchemaNotFound`] for an unknown schema.
    pub async fn list_tables(&self, schema: &Identifier) -> Result<Vec<Identifier>> {
        sql::list_tables(&mut *self.connection().await?, schema).await
    }

    /// Every record of a table, ordered by identifier.
    ///
    /// Returns [`ErrorKind::TableNotFound`] for a table that was never
    /// created in the schema.
    pub async fn read_table(&self, schema: &Identifier, table: &Identifier) -> Result<Vec<StreamRecord>> {
        sql::read_table(&mut *self.connection().await?, schema, table).await
    }
}
