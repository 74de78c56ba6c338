use crate::Identifier;
use crate::error::Result;
use async_trait::async_trait;
use iradio_merge::{Operation, StreamRecord};

/// Read and write access to snapshot tables, as needed by a merge.
///
/// Implementations decide the transaction scope; [`Batch`](crate::Batch)
/// keeps every call inside the run's single transaction, so a failed
/// [`apply`](Self::apply) leaves nothing behind once the batch is dropped.
#[async_trait]
pub trait SnapshotStore: Send {
    /// Table names of a schema, in the order they were created.
    async fn list_tables(&mut self, schema: &Identifier) -> Result<Vec<Identifier>>;

    /// Every record of a table, ordered by identifier.
    async fn read_table(&mut self, schema: &Identifier, table: &Identifier) -> Result<Vec<StreamRecord>>;

    /// Apply operations in order. Stops at the first failing operation.
    async fn apply(&mut self, schema: &Identifier, table: &Identifier, operations: &[Operation]) -> Result<()>;
}
