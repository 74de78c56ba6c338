//! Queries shared by the pool-backed [`Repository`](crate::Repository) and
//! the transaction-backed [`Batch`](crate::Batch).
//!
//! Every helper takes a plain connection so the same code runs either on a
//! pooled connection or inside a transaction.

use crate::error::{ErrorKind, Result};
use crate::models::{SchemaRow, StreamRow};
use crate::{Identifier, Schema};
use exn::ResultExt;
use iradio_merge::{Operation, StreamRecord};
use sqlx::SqliteConnection;
use time::UtcDateTime;

pub(crate) async fn get_schema(conn: &mut SqliteConnection, name: &Identifier) -> Result<Option<Schema>> {
    let row: Option<SchemaRow> = sqlx::query_as(include_str!("../queries/get_schema.sql"))
        .bind(name.as_str())
        .fetch_optional(conn)
        .await
        .or_raise(|| ErrorKind::Database)?;
    row.map(Schema::try_from).transpose()
}

pub(crate) async fn require_schema(conn: &mut SqliteConnection, name: &Identifier) -> Result<Schema> {
    match get_schema(conn, name).await? {
        Some(schema) => Ok(schema),
        None => exn::bail!(ErrorKind::SchemaNotFound(name.to_string())),
    }
}

pub(crate) async fn list_schemas(conn: &mut SqliteConnection, excluding: &Identifier) -> Result<Vec<Schema>> {
    let rows: Vec<SchemaRow> = sqlx::query_as(include_str!("../queries/list_schemas.sql"))
        .bind(excluding.as_str())
        .fetch_all(conn)
        .await
        .or_raise(|| ErrorKind::Database)?;
    rows.into_iter().map(Schema::try_from).collect()
}

pub(crate) async fn list_tables(conn: &mut SqliteConnection, schema: &Identifier) -> Result<Vec<Identifier>> {
    require_schema(conn, schema).await?;
    let names: Vec<String> = sqlx::query_scalar(include_str!("../queries/list_tables.sql"))
        .bind(schema.as_str())
        .fetch_all(conn)
        .await
        .or_raise(|| ErrorKind::Database)?;
    names
        .into_iter()
        .map(|name| Identifier::new(name).or_raise(|| ErrorKind::InvalidData("table name")))
        .collect()
}

pub(crate) async fn table_exists(conn: &mut SqliteConnection, schema: &Identifier, table: &Identifier) -> Result<bool> {
    let exists: i64 = sqlx::query_scalar(include_str!("../queries/table_exists.sql"))
        .bind(schema.as_str())
        .bind(table.as_str())
        .fetch_one(conn)
        .await
        .or_raise(|| ErrorKind::Database)?;
    Ok(exists != 0)
}

/// Only registered tables may be read from or written to.
pub(crate) async fn require_table(conn: &mut SqliteConnection, schema: &Identifier, table: &Identifier) -> Result<()> {
    if !table_exists(conn, schema, table).await? {
        exn::bail!(ErrorKind::TableNotFound(schema.to_string(), table.to_string()));
    }
    Ok(())
}

pub(crate) async fn read_table(
    conn: &mut SqliteConnection,
    schema: &Identifier,
    table: &Identifier,
) -> Result<Vec<StreamRecord>> {
    require_table(conn, schema, table).await?;
    let rows: Vec<StreamRow> = sqlx::query_as(include_str!("../queries/read_table.sql"))
        .bind(schema.as_str())
        .bind(table.as_str())
        .fetch_all(conn)
        .await
        .or_raise(|| ErrorKind::Database)?;
    rows.into_iter().map(StreamRecord::try_from).collect()
}

pub(crate) async fn create_schema(conn: &mut SqliteConnection, name: &Identifier, created_at: UtcDateTime) -> Result<()> {
    sqlx::query(include_str!("../queries/drop_schema.sql"))
        .bind(name.as_str())
        .execute(&mut *conn)
        .await
        .map_err(ErrorKind::database)?;
    sqlx::query(include_str!("../queries/create_schema.sql"))
        .bind(name.as_str())
        .bind(created_at.unix_timestamp())
        .execute(conn)
        .await
        .map_err(ErrorKind::database)?;
    Ok(())
}

/// Returns `true` if the schema did not exist yet.
pub(crate) async fn ensure_schema(conn: &mut SqliteConnection, name: &Identifier, created_at: UtcDateTime) -> Result<bool> {
    let result = sqlx::query(include_str!("../queries/ensure_schema.sql"))
        .bind(name.as_str())
        .bind(created_at.unix_timestamp())
        .execute(conn)
        .await
        .map_err(ErrorKind::database)?;
    Ok(result.rows_affected() > 0)
}

/// Drop-if-exists, then register an empty table at the end of the schema.
pub(crate) async fn create_table(conn: &mut SqliteConnection, schema: &Identifier, table: &Identifier) -> Result<()> {
    require_schema(conn, schema).await?;
    sqlx::query(include_str!("../queries/drop_table.sql"))
        .bind(schema.as_str())
        .bind(table.as_str())
        .execute(&mut *conn)
        .await
        .map_err(ErrorKind::database)?;
    sqlx::query(include_str!("../queries/create_table.sql"))
        .bind(schema.as_str())
        .bind(table.as_str())
        .bind(schema.as_str())
        .execute(conn)
        .await
        .map_err(ErrorKind::database)?;
    Ok(())
}

pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    schema: &Identifier,
    table: &Identifier,
    record: &StreamRecord,
) -> Result<()> {
    let row = StreamRow::try_from(record)?;
    sqlx::query(include_str!("../queries/insert_stream.sql"))
        .bind(schema.as_str())
        .bind(table.as_str())
        .bind(row.id)
        .bind(row.name)
        .bind(row.link)
        .execute(conn)
        .await
        .map_err(ErrorKind::database)?;
    Ok(())
}

pub(crate) async fn update_name(
    conn: &mut SqliteConnection,
    schema: &Identifier,
    table: &Identifier,
    link: &str,
    name: &str,
) -> Result<u64> {
    let result = sqlx::query(include_str!("../queries/update_stream_name.sql"))
        .bind(name)
        .bind(schema.as_str())
        .bind(table.as_str())
        .bind(link)
        .execute(conn)
        .await
        .map_err(ErrorKind::database)?;
    Ok(result.rows_affected())
}

/// Apply operations in order, stopping at the first failure.
pub(crate) async fn apply(
    conn: &mut SqliteConnection,
    schema: &Identifier,
    table: &Identifier,
    operations: &[Operation],
) -> Result<()> {
    require_table(conn, schema, table).await?;
    for operation in operations {
        match operation {
            Operation::Insert(record) => insert(conn, schema, table, record).await?,
            Operation::Update { link, name } => {
                let rows = update_name(conn, schema, table, link, name).await?;
                tracing::debug!(%schema, %table, %link, %name, rows, "Renamed stream");
            },
        }
    }
    Ok(())
}

pub(crate) async fn copy_table(
    conn: &mut SqliteConnection,
    from: &Identifier,
    to: &Identifier,
    table: &Identifier,
) -> Result<u64> {
    require_table(conn, from, table).await?;
    create_table(conn, to, table).await?;
    let result = sqlx::query(include_str!("../queries/copy_table.sql"))
        .bind(to.as_str())
        .bind(from.as_str())
        .bind(table.as_str())
        .execute(conn)
        .await
        .map_err(ErrorKind::database)?;
    Ok(result.rows_affected())
}
