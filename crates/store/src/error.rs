//! Store Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// A write was rejected by a uniqueness or foreign key constraint.
    #[display("constraint violation")]
    Constraint,
    #[display("schema not found: {_0}")]
    SchemaNotFound(#[error(not(source))] String),
    #[display("table not found: {_0}.{_1}")]
    TableNotFound(#[error(not(source))] String, String),
    /// Schema and table names come from scraped labels; reject the unusable ones.
    #[display("invalid identifier: {_0:?}")]
    InvalidIdentifier(#[error(not(source))] String),
    /// Serialization/deserialization error.
    #[display("invalid store data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Wrap a query error, classifying constraint violations separately from
    /// every other database failure. The `sqlx` error is kept as a child in
    /// the error tree.
    #[track_caller]
    pub(crate) fn database(err: sqlx::Error) -> Error {
        let kind = match err.as_database_error() {
            Some(db) if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation() => {
                Self::Constraint
            },
            _ => Self::Database,
        };
        exn::Exn::from(err).raise(kind)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
