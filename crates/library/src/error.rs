//! Library Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. The kind names the subsystem that failed; the error
//! tree underneath carries the details.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The radio directory could not be read.
    #[display("could not read from the radio directory")]
    Directory,
    /// A snapshot store operation failed; the run was rolled back.
    #[display("snapshot store operation failed")]
    Store,
    /// A category label cannot be used as a table name.
    #[display("category label cannot be used as a table name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
    /// The run timestamp could not be turned into a schema name.
    #[display("could not name the snapshot schema")]
    Stamp,
    /// A schema cannot be merged into itself.
    #[display("source schema is the destination schema: {_0}")]
    SourceIsDestination(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Directory)
    }
}
