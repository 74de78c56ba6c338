//! Fetch Error Types

use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The directory root (or a link found on a page) is not a usable URL.
    #[display("invalid URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// The HTTP client could not be constructed.
    #[display("could not build HTTP client")]
    Client,
    /// The request never produced a response (DNS, connection, timeout, ...).
    #[display("network failure")]
    Network,
    /// The server answered with a non-success status.
    #[display("unexpected HTTP status {_0}")]
    Status(#[error(not(source))] u16),
    /// A page was downloaded but does not look like a directory page.
    #[display("could not extract page contents")]
    Extract,
    /// A playlist could not be spooled to disk or read back.
    #[display("temporary file failure")]
    Io,
    /// A playlist was downloaded but holds no stream URL.
    #[display("unusable playlist")]
    Playlist,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network | Self::Io => true,
            Self::Status(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
