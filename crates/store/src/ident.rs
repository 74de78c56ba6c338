//! Validation of schema and table names.
//!
//! Table names are category labels scraped from a website, so they are
//! untrusted. They are only ever bound as query parameters, never spliced into
//! SQL text, but they still have to be usable as names.

use crate::error::{Error, ErrorKind, Result};
use derive_more::Display;
use std::ops::Deref;
use std::str::FromStr;

/// Longest accepted name, in bytes (PostgreSQL's identifier limit).
pub const MAX_IDENTIFIER_BYTES: usize = 63;

/// A validated schema or table name.
///
/// # Rules
/// - not empty, and not only whitespace,
/// - no leading or trailing whitespace,
/// - no control characters (this includes null bytes),
/// - at most [`MAX_IDENTIFIER_BYTES`] bytes long.
///
/// # Examples
///
/// ```
/// use iradio_store::Identifier;
/// assert!(Identifier::new("Classic Rock").is_ok());
/// assert!(Identifier::new("2026-Oct-19 14:05").is_ok());
/// assert!(Identifier::new("").is_err());
/// assert!(Identifier::new(" padded ").is_err());
/// assert!(Identifier::new("nul\0byte").is_err());
/// ```
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let valid = !name.trim().is_empty()
            && name.trim() == name
            && name.len() <= MAX_IDENTIFIER_BYTES
            && !name.chars().any(char::is_control);
        match valid {
            true => Ok(Self(name)),
            false => exn::bail!(ErrorKind::InvalidIdentifier(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl Deref for Identifier {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
impl FromStr for Identifier {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
impl TryFrom<String> for Identifier {
    type Error = Error;
    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}
impl TryFrom<&str> for Identifier {
    type Error = Error;
    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}
impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
