//! SQLite snapshot store for scraped radio streams.
//!
//! # Architecture
//! The store keeps two kinds of data:
//! - **Schemas**: a named group of tables. Every scrape run writes a new
//!   schema (named after its timestamp) whose tables are never modified
//!   afterwards. One long-lived destination schema (`public` by default) is
//!   the target that runs are merged into.
//! - **Tables**: one per category, each a list of `(id, name, link)` stream
//!   records with `id` unique within the table.
//!
//! SQLite has no schema namespaces, so both are registries
//! (`schemas`, `tables`) with every record stored in one `streams` table keyed
//! by `(schema, table, id)`. Names are always bound as parameters and must be
//! valid [`Identifier`]s.
//!
//! Writes only happen through a [`Batch`], one transaction per run.

mod batch;
mod db;
pub mod error;
mod ident;
mod models;
mod repo;
mod sql;
mod store;

pub use crate::batch::Batch;
pub use crate::db::Database;
pub use crate::ident::{Identifier, MAX_IDENTIFIER_BYTES};
pub use crate::models::Schema;
pub use crate::repo::Repository;
pub use crate::store::SnapshotStore;
