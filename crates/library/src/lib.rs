//! The two runs iradio performs.
//!
//! - [`populate`] scrapes selected categories into a new snapshot schema
//!   named after the time of the run.
//! - [`update`] folds snapshot schemas into the long-lived destination
//!   schema, merging tables both sides have and copying the rest.
//!
//! Both report progress as a stream of events and perform all of their
//! writes in a single [`Batch`](iradio_store::Batch): if the stream ends in an
//! error, or is dropped before it completes, nothing is written.

pub mod error;
mod populate;
mod stamp;
mod update;

pub use crate::populate::{PopulateEvent, populate};
pub use crate::stamp::{SNAPSHOT_NAME_FORMAT, snapshot_name};
pub use crate::update::{TableOutcome, TableSummary, UpdateEvent, UpdateSummary, merge_table, update};
