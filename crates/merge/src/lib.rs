//! Stream records and the snapshot merge engine.
//!
//! A scrape run produces one snapshot table per category. Snapshots are never
//! edited once written; instead, the long-lived destination table for each
//! category is brought up to date by [`merge`]-ing a snapshot into it.
//!
//! # Merge rules
//! Records are keyed by their `link` (the resolved playlist URL):
//! - link unknown to the destination: inserted with a fresh identifier,
//! - link known but the display name changed: the name is updated in place,
//! - link known with the same name: nothing happens.
//!
//! Nothing is ever deleted and identifiers are never reused, so merging the
//! same snapshot twice is a no-op the second time.

mod merge;
mod record;

pub use crate::merge::{MergePlan, Operation, merge};
pub use crate::record::{Station, StreamRecord};
