//! Field extraction for the pages of an internet radio directory.
//!
//! The directory exposes three kinds of document:
//! - the front page, listing every genre ("category") as a link,
//! - paginated category pages, one table row per station,
//! - per-station M3U playlists, whose first entry is the stream URL.
//!
//! This crate only parses; downloading lives elsewhere.

mod consts;
pub mod error;
mod extractor;
mod listing;
mod playlist;

pub use crate::extractor::Extractor;
pub use crate::listing::Listing;
pub use crate::playlist::stream_url;
