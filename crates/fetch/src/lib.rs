//! Client for the internet radio directory.
//!
//! [`HttpDirectory`] walks the site over HTTP: the front page lists the
//! categories, each category is paginated, and every station row links to an
//! M3U playlist that has to be downloaded to learn the actual stream URL.
//!
//! Consumers should depend on the [`Directory`] trait so they can be exercised
//! without the network (see `MockDirectory` behind the `mock` feature).

mod directory;
pub mod error;
mod http;
#[cfg(feature = "mock")]
mod mock;
mod page;
mod playlist;
mod site;

pub use crate::directory::Directory;
pub use crate::http::{HttpDirectory, PLAYLIST_CONCURRENCY};
#[cfg(feature = "mock")]
pub use crate::mock::MockDirectory;
pub use crate::site::SiteUrl;
pub use iradio_merge::Station;
