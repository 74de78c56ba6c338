use crate::error::Result;
use async_trait::async_trait;
use iradio_merge::Station;

/// A source of radio categories and their stations.
///
/// # Examples
///
/// ```
/// use iradio_fetch::{Directory, error::Result};
///
/// async fn station_total(directory: &dyn Directory) -> Result<usize> {
///     let mut total = 0;
///     for label in directory.categories().await? {
///         total += directory.fetch_category(&label).await?.len();
///     }
///     Ok(total)
/// }
/// ```
#[async_trait]
pub trait Directory: Send + Sync {
    /// Category labels, in the order the directory lists them.
    async fn categories(&self) -> Result<Vec<String>>;

    /// Every station of a category across all of its pages, in page order,
    /// with stream links already resolved.
    ///
    /// Stations whose details cannot be extracted or whose playlist cannot
    /// be resolved are skipped (and logged); failing to load a page at all
    /// is an error.
    async fn fetch_category(&self, label: &str) -> Result<Vec<Station>>;
}
