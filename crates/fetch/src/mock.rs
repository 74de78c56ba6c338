//! In-memory directory for testing.

use crate::error::{ErrorKind, Result};
use crate::{Directory, Station};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// In-memory [`Directory`] for testing.
///
/// Categories keep their insertion order. A category can be marked as
/// failing to simulate a network outage part way through a run, and the
/// stations of a category can be replaced between runs.
///
/// # Examples
///
/// ```
/// use iradio_fetch::{Directory, MockDirectory, Station};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let directory = MockDirectory::with_categories([
///     ("Rock", vec![Station::new("Rock FM", "http://a")]),
///     ("Jazz", vec![]),
/// ]);
/// assert_eq!(directory.categories().await?, vec!["Rock", "Jazz"]);
/// assert_eq!(directory.fetch_category("Rock").await?.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockDirectory {
    categories: RwLock<Vec<(String, Vec<Station>)>>,
    failing: RwLock<HashSet<String>>,
}

impl MockDirectory {
    pub fn with_categories<L, S>(categories: impl IntoIterator<Item = (L, S)>) -> Self
    where
        L: Into<String>,
        S: IntoIterator<Item = Station>,
    {
        let categories = categories
            .into_iter()
            .map(|(label, stations)| (label.into(), stations.into_iter().collect()))
            .collect();
        Self { categories: RwLock::new(categories), failing: RwLock::default() }
    }

    /// Replace (or append) the stations of a category.
    pub async fn set_category(&self, label: &str, stations: Vec<Station>) {
        let mut categories = self.categories.write().await;
        match categories.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, current)) => *current = stations,
            None => categories.push((label.to_string(), stations)),
        }
    }

    /// Make every later fetch of `label` fail with a network error.
    pub async fn fail_category(&self, label: &str) {
        self.failing.write().await.insert(label.to_string());
    }
}

#[async_trait]
impl Directory for MockDirectory {
    async fn categories(&self) -> Result<Vec<String>> {
        Ok(self.categories.read().await.iter().map(|(label, _)| label.clone()).collect())
    }

    async fn fetch_category(&self, label: &str) -> Result<Vec<Station>> {
        if self.failing.read().await.contains(label) {
            exn::bail!(ErrorKind::Network);
        }
        self.categories
            .read()
            .await
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, stations)| stations.clone())
            .ok_or_else(|| exn::Exn::from(ErrorKind::Status(404)))
    }
}
