use crate::error::{ErrorKind, Result};
use crate::{Directory, SiteUrl, page, playlist};
use async_trait::async_trait;
use exn::ResultExt;
use futures::{StreamExt, stream};
use iradio_extract::Listing;
use iradio_merge::Station;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::instrument;

/// Number of playlists downloaded at the same time within a category.
pub const PLAYLIST_CONCURRENCY: usize = 8;

/// [`Directory`] backed by the live website.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    site: SiteUrl,
}

impl HttpDirectory {
    pub fn new(site: SiteUrl, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self { client, site })
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await.or_raise(|| ErrorKind::Network)?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn get_text(&self, url: Url) -> Result<String> {
        self.get(url).await?.text().await.or_raise(|| ErrorKind::Network)
    }

    /// Download a station's playlist and turn it into a stream link.
    async fn resolve(&self, listing: Listing) -> Result<Station> {
        let url = self.site.resolve(&listing.playlist)?;
        let body = self.get(url).await?.bytes().await.or_raise(|| ErrorKind::Network)?.to_vec();
        let link = tokio::task::spawn_blocking(move || playlist::stream_url(&body))
            .await
            .or_raise(|| ErrorKind::Io)??;
        Ok(Station::new(listing.name, link))
    }
}

#[async_trait]
impl Directory for HttpDirectory {
    #[instrument(skip(self), fields(site = %self.site))]
    async fn categories(&self) -> Result<Vec<String>> {
        let html = self.get_text(self.site.root().clone()).await?;
        page::categories(&html)
    }

    #[instrument(skip(self))]
    async fn fetch_category(&self, label: &str) -> Result<Vec<Station>> {
        let first = page::first_page(&self.get_text(self.site.category(label, 1)?).await?)?;
        tracing::info!(pages = first.page_count, streams = first.stream_count, "Downloading category");

        // Owned by this call; nothing carries over between categories.
        let mut listings = first.listings;
        for number in 2..=first.page_count {
            let html = self.get_text(self.site.category(label, number)?).await?;
            listings.extend(page::listings(&html));
        }

        let listed = listings.len();
        let stations: Vec<Station> = stream::iter(listings)
            .map(|listing| async move {
                let (name, playlist) = (listing.name.clone(), listing.playlist.clone());
                match self.resolve(listing).await {
                    Ok(station) => Some(station),
                    Err(err) => {
                        tracing::warn!(station = %name, %playlist, error = ?err, "Skipping station");
                        None
                    },
                }
            })
            .buffered(PLAYLIST_CONCURRENCY)
            .filter_map(std::future::ready)
            .collect()
            .await;
        tracing::info!(listed, resolved = stations.len(), "Category downloaded");
        Ok(stations)
    }
}
