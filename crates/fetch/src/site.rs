//! URL layout of the directory.

use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::ResultExt;
use reqwest::Url;

/// Root URL of the directory, always ending with `/`.
///
/// ```
/// use iradio_fetch::SiteUrl;
///
/// let site = SiteUrl::parse("https://www.internet-radio.com").unwrap();
/// assert_eq!(site.as_str(), "https://www.internet-radio.com/");
/// assert_eq!(
///     site.category("classic rock", 2).unwrap().as_str(),
///     "https://www.internet-radio.com/stations/classic%20rock/page2",
/// );
/// ```
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub struct SiteUrl(Url);

impl SiteUrl {
    pub fn parse(url: &str) -> Result<Self> {
        let mut url = url.trim().to_string();
        if !url.ends_with('/') {
            tracing::warn!(%url, "Site URL has no trailing '/', appending one");
            url.push('/');
        }
        let parsed = Url::parse(&url).or_raise(|| ErrorKind::InvalidUrl(url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            exn::bail!(ErrorKind::InvalidUrl(url));
        }
        Ok(Self(parsed))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn root(&self) -> &Url {
        &self.0
    }

    /// Page `page` of a category.
    ///
    /// The first page is the category directory itself (`stations/<label>/`),
    /// later pages are `stations/<label>/page<N>`. The label is a single path
    /// segment, so characters like `/` or `?` are percent-encoded rather than
    /// changing the shape of the URL.
    pub fn category(&self, label: &str, page: u32) -> Result<Url> {
        let mut url = self.0.clone();
        {
            let Ok(mut segments) = url.path_segments_mut() else {
                exn::bail!(ErrorKind::InvalidUrl(self.0.to_string()));
            };
            segments.pop_if_empty().push("stations").push(label);
            match page {
                0 | 1 => segments.push(""),
                n => segments.push(&format!("page{n}")),
            };
        }
        Ok(url)
    }

    /// Resolve a link found on a page.
    ///
    /// Root-relative links (`/servers/...`) are resolved against the site
    /// root, including any path prefix it has, not against the host.
    pub fn resolve(&self, href: &str) -> Result<Url> {
        let href = href.trim();
        if let Ok(absolute) = Url::parse(href) {
            return Ok(absolute);
        }
        self.0
            .join(href.trim_start_matches('/'))
            .or_raise(|| ErrorKind::InvalidUrl(href.to_string()))
    }
}
