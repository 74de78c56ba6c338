//! Extraction from directory HTML pages.

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::listing::Listing;
use exn::{OptionExt, ResultExt};
use scraper::{ElementRef, Html};
use std::convert::Infallible;
use std::str::FromStr;
use tracing::instrument;

/// Wraps a parsed directory page; which methods make sense depends on whether
/// it is the front page or a category page.
#[derive(Debug)]
pub struct Extractor {
    document: Html,
}
impl Extractor {
    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    pub fn from_html(html: &str) -> Self {
        Self::from_document(Html::parse_document(html))
    }

    /// Category labels from the front page, in document order.
    ///
    /// Only the first `div.panel-body` block is considered; the site puts the
    /// genre list there and reuses the class further down for unrelated links.
    #[instrument(skip(self))]
    pub fn categories(&self) -> Result<Vec<String>> {
        let block = self
            .document
            .select(&consts::CATEGORY_BLOCK_SELECTOR)
            .next()
            .ok_or_raise(|| ErrorKind::MissingField("categories"))?;
        let categories: Vec<String> = block
            .select(&consts::CATEGORY_SELECTOR)
            .map(|el| text_of(&el))
            .filter(|label| !label.is_empty())
            .collect();
        tracing::debug!(count = categories.len(), "Found categories");
        Ok(categories)
    }

    /// Number of stations the category page claims to hold, taken from the
    /// first number in its lead paragraph.
    pub fn stream_count(&self) -> Result<u64> {
        let lead = self
            .document
            .select(&consts::LEAD_SELECTOR)
            .next()
            .map(|el| text_of(&el))
            .ok_or_raise(|| ErrorKind::MissingField("stream_count"))?;
        let count = consts::COUNT_REGEX
            .find(&lead)
            .ok_or_raise(|| ErrorKind::ParseError { field: "stream_count", value: lead.clone() })?;
        count.as_str().replace(',', "").parse::<u64>().or_raise(|| ErrorKind::ParseError {
            field: "stream_count",
            value: count.as_str().to_string(),
        })
    }

    /// Number of pages in the category.
    ///
    /// The pagination bar ends with a "next" item; the item just before it is
    /// the last page number. Without a "next" item the category fits on a
    /// single page.
    pub fn page_count(&self) -> Result<u32> {
        let Some(next) = self.document.select(&consts::NEXT_PAGE_SELECTOR).next() else {
            return Ok(1);
        };
        let Some(last) = next.prev_siblings().find_map(ElementRef::wrap) else {
            return Ok(1);
        };
        let value = text_of(&last);
        value.parse::<u32>().or_raise(|| ErrorKind::ParseError { field: "page_count", value: value.clone() })
    }

    /// Station rows of a category page, in document order.
    ///
    /// Each row is extracted independently: a row without a name or a
    /// playlist link yields an error for that row only.
    pub fn listings(&self) -> impl Iterator<Item = Result<Listing>> + '_ {
        self.document.select(&consts::ROW_SELECTOR).map(|row| listing(&row))
    }
}
impl FromStr for Extractor {
    type Err = Infallible;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_html(s))
    }
}
impl From<Html> for Extractor {
    fn from(document: Html) -> Self {
        Self::from_document(document)
    }
}

fn listing(row: &ElementRef<'_>) -> Result<Listing> {
    let name = row
        .select(&consts::STATION_NAME_SELECTOR)
        .next()
        .map(|el| text_of(&el))
        .filter(|name| !name.is_empty())
        .ok_or_raise(|| ErrorKind::MissingField("name"))?;
    let playlist = row
        .select(&consts::PLAYLIST_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or_raise(|| ErrorKind::MissingField("playlist"))?;
    Ok(Listing::from((name, playlist)))
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
