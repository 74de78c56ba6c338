//! Synchronous parsing of downloaded pages into owned data.
//!
//! Parsed documents are not `Send`, so they must never be held across an
//! `.await`; everything here takes the page body and returns plain values.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use iradio_extract::{Extractor, Listing};

/// What the first page of a category tells us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryPage {
    pub stream_count: u64,
    pub page_count: u32,
    pub listings: Vec<Listing>,
}

pub(crate) fn categories(html: &str) -> Result<Vec<String>> {
    Extractor::from_html(html).categories().or_raise(|| ErrorKind::Extract)
}

pub(crate) fn first_page(html: &str) -> Result<CategoryPage> {
    let extractor = Extractor::from_html(html);
    Ok(CategoryPage {
        stream_count: extractor.stream_count().or_raise(|| ErrorKind::Extract)?,
        page_count: extractor.page_count().or_raise(|| ErrorKind::Extract)?,
        listings: listings_of(&extractor),
    })
}

pub(crate) fn listings(html: &str) -> Vec<Listing> {
    listings_of(&Extractor::from_html(html))
}

/// Rows that fail extraction are logged and skipped.
fn listings_of(extractor: &Extractor) -> Vec<Listing> {
    extractor
        .listings()
        .enumerate()
        .filter_map(|(row, listing)| match listing {
            Ok(listing) => Some(listing),
            Err(err) => {
                tracing::warn!(row, error = %err, "Skipping station row");
                None
            },
        })
        .collect()
}
