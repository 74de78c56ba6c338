use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Front page: the genre list.
selector!(CATEGORY_BLOCK_SELECTOR, "div.panel-body");
selector!(CATEGORY_SELECTOR, "a");
// Category page: "There are 1,234 stations..." and the pagination bar.
selector!(LEAD_SELECTOR, "p.lead");
regex!(COUNT_REGEX, r"\d{1,3}(?:,\d{3})+|\d+");
selector!(NEXT_PAGE_SELECTOR, "li.next");
// Category page: one table row per station.
selector!(ROW_SELECTOR, "tr");
selector!(STATION_NAME_SELECTOR, "h4");
selector!(PLAYLIST_SELECTOR, r#"a[title="M3U Playlist File"][href]"#);
