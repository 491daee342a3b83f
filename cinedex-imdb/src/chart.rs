//! Top-chart page parsing.
//!
//! Two markups are recognised: the legacy table layout
//! (`td.titleColumn a`) and the current list layout
//! (`a.ipc-title-link-wrapper`). The legacy selector wins when it matches.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

static LEGACY_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("td.titleColumn a[href]")
        .expect("unreachable error: failed to parse legacy chart selector")
});
static LIST_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a.ipc-title-link-wrapper[href]")
        .expect("unreachable error: failed to parse list chart selector")
});
static TITLE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/title/(tt\d+)").expect("unreachable error: failed to compile title id pattern")
});

/// One movie link found on the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartEntry {
    /// Link as it appears in the page, e.g. `/title/tt0111161/?ref_=chttp_t_1`.
    pub href: String,
    /// IMDb title id, e.g. `tt0111161`.
    pub title_id: String,
}

/// Extract the `tt…` id from a title link.
pub fn title_id(href: &str) -> Option<String> {
    TITLE_ID.captures(href).map(|c| c[1].to_string())
}

/// Collect chart entries in page order, dropping repeats of the same title.
pub fn parse_chart(html: &str) -> Vec<ChartEntry> {
    let document = Html::parse_document(html);

    let mut links: Vec<&str> =
        document.select(&LEGACY_LINK).filter_map(|a| a.value().attr("href")).collect();
    if links.is_empty() {
        links = document.select(&LIST_LINK).filter_map(|a| a.value().attr("href")).collect();
    }

    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter_map(|href| {
            let id = title_id(href)?;
            seen.insert(id.clone()).then(|| ChartEntry { href: href.to_string(), title_id: id })
        })
        .collect()
}
