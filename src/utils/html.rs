//! Scraping for the store's login and shelf pages.

use scraper::{Html, Selector};
use std::sync::LazyLock;

static INPUT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("input").expect("valid input selector"));

static SHELF_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".shelf-item h3 a").expect("valid shelf selector"));

/// Value of the first `<input name="...">` with the given name.
pub fn input_value(document: &str, name: &str) -> Option<String> {
    let html = Html::parse_document(document);
    html.select(&INPUT)
        .find(|input| input.value().attr("name") == Some(name))
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
}

/// `(text, href)` of every link matching `.shelf-item h3 a`, in document order.
///
/// Links without an `href` are skipped.
pub fn shelf_links(document: &str) -> Vec<(String, String)> {
    let html = Html::parse_document(document);
    html.select(&SHELF_LINK)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            let text: String = link.text().collect();
            Some((collapse_whitespace(&text), href.to_string()))
        })
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
