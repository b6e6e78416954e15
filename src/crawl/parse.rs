// src/crawl/parse.rs
// =============================================================================
// Pulls the raw references out of a fetched HTML page.
//
// Two kinds of reference matter to the crawler:
// - <a href="...">: classified as an origin finding or an internal link
// - <script src="...">: recorded as a JavaScript asset, never followed
//
// Values are returned exactly as written in the page (document order).
// Resolving them against the page URL is the classifier's job.
// =============================================================================

use scraper::{Html, Selector};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageRefs {
    pub anchors: Vec<String>,
    pub scripts: Vec<String>,
}

pub fn extract_page_refs(html: &str) -> PageRefs {
    let document = Html::parse_document(html);

    // Both selectors are constants and known to be valid
    let anchor_selector = Selector::parse("a[href]").expect("static selector");
    let script_selector = Selector::parse("script[src]").expect("static selector");

    let anchors = document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect();

    let scripts = document
        .select(&script_selector)
        .filter_map(|element| element.value().attr("src"))
        .map(str::to_string)
        .collect();

    PageRefs { anchors, scripts }
}
