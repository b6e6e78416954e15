// src/crawl/classify.rs
// =============================================================================
// Decides what an anchor href means to the crawler.
//
// Rule, applied to every href on a fetched page:
// 1. If the href itself looks like scheme://host..., it is an origin
//    finding. It is recorded but never followed, whatever host it names.
// 2. Otherwise it is resolved against the page URL. If that lands on the
//    page's own origin (scheme, host, port) it is an internal link the
//    crawler may descend into.
// 3. A resolved URL on any other origin (`//host/x`, `https:host/x`,
//    `http://[::1]/`, hrefs with stray tabs or newlines) is an origin
//    finding too, recorded by its resolved form.
// 4. Anything that can't be resolved is dropped without comment.
//
// Fragments are stripped from resolved URLs so `/a#top` and `/a` are the
// same page.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static ABSOLUTE_ORIGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://[a-z0-9-]+(\.[a-z0-9-]+)*(:\d+)?").expect("static pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    /// A scheme+host href kept as written (trimmed), or the resolved form
    /// of an href that points off the page's origin.
    Origin(String),
    /// A page-relative or host-relative href, resolved to an absolute URL
    /// on the same origin as the page.
    Internal(Url),
    Unresolvable,
}

pub fn is_absolute_origin(href: &str) -> bool {
    ABSOLUTE_ORIGIN.is_match(href.trim())
}

pub fn classify(page: &Url, href: &str) -> LinkClass {
    let href = href.trim();
    if is_absolute_origin(href) {
        return LinkClass::Origin(href.to_string());
    }

    match resolve_href(page, href) {
        Some(url) if url.origin() == page.origin() => LinkClass::Internal(url),
        // Resolved somewhere else: record it, never follow it
        Some(url) => LinkClass::Origin(url.to_string()),
        None => LinkClass::Unresolvable,
    }
}

/// Resolves a (possibly relative) href or script src against the page it
/// was found on. Only http(s) results are kept.
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    let lowered = href.to_ascii_lowercase();

    // Anchors and special protocols never lead to another page
    if href.is_empty()
        || href.starts_with('#')
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("javascript:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}
