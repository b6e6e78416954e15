// src/crawl/engine.rs
// =============================================================================
// The crawl engine: depth-first traversal of a site from a seed URL.
//
// How it works:
// 1. The seed goes onto a worklist at depth 1 and is marked visited
// 2. Pop the most recent item; refuse it if its depth is past max_depth
// 3. Fetch the page. On failure, report it and move on (its children are
//    never explored, everything else carries on)
// 4. Record every <script src> as a JavaScript asset
// 5. Classify every <a href>:
//    - origin (absolute href, or one resolving off the page's origin):
//      record once, never follow
//    - internal link: if not yet visited, mark visited, record it and
//      schedule it at depth + 1
// 6. Repeat until the worklist is empty
//
// Children are pushed in reverse so the first link on a page is the next
// one fetched, which gives the same visiting order as plain recursion
// without growing the call stack.
//
// Everything runs on one task, one fetch at a time. The visited set is the
// only dedup gate: a URL goes in before it is scheduled, so no URL is ever
// fetched twice.
// =============================================================================

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use url::Url;

use super::classify::{self, LinkClass};
use super::fetch::Fetcher;
use super::parse;
use crate::report::{Event, Reporter};

// A page waiting to be fetched
#[derive(Debug, Clone)]
struct CrawlItem {
    url: Url,
    depth: usize, // Seed is 1, each descent adds one
}

/// Cumulative findings of one crawl.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub subdomains: BTreeSet<String>,
    pub links: BTreeSet<String>,
    pub scripts: BTreeSet<String>,
    pub pages_fetched: usize,
}

pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    reporter: Reporter,
    max_depth: usize,
}

impl Crawler {
    /// `max_depth` is expected to be at least 1; see `CrawlJob::new`.
    pub fn new(fetcher: Arc<dyn Fetcher>, reporter: Reporter, max_depth: usize) -> Self {
        Self {
            fetcher,
            reporter,
            max_depth,
        }
    }

    // Crawls from `seed` until the worklist runs dry.
    //
    // Returns: the cumulative findings. Incremental findings and fetch
    // errors have already gone out through the reporter by then.
    pub async fn run(&self, seed: &Url) -> CrawlReport {
        let mut report = CrawlReport::default();

        // Every URL that has been scheduled, seed included
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(seed.to_string());

        let mut worklist = vec![CrawlItem {
            url: seed.clone(),
            depth: 1,
        }];

        // Last in, first out: that is what makes this depth-first
        while let Some(item) = worklist.pop() {
            // Refuse the step before doing any work
            if item.depth > self.max_depth {
                tracing::trace!(url = %item.url, depth = item.depth, "past max depth, not fetching");
                continue;
            }

            tracing::debug!(url = %item.url, depth = item.depth, "crawling");

            // A failed page is reported and skipped; its children are never seen
            let html = match self.fetcher.fetch(&item.url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::debug!(url = %item.url, error = %e, "fetch failed");
                    self.reporter.emit(Event::FetchError {
                        url: item.url.to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            report.pages_fetched += 1;

            let refs = parse::extract_page_refs(&html);

            // Scripts are recorded, never followed
            for src in &refs.scripts {
                let Some(asset) = classify::resolve_href(&item.url, src) else {
                    continue;
                };
                let asset = asset.to_string();
                if report.scripts.insert(asset.clone()) {
                    self.reporter.emit(Event::FoundScript { url: asset });
                }
            }

            let mut children = Vec::new();
            for href in &refs.anchors {
                match classify::classify(&item.url, href) {
                    // Repeats of an origin already seen are no-ops
                    LinkClass::Origin(origin) => {
                        if report.subdomains.insert(origin.clone()) {
                            self.reporter.emit(Event::FoundSubdomain { url: origin });
                        }
                    }
                    LinkClass::Internal(url) => {
                        let key = url.to_string();
                        // Mark before scheduling so nothing is queued twice
                        if visited.insert(key.clone()) {
                            report.links.insert(key.clone());
                            self.reporter.emit(Event::FoundLink {
                                url: key,
                                depth: item.depth + 1,
                            });
                            children.push(CrawlItem {
                                url,
                                depth: item.depth + 1,
                            });
                        }
                    }
                    LinkClass::Unresolvable => {}
                }
            }

            // Reversed so the first link on the page is popped next
            worklist.extend(children.into_iter().rev());
        }

        report
    }
}
