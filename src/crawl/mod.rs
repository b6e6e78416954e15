// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Submodules:
// - fetch: the HTTP primitive (trait + reqwest implementation)
// - parse: pulls anchors and script sources out of HTML
// - classify: decides whether an href is an origin finding or an internal link
// - engine: the depth-first traversal itself
//
// `run` wraps the engine with the run-level protocol: a start event, the
// traversal, one summary per finding set, then the completion marker.
// =============================================================================

mod classify;
mod engine;
mod fetch;
mod parse;

use std::sync::Arc;

use url::Url;

pub use engine::CrawlReport;
pub use fetch::{Fetcher, ReqwestFetcher, DEFAULT_TIMEOUT};

use engine::Crawler;

use crate::error::ConfigError;
use crate::report::{Event, Reporter, RunKind, SummaryKind};

/// A validated crawl request.
#[derive(Debug, Clone)]
pub struct CrawlJob {
    seed: Url,
    max_depth: usize,
}

impl CrawlJob {
    pub fn new(seed: &str, max_depth: usize) -> Result<Self, ConfigError> {
        if max_depth < 1 {
            return Err(ConfigError::InvalidDepth(max_depth));
        }

        let invalid = |reason: String| ConfigError::InvalidSeed {
            url: seed.to_string(),
            reason,
        };

        let mut url = Url::parse(seed.trim()).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid("scheme must be http or https".to_string()));
        }
        if url.host_str().is_none() {
            return Err(invalid("URL has no host".to_string()));
        }
        url.set_fragment(None);

        Ok(Self {
            seed: url,
            max_depth,
        })
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }
}

/// Runs one crawl from start marker to completion marker.
pub async fn run(job: CrawlJob, fetcher: Arc<dyn Fetcher>, reporter: Reporter) -> CrawlReport {
    reporter.emit(Event::Started {
        run: RunKind::Crawl,
        target: job.seed.to_string(),
    });

    let crawler = Crawler::new(fetcher, reporter.clone(), job.max_depth);
    let report = crawler.run(&job.seed).await;

    tracing::info!(
        pages = report.pages_fetched,
        links = report.links.len(),
        subdomains = report.subdomains.len(),
        scripts = report.scripts.len(),
        "crawl finished"
    );

    for (kind, items) in [
        (SummaryKind::Subdomains, &report.subdomains),
        (SummaryKind::Links, &report.links),
        (SummaryKind::Scripts, &report.scripts),
    ] {
        reporter.emit(Event::Summary {
            kind,
            items: items.iter().cloned().collect(),
        });
    }

    reporter.emit(Event::Completed { run: RunKind::Crawl });
    report
}

#[cfg(test)]
mod tests {
    use super::fetch::FetchError;
    use super::*;
    use crate::report;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl Fetcher for Unreachable {
        async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
            Err(FetchError::Timeout)
        }
    }

    #[test]
    fn test_rejects_zero_depth() {
        let result = CrawlJob::new("http://a.test/", 0);
        assert!(matches!(result, Err(ConfigError::InvalidDepth(0))));
    }

    #[test]
    fn test_rejects_bad_seeds() {
        assert!(matches!(
            CrawlJob::new("not a url", 1),
            Err(ConfigError::InvalidSeed { .. })
        ));
        assert!(matches!(
            CrawlJob::new("ftp://a.test/", 1),
            Err(ConfigError::InvalidSeed { .. })
        ));
    }

    #[test]
    fn test_seed_fragment_is_dropped() {
        let job = CrawlJob::new(" http://a.test/index#top ", 2).unwrap();
        assert_eq!(job.seed().as_str(), "http://a.test/index");
    }

    #[tokio::test]
    async fn test_failed_seed_ends_with_empty_summaries_and_completion() {
        let job = CrawlJob::new("http://a.test/index", 1).unwrap();
        let (reporter, mut stream) = report::channel();

        run(job, Arc::new(Unreachable), reporter).await;

        let drained = stream.drain();
        assert!(drained.closed);
        assert_eq!(
            drained.events,
            vec![
                Event::Started {
                    run: RunKind::Crawl,
                    target: "http://a.test/index".into()
                },
                Event::FetchError {
                    url: "http://a.test/index".into(),
                    reason: "request timed out".into()
                },
                Event::Summary { kind: SummaryKind::Subdomains, items: vec![] },
                Event::Summary { kind: SummaryKind::Links, items: vec![] },
                Event::Summary { kind: SummaryKind::Scripts, items: vec![] },
                Event::Completed { run: RunKind::Crawl },
            ]
        );
    }
}
