// src/main.rs
// =============================================================================
// Entry point of the subhound CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate the run (wordlist, domain, depth, seed URL). A bad value stops
//    everything here, before a single lookup or fetch is made
// 3. Spawn the run on its own task, writing into a result channel
// 4. Drain the channel every 100ms and print what arrived, until the
//    completion marker shows up
// 5. Exit with a proper code (0 = run completed, 2 = error, 130 = interrupted)
// =============================================================================

mod cli;
mod crawl;
mod enumerate;
mod error;
mod report;
mod telemetry;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use cli::{Cli, Commands};
use crawl::{CrawlJob, ReqwestFetcher};
use enumerate::{Enumeration, Resolve, SystemResolver};
use report::{Event, ReportStream};

/// How often buffered results are pulled off the channel and printed.
const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match cli.command {
        Commands::Enumerate {
            domain,
            wordlist,
            workers,
            json,
        } => handle_enumerate(&domain, &wordlist, workers, json).await,
        Commands::Crawl {
            url,
            max_depth,
            timeout_secs,
            json,
        } => handle_crawl(&url, max_depth, timeout_secs, json).await,
    }
}

async fn handle_enumerate(domain: &str, wordlist: &Path, workers: usize, json: bool) -> Result<i32> {
    let candidates = enumerate::wordlist::load(wordlist)?;
    let job = Enumeration::new(domain, candidates, workers)?;
    tracing::debug!(domain = job.domain(), workers, "enumeration validated");

    let cancel = CancellationToken::new();
    let (reporter, stream) = report::channel();
    let resolver: Arc<dyn Resolve> = Arc::new(SystemResolver);

    let task = tokio::spawn(enumerate::run(job, resolver, reporter, cancel.clone()));

    // Ctrl-C stops workers from taking new names; lookups in flight finish.
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, letting in-flight lookups finish");
            interrupt.cancel();
        }
    });

    consume(stream, json, &mut std::io::stdout()).await?;
    let summary = task.await.context("enumeration task failed")?;

    tracing::info!(
        workers = summary.workers,
        attempted = summary.attempted,
        found = summary.found,
        "enumeration finished"
    );

    if cancel.is_cancelled() {
        Ok(EXIT_INTERRUPTED)
    } else {
        Ok(0)
    }
}

async fn handle_crawl(url: &str, max_depth: usize, timeout_secs: u64, json: bool) -> Result<i32> {
    let job = CrawlJob::new(url, max_depth)?;
    tracing::debug!(seed = %job.seed(), max_depth, "crawl validated");

    let fetcher = ReqwestFetcher::new(Duration::from_secs(timeout_secs))
        .context("failed to build HTTP client")?;
    let (reporter, stream) = report::channel();

    let task = tokio::spawn(crawl::run(job, Arc::new(fetcher), reporter));

    consume(stream, json, &mut std::io::stdout()).await?;
    let report = task.await.context("crawl task failed")?;
    tracing::debug!(pages = report.pages_fetched, "crawl task joined");

    Ok(0)
}

// Prints results as they arrive.
//
// Parameters:
//   stream: the consumer side of the run's result channel
//   json: one JSON event per line instead of text
//   out: where lines go (stdout in practice)
//
// Returns: true once the completion marker has been written, false if every
// producer went away without sending one.
async fn consume<W: Write>(mut stream: ReportStream, json: bool, out: &mut W) -> Result<bool> {
    let mut ticker = tokio::time::interval(DRAIN_INTERVAL);

    loop {
        // First tick fires immediately, then every DRAIN_INTERVAL
        ticker.tick().await;

        let drained = stream.drain();
        if print_events(out, &drained.events, json)? {
            return Ok(true);
        }
        if drained.closed {
            tracing::warn!("result channel closed before the run completed");
            return Ok(false);
        }
    }
}

// Writes events up to and including the completion marker.
// Returns true if the completion marker was among them.
fn print_events<W: Write>(out: &mut W, events: &[Event], json: bool) -> Result<bool> {
    let mut finished = false;

    for event in events {
        if json {
            writeln!(out, "{}", serde_json::to_string(event)?)?;
        } else {
            writeln!(out, "{}", event)?;
        }

        if event.is_completion() {
            finished = true;
            break;
        }
    }

    out.flush()?;
    Ok(finished)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{RunKind, SummaryKind};
    use std::time::Instant;

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(out).lines().map(str::to_string).collect()
    }

    #[tokio::test]
    async fn test_consume_stops_at_completion_marker() {
        let (reporter, stream) = report::channel();
        reporter.emit(Event::FoundSubdomain { url: "http://sub.a.test/".into() });
        reporter.emit(Event::Completed { run: RunKind::Crawl });
        // Nothing after the marker belongs to the run.
        reporter.emit(Event::FoundScript { url: "http://a.test/late.js".into() });

        let mut out = Vec::new();
        let completed = consume(stream, false, &mut out).await.unwrap();

        assert!(completed);
        assert_eq!(
            lines(&out),
            vec!["[+] Subdomain: http://sub.a.test/", "", "Crawl completed."]
        );
        drop(reporter);
    }

    #[tokio::test]
    async fn test_consume_waits_for_events_across_drains() {
        let (reporter, stream) = report::channel();

        let producer = tokio::spawn(async move {
            reporter.emit(Event::FoundHost {
                host: "www.example.com".into(),
                ip: "10.0.0.1".parse().unwrap(),
            });
            tokio::time::sleep(Duration::from_millis(250)).await;
            reporter.emit(Event::Completed { run: RunKind::Enumeration });
            // Keep the channel open after the marker.
            tokio::time::sleep(Duration::from_millis(500)).await;
        });

        let started = Instant::now();
        let mut out = Vec::new();
        let completed = consume(stream, false, &mut out).await.unwrap();

        assert!(completed);
        assert!(started.elapsed() >= Duration::from_millis(250));
        assert_eq!(
            lines(&out),
            vec!["[+] Found: www.example.com (10.0.0.1)", "", "Enumeration completed."]
        );
        producer.abort();
    }

    #[tokio::test]
    async fn test_consume_keeps_going_without_completion() {
        let (reporter, stream) = report::channel();
        reporter.emit(Event::FoundSubdomain { url: "http://x.a.test/".into() });

        let mut out = Vec::new();
        let waited = tokio::time::timeout(
            Duration::from_millis(350),
            consume(stream, false, &mut out),
        )
        .await;

        // Still draining: a finding alone never ends the run.
        assert!(waited.is_err());
        assert_eq!(lines(&out), vec!["[+] Subdomain: http://x.a.test/"]);
        drop(reporter);
    }

    #[tokio::test]
    async fn test_consume_returns_when_producers_vanish() {
        let (reporter, stream) = report::channel();
        reporter.emit(Event::FetchError {
            url: "http://a.test/".into(),
            reason: "HTTP 500".into(),
        });
        drop(reporter);

        let mut out = Vec::new();
        let completed = consume(stream, false, &mut out).await.unwrap();

        assert!(!completed);
        assert_eq!(lines(&out), vec!["[-] Error fetching http://a.test/: HTTP 500"]);
    }

    #[test]
    fn test_print_events_as_json_lines() {
        let events = vec![
            Event::Summary { kind: SummaryKind::Links, items: vec!["http://a.test/p".into()] },
            Event::Completed { run: RunKind::Crawl },
        ];

        let mut out = Vec::new();
        let finished = print_events(&mut out, &events, true).unwrap();

        assert!(finished);
        let lines = lines(&out);
        assert_eq!(lines.len(), 2);
        let summary: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(summary["event"], "summary");
        assert_eq!(summary["kind"], "links");
        assert_eq!(summary["items"][0], "http://a.test/p");
        let done: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(done["event"], "completed");
    }
}
