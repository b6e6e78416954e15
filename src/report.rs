// src/report.rs
// =============================================================================
// The result reporter: the one place both engines write findings to.
//
// Shape:
// - Event: a tagged type for every kind of line a run can produce
// - Reporter: the producer side. Cheap to clone, one clone per worker
// - ReportStream: the single consumer side, drained on a fixed cadence
//
// The engines never print anything themselves. They emit events and the
// consumer (main.rs) decides whether to render them as text or as JSON.
//
// Ordering: events from one producer arrive in the order they were emitted.
// Events from different producers interleave in whatever order they land.
// =============================================================================

use std::fmt;
use std::net::IpAddr;

use serde::Serialize;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// Which engine a run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    Enumeration,
    Crawl,
}

/// Which cumulative set a crawl summary lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Subdomains,
    Links,
    Scripts,
}

/// One unit of output from a run.
///
/// Serialized as `{"event": "found-host", ...}` for `--json` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Event {
    Started { run: RunKind, target: String },
    FoundHost { host: String, ip: IpAddr },
    FoundSubdomain { url: String },
    FoundLink { url: String, depth: usize },
    FoundScript { url: String },
    FetchError { url: String, reason: String },
    /// Header line followed by one line per item.
    Summary { kind: SummaryKind, items: Vec<String> },
    /// Terminal event. Nothing else is emitted for the run after this.
    Completed { run: RunKind },
}

impl Event {
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::Completed { .. })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Started { run: RunKind::Enumeration, target } => {
                write!(f, "Starting subdomain enumeration on {}...", target)
            }
            Event::Started { run: RunKind::Crawl, target } => {
                write!(f, "Starting crawl of {}...", target)
            }
            Event::FoundHost { host, ip } => write!(f, "[+] Found: {} ({})", host, ip),
            Event::FoundSubdomain { url } => write!(f, "[+] Subdomain: {}", url),
            Event::FoundLink { url, depth } => write!(f, "[>] Link (depth {}): {}", depth, url),
            Event::FoundScript { url } => write!(f, "[js] Script: {}", url),
            Event::FetchError { url, reason } => write!(f, "[-] Error fetching {}: {}", url, reason),
            Event::Summary { kind, items } => {
                let title = match kind {
                    SummaryKind::Subdomains => "Subdomains found",
                    SummaryKind::Links => "Links found",
                    SummaryKind::Scripts => "JavaScript files found",
                };
                write!(f, "\n=== {} ({}) ===", title, items.len())?;
                for item in items {
                    write!(f, "\n{}", item)?;
                }
                Ok(())
            }
            Event::Completed { run: RunKind::Enumeration } => write!(f, "\nEnumeration completed."),
            Event::Completed { run: RunKind::Crawl } => write!(f, "\nCrawl completed."),
        }
    }
}

/// Creates a fresh reporter/stream pair for one run.
pub fn channel() -> (Reporter, ReportStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Reporter { tx }, ReportStream { rx })
}

/// Producer handle. Safe to clone into as many workers as needed.
#[derive(Debug, Clone)]
pub struct Reporter {
    tx: UnboundedSender<Event>,
}

impl Reporter {
    /// Pushes an event without blocking.
    ///
    /// If the consumer has already gone away the event is dropped; a run
    /// never fails because nobody is listening.
    pub fn emit(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::trace!("result consumer closed, dropping event");
        }
    }
}

/// Everything that was buffered at the time of a drain.
#[derive(Debug, Default)]
pub struct Drained {
    pub events: Vec<Event>,
    /// True when every `Reporter` has been dropped and the buffer is empty.
    pub closed: bool,
}

/// Consumer handle. There is exactly one per run.
#[derive(Debug)]
pub struct ReportStream {
    rx: UnboundedReceiver<Event>,
}

impl ReportStream {
    /// Takes everything currently buffered without waiting for more.
    pub fn drain(&mut self) -> Drained {
        let mut drained = Drained::default();
        loop {
            match self.rx.try_recv() {
                Ok(event) => drained.events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    drained.closed = true;
                    break;
                }
            }
        }
        drained
    }
}
