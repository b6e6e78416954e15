// src/enumerate/pool.rs
// =============================================================================
// The resolver pool: brute-force `<name>.<domain>` with a bounded number of
// concurrent workers.
//
// How it works:
// 1. Every candidate goes into one shared queue before any worker starts
// 2. min(cap, candidates) workers are spawned
// 3. Each worker takes one name at a time without waiting; an empty queue
//    means there is nothing left, so the worker exits
// 4. A name that resolves is reported straight away; one that doesn't is
//    dropped without a trace in the results
// 5. The pool is done when every worker has been joined
//
// Each name is taken by exactly one worker, exactly once. There are no
// retries: a failed lookup is final for that name.
//
// Cancellation is checked between names. A lookup that is already in flight
// is allowed to finish first.
// =============================================================================

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::resolver::Resolve;
use crate::report::{Event, Reporter};

/// Upper bound on concurrent DNS lookups.
pub const DEFAULT_WORKER_CAP: usize = 30;

/// Number of workers spawned for a given input size.
pub fn worker_count(cap: usize, candidates: usize) -> usize {
    cap.min(candidates)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSummary {
    pub workers: usize,
    pub attempted: usize,
    pub found: usize,
}

#[derive(Debug, Default)]
struct WorkerStats {
    attempted: usize,
    found: usize,
}

type WorkQueue = Arc<Mutex<VecDeque<String>>>;

pub struct ResolverPool {
    resolver: Arc<dyn Resolve>,
    reporter: Reporter,
    cap: usize,
    cancel: CancellationToken,
}

impl ResolverPool {
    pub fn new(resolver: Arc<dyn Resolve>, reporter: Reporter) -> Self {
        Self {
            resolver,
            reporter,
            cap: DEFAULT_WORKER_CAP,
            cancel: CancellationToken::new(),
        }
    }

    /// Lowers the worker cap. It never goes above `DEFAULT_WORKER_CAP`.
    pub fn with_worker_cap(mut self, cap: usize) -> Self {
        self.cap = cap.min(DEFAULT_WORKER_CAP);
        self
    }

    /// Workers stop taking new names once this token is cancelled.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Resolves every candidate against `domain` and waits for all workers
    /// to finish. Hits are streamed to the reporter as they happen.
    pub async fn run(&self, domain: &str, candidates: Vec<String>) -> PoolSummary {
        // Never more workers than names: nobody sits idle on a short list
        let workers = worker_count(self.cap, candidates.len());

        // Fill the queue before anyone starts; it only ever shrinks after this
        let queue: WorkQueue = Arc::new(Mutex::new(candidates.into()));
        let domain: Arc<str> = Arc::from(domain);

        tracing::debug!(%domain, workers, "starting resolver pool");

        // Each worker gets its own handle on the shared pieces
        let mut set = JoinSet::new();
        for id in 0..workers {
            set.spawn(worker(
                id,
                Arc::clone(&queue),
                Arc::clone(&domain),
                Arc::clone(&self.resolver),
                self.reporter.clone(),
                self.cancel.clone(),
            ));
        }

        let mut summary = PoolSummary {
            workers,
            ..PoolSummary::default()
        };

        // Done means every worker has been joined, in whatever order they finish
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(stats) => {
                    summary.attempted += stats.attempted;
                    summary.found += stats.found;
                }
                Err(e) => tracing::warn!(error = %e, "resolver worker ended abnormally"),
            }
        }

        tracing::debug!(
            attempted = summary.attempted,
            found = summary.found,
            "resolver pool finished"
        );
        summary
    }
}

async fn worker(
    id: usize,
    queue: WorkQueue,
    domain: Arc<str>,
    resolver: Arc<dyn Resolve>,
    reporter: Reporter,
    cancel: CancellationToken,
) -> WorkerStats {
    let mut stats = WorkerStats::default();

    while !cancel.is_cancelled() {
        let Some(name) = take(&queue) else {
            break;
        };

        let fqdn = format!("{}.{}", name, domain);
        stats.attempted += 1; // Counted even when the lookup fails

        match resolver.resolve(&fqdn).await {
            Ok(ip) => {
                stats.found += 1;
                reporter.emit(Event::FoundHost { host: fqdn, ip });
            }
            Err(e) => tracing::trace!(worker = id, %fqdn, error = %e, "no resolution"),
        }
    }

    tracing::trace!(worker = id, attempted = stats.attempted, "worker exiting");
    stats
}

// Non-blocking take. The lock is only held for the pop itself.
fn take(queue: &Mutex<VecDeque<String>>) -> Option<String> {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
}
