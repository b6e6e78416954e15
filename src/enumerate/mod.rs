// src/enumerate/mod.rs
// =============================================================================
// Subdomain enumeration by brute-force DNS resolution.
//
// Submodules:
// - wordlist: loads candidate names from a file
// - resolver: the DNS primitive (trait + OS-backed implementation)
// - pool: the bounded worker pool that drives the lookups
//
// `run` wraps the pool with the run-level protocol: a start event, the pool
// itself, then the completion marker once every worker has exited.
// =============================================================================

mod pool;
mod resolver;
pub mod wordlist;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

pub use pool::{PoolSummary, DEFAULT_WORKER_CAP};

use pool::ResolverPool;
pub use resolver::{Resolve, ResolveError, SystemResolver};

use crate::error::ConfigError;
use crate::report::{Event, Reporter, RunKind};

/// A validated enumeration request.
#[derive(Debug, Clone)]
pub struct Enumeration {
    domain: String,
    candidates: Vec<String>,
    workers: usize,
}

impl Enumeration {
    pub fn new(domain: &str, candidates: Vec<String>, workers: usize) -> Result<Self, ConfigError> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        if workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if workers > DEFAULT_WORKER_CAP {
            return Err(ConfigError::TooManyWorkers {
                requested: workers,
                max: DEFAULT_WORKER_CAP,
            });
        }

        Ok(Self {
            domain: domain.to_string(),
            candidates,
            workers,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

/// Runs one enumeration from start marker to completion marker.
pub async fn run(
    job: Enumeration,
    resolver: Arc<dyn Resolve>,
    reporter: Reporter,
    cancel: CancellationToken,
) -> PoolSummary {
    reporter.emit(Event::Started {
        run: RunKind::Enumeration,
        target: job.domain.clone(),
    });

    let summary = ResolverPool::new(resolver, reporter.clone())
        .with_worker_cap(job.workers)
        .with_cancellation(cancel)
        .run(&job.domain, job.candidates)
        .await;

    reporter.emit(Event::Completed {
        run: RunKind::Enumeration,
    });
    summary
}
