// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
// Two subcommands, one per discovery technique:
// - enumerate: brute-force subdomains of a domain from a wordlist
// - crawl: walk a site from a seed URL and classify what it links to
//
// Values are only parsed here. Whether they make sense (non-empty domain,
// depth of at least 1, ...) is checked by the engines' constructors so the
// same rules apply however a run is started.
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::crawl::DEFAULT_TIMEOUT;
use crate::enumerate::DEFAULT_WORKER_CAP;

#[derive(Parser, Debug)]
#[command(
    name = "subhound",
    version,
    about = "Discover subdomains by DNS brute force or by crawling a site",
    long_about = "subhound finds names and resources that belong to a target. It can resolve \
                  candidate subdomains from a wordlist with a bounded pool of workers, or crawl \
                  a site and report the subdomains, internal links and scripts it references."
)]
pub struct Cli {
    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve <word>.<domain> for every word in a wordlist
    ///
    /// Example: subhound enumerate example.com --wordlist words.txt
    Enumerate {
        /// Target domain (e.g., example.com)
        domain: String,

        /// File with one candidate subdomain label per line
        #[arg(short, long)]
        wordlist: PathBuf,

        /// Maximum number of concurrent DNS lookups (1 to 30)
        #[arg(long, default_value_t = DEFAULT_WORKER_CAP)]
        workers: usize,

        /// Print one JSON event per line instead of text
        #[arg(long)]
        json: bool,
    },

    /// Crawl a site and report subdomains, links and scripts
    ///
    /// Example: subhound crawl https://example.com --max-depth 2
    Crawl {
        /// Seed URL (e.g., https://example.com)
        url: String,

        /// Deepest level to fetch. Depth 1 = just the seed page
        #[arg(long, default_value_t = 1)]
        max_depth: usize,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
        timeout_secs: u64,

        /// Print one JSON event per line instead of text
        #[arg(long)]
        json: bool,
    },
}
