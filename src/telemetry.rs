// src/telemetry.rs
// =============================================================================
// Diagnostics go to stderr through tracing. Results never do: stdout is kept
// for result lines (or JSON events) so it can be piped.
//
// RUST_LOG overrides the default filter.
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default = if verbose {
        "warn,subhound=debug"
    } else {
        "warn,subhound=info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (e.g. from a test harness) is not an error worth failing on.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
