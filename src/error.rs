// src/error.rs
// =============================================================================
// Configuration errors.
//
// These are the only errors that stop a run. They are detected before any
// worker or crawl step starts, so a run either fails here or goes all the
// way to its completion marker.
//
// Per-item failures (a name that doesn't resolve, a page that can't be
// fetched) have their own types next to the code that produces them and
// never bubble up to this level.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target domain must not be empty")]
    EmptyDomain,

    #[error("failed to read wordlist {}: {source}", .path.display())]
    WordlistUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("wordlist {} contains no candidate names", .0.display())]
    EmptyWordlist(PathBuf),

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("worker count {requested} exceeds the limit of {max}")]
    TooManyWorkers { requested: usize, max: usize },

    #[error("max depth must be at least 1 (got {0})")]
    InvalidDepth(usize),

    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = ConfigError::InvalidDepth(0);
        assert_eq!(err.to_string(), "max depth must be at least 1 (got 0)");

        let err = ConfigError::InvalidSeed {
            url: "ftp://x".to_string(),
            reason: "scheme must be http or https".to_string(),
        };
        assert!(err.to_string().contains("ftp://x"));
    }

    #[test]
    fn test_wordlist_error_keeps_io_source() {
        use std::error::Error as _;

        let err = ConfigError::WordlistUnreadable {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("failed to read wordlist missing.txt"));
    }
}
