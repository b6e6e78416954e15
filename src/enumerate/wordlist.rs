// src/enumerate/wordlist.rs
// =============================================================================
// Loads candidate names from a wordlist file.
//
// One name per line. Surrounding whitespace is trimmed and blank lines are
// skipped. A file that can't be read, or that has no names in it, is a
// configuration error: the run stops before any worker is spawned.
// =============================================================================

use std::path::Path;

use crate::error::ConfigError;

pub fn load(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::WordlistUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let names = parse(&content);
    if names.is_empty() {
        return Err(ConfigError::EmptyWordlist(path.to_path_buf()));
    }

    tracing::debug!(path = %path.display(), count = names.len(), "loaded wordlist");
    Ok(names)
}

fn parse(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
