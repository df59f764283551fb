//! Discovery of inventory export files by file-name pattern.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, instrument};

use shelfmark_shared::{Result, ShelfmarkError};

/// Convert a glob-like file-name pattern (`*`, `?`) to an anchored regex.
pub fn pattern_to_regex(pattern: &str) -> Result<Regex> {
    let escaped = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");
    Regex::new(&format!("^{escaped}$")).map_err(|e| {
        ShelfmarkError::config(format!("invalid input pattern '{pattern}': {e}"))
    })
}

/// List regular files directly inside `dir` whose name matches `pattern`.
///
/// The result is sorted by path so repeated runs see the same order.
#[instrument(skip_all, fields(dir = %dir.display(), pattern))]
pub fn discover_sources(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = pattern_to_regex(pattern)?;
    let entries = std::fs::read_dir(dir).map_err(|e| ShelfmarkError::io(dir, e))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ShelfmarkError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| matcher.is_match(name));
        if matches {
            found.push(path);
        }
    }

    found.sort();
    debug!(count = found.len(), "discovered inventory files");
    Ok(found)
}
