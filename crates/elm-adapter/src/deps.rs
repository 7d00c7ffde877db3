//! Source-set discovery for cache invalidation.
//!
//! A designated entry point depends on every module the compiler might pull
//! in, and the adapter cannot know the import graph without parsing Elm. It
//! therefore reports the whole source set: every file of the source extension
//! under every configured source directory. The host pipeline watches these
//! and recompiles the entry point when any of them changes.

use std::path::PathBuf;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{AdapterError, AdapterResult};

/// Collect every `*.{extension}` file under the configured directories.
///
/// Directories that do not exist are skipped. Unreadable entries inside an
/// existing directory are tolerated, matching what a watcher would see. The
/// result is sorted for determinism.
pub(crate) fn source_files(
    source_directories: &[PathBuf],
    extension: &str,
) -> AdapterResult<Vec<PathBuf>> {
    let pattern = format!("**/*.{extension}");
    let matcher = globset::GlobBuilder::new(&pattern)
        .literal_separator(false)
        .build()
        .map_err(|e| AdapterError::DependencyScan(format!("invalid pattern {pattern}: {e}")))?
        .compile_matcher();

    let mut files = Vec::new();
    for dir in source_directories {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "source directory missing, skipping");
            continue;
        }
        for entry in WalkDir::new(dir).follow_links(false) {
            let Ok(entry) = entry else { continue };
            if !entry.file_type().is_file() {
                continue;
            }
            if matcher.is_match(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    Ok(files)
}
