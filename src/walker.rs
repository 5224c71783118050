//! Source tree enumeration.
//!
//! Walks the source root and yields every regular file, pruning the
//! destination root wherever it appears below the source so a run never
//! descends into the tree it is itself producing. The walk enumerates
//! everything up-front; files created in unvisited branches while the
//! walk is in flight may or may not be seen, which is the accepted
//! behavior of a single-pass batch tool over a live filesystem.

use crate::output::OutputFormatter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerates all files under `source_root`, excluding `dest_root`.
///
/// Unreadable directories are reported as warnings and their subtrees
/// skipped; the rest of the walk continues. Symbolic links are not
/// followed.
pub fn walk_files(source_root: &Path, dest_root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let walker = WalkDir::new(source_root)
        .follow_links(false)
        .into_iter()
        // Keep the walk root itself even when source and destination are
        // the same directory; prune the destination anywhere deeper.
        .filter_entry(|entry| entry.depth() == 0 || entry.path() != dest_root);

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => {
                OutputFormatter::warning(&format!("Skipping unreadable path: {}", e));
            }
        }
    }
    files
}
