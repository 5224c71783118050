//! Destination planning and collision avoidance.
//!
//! The planner computes where a file should land in the destination tree
//! and guarantees the chosen path is free, both against the real
//! filesystem and against every path already handed out earlier in the
//! same run. It performs no mutation; the relocation engine writes to
//! exactly the path the planner reserved, so the collision check lives in
//! one place only.

use crate::file_category::split_name;
use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Whether a planned action moves the source or copies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Move,
    Copy,
}

impl ActionKind {
    /// Literal tag used in report records.
    pub fn report_tag(&self) -> &'static str {
        match self {
            ActionKind::Move => "MOVE",
            ActionKind::Copy => "COPY",
        }
    }
}

/// One fully-planned relocation: where a file comes from, where it goes,
/// and how. The destination is guaranteed unclaimed at planning time and
/// is never recomputed afterwards.
#[derive(Debug, Clone)]
pub struct PlannedAction {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: ActionKind,
}

/// Computes collision-free destination paths for one run.
///
/// The planner owns the set of destinations already claimed during the
/// current run. Claimed paths count as occupied even before anything is
/// written, which keeps dry-run planning and committed planning on the
/// exact same sequence of names.
#[derive(Debug, Default)]
pub struct DestinationPlanner {
    claimed: HashSet<PathBuf>,
}

impl DestinationPlanner {
    /// Creates a planner with an empty claimed set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans the destination for one source file.
    ///
    /// The candidate is `dest_root/category/subfolder/<file name>`. While
    /// the candidate exists on disk or was claimed earlier in this run,
    /// `_1`, `_2`, ... is appended immediately before the final extension
    /// ("archive.tar.gz" becomes "archive.tar_1.gz"). The scan is
    /// monotonic: given the same starting state it always lands on the
    /// same name, and it terminates because the counter never repeats a
    /// candidate.
    ///
    /// # Errors
    ///
    /// An existence check that fails (e.g. permission denied on a parent
    /// directory) is returned as an error, never treated as "free".
    pub fn plan(
        &mut self,
        source: &Path,
        dest_root: &Path,
        category: &str,
        subfolder: &str,
        kind: ActionKind,
    ) -> OrganizeResult<PlannedAction> {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        // Joining an empty subfolder label is a no-op, so extensionless
        // files land directly under their category directory.
        let target_dir = dest_root.join(category).join(subfolder);

        let (stem, ext) = split_name(&file_name);
        let mut candidate = target_dir.join(&file_name);
        let mut counter: u64 = 1;
        while self.is_taken(&candidate)? {
            candidate = target_dir.join(format!("{stem}_{counter}{ext}"));
            counter += 1;
        }

        self.claimed.insert(candidate.clone());
        Ok(PlannedAction {
            source: source.to_path_buf(),
            destination: candidate,
            kind,
        })
    }

    /// Number of destinations claimed so far in this run.
    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    fn is_taken(&self, path: &Path) -> OrganizeResult<bool> {
        if self.claimed.contains(path) {
            return Ok(true);
        }
        path.try_exists()
            .map_err(|e| OrganizeError::DestinationCheckFailed {
                path: path.to_path_buf(),
                source: e,
            })
    }
}
