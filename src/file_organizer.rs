//! Physical relocation of planned files.
//!
//! This module is the only place where the destination tree is mutated.
//! It creates missing intermediate directories and then moves or copies a
//! file to the exact path the planner reserved. Collision checks belong
//! to the planner alone; nothing here probes the destination before
//! writing.

use crate::planner::{ActionKind, PlannedAction};
use filetime::{FileTime, set_file_times};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while planning against or mutating the filesystem.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source root does not exist or is not a directory.
    InvalidSourceRoot {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to create a destination directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// The move or copy of one file failed.
    RelocationFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// An existence probe during planning failed (e.g. permission denied);
    /// never silently treated as "path is free".
    DestinationCheckFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// The CSV report could not be written.
    ReportWriteFailed {
        path: PathBuf,
        reason: String,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSourceRoot { path, source } => {
                write!(f, "Invalid source root {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::RelocationFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to relocate {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::DestinationCheckFailed { path, source } => {
                write!(
                    f,
                    "Failed to probe destination {}: {}",
                    path.display(),
                    source
                )
            }
            Self::ReportWriteFailed { path, reason } => {
                write!(f, "Failed to write report {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Executes planned relocations against the filesystem.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Carries out one planned action and returns the realized path.
    ///
    /// Creates every missing directory on the destination path first
    /// (idempotent), then either moves the source there (rename, with a
    /// copy-and-delete fallback for cross-device destinations) or copies
    /// it (content plus best-effort timestamps). The destination is taken
    /// from the plan verbatim.
    ///
    /// # Errors
    ///
    /// Any I/O failure is returned attributed to the offending paths;
    /// callers treat it as a per-file failure and continue the run.
    pub fn relocate(action: &PlannedAction) -> OrganizeResult<PathBuf> {
        if let Some(parent) = action.destination.parent() {
            fs::create_dir_all(parent).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let outcome = match action.kind {
            ActionKind::Move => Self::move_file(&action.source, &action.destination),
            ActionKind::Copy => Self::copy_file(&action.source, &action.destination),
        };

        outcome.map_err(|e| OrganizeError::RelocationFailed {
            source: action.source.clone(),
            destination: action.destination.clone(),
            source_error: e,
        })?;

        Ok(action.destination.clone())
    }

    /// Rename, falling back to copy-and-delete when rename fails (the
    /// usual cause is a destination on a different filesystem).
    fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
        match fs::rename(source, destination) {
            Ok(()) => Ok(()),
            Err(_) => {
                Self::copy_file(source, destination)?;
                fs::remove_file(source)
            }
        }
    }

    /// Copy content and, best-effort, the source's access and
    /// modification times. A timestamp failure after a successful copy is
    /// not an error.
    fn copy_file(source: &Path, destination: &Path) -> io::Result<()> {
        if let Err(e) = fs::copy(source, destination) {
            // Don't leave a partial file behind on a failed copy.
            let _ = fs::remove_file(destination);
            return Err(e);
        }
        Self::preserve_times(source, destination);
        Ok(())
    }

    fn preserve_times(source: &Path, destination: &Path) {
        if let Ok(meta) = fs::metadata(source) {
            let accessed = meta.accessed().ok().map(FileTime::from_system_time);
            let modified = meta.modified().ok().map(FileTime::from_system_time);
            if let (Some(accessed), Some(modified)) = (accessed, modified) {
                let _ = set_file_times(destination, accessed, modified);
            }
        }
    }
}
