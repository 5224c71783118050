//! CSV reporting of planned and performed actions.
//!
//! The core produces a sequence of [`ActionRecord`]s; this module is the
//! thin adapter that serializes them. The on-disk contract is a header
//! row `source,destination,action` followed by one row per file, with the
//! action spelled as the literal `MOVE` or `COPY`.

use crate::file_organizer::{OrganizeError, OrganizeResult};
use crate::planner::PlannedAction;
use serde::Serialize;
use std::path::Path;

/// The realized outcome of one processed file.
///
/// For a dry run the destination is the planned path, since nothing was
/// executed; for a committed run it is the path the relocation engine
/// actually wrote to.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRecord {
    pub source: String,
    pub destination: String,
    pub action: String,
}

impl ActionRecord {
    /// Record for an executed action with its realized destination.
    pub fn realized(action: &PlannedAction, final_destination: &Path) -> Self {
        Self {
            source: action.source.to_string_lossy().to_string(),
            destination: final_destination.to_string_lossy().to_string(),
            action: action.kind.report_tag().to_string(),
        }
    }

    /// Record for a simulated action; the planned path stands in for the
    /// realized one.
    pub fn planned(action: &PlannedAction) -> Self {
        Self::realized(action, &action.destination)
    }
}

/// Writes all records to `path` as CSV, header row included.
pub fn write_report(path: &Path, records: &[ActionRecord]) -> OrganizeResult<()> {
    let failed = |e: csv::Error| OrganizeError::ReportWriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    // Write the header ourselves so it appears even for an empty run;
    // auto-headers only materialize once a first record is serialized.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(failed)?;
    writer
        .write_record(["source", "destination", "action"])
        .map_err(failed)?;
    for record in records {
        writer.serialize(record).map_err(failed)?;
    }
    writer
        .flush()
        .map_err(|e| OrganizeError::ReportWriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}
