//! Orchestration of a single organization run.
//!
//! The [`Organizer`] ties the other modules together: walk the source
//! tree, classify every file, show the category tally, ask the caller's
//! confirmation gate whether to proceed, then process files one at a
//! time, planning only (dry run) or planning plus relocating (commit),
//! while accumulating action records for the report sink.
//!
//! The same planning code runs in both modes, against the same claimed
//! set, so a dry run previews exactly the destination paths a committed
//! run would produce for an unchanged input tree.

use crate::config::{CompiledFilters, OrganizeConfig};
use crate::file_category::{CategoryTable, extension_of};
use crate::file_organizer::{FileOrganizer, OrganizeError, OrganizeResult};
use crate::output::OutputFormatter;
use crate::planner::DestinationPlanner;
use crate::report::{ActionRecord, write_report};
use crate::walker::walk_files;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

/// One classified source file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Category label from the table.
    pub category: String,
    /// Second-level label (year or bare extension).
    pub subfolder: String,
}

/// Per-category file counts gathered before confirmation.
#[derive(Debug, Clone, Default)]
pub struct RunTally {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl RunTally {
    fn add(&mut self, category: &str) {
        *self.counts.entry(category.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    /// Categories with their counts, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Count for one category (zero if absent).
    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// Total number of files found.
    pub fn total(&self) -> usize {
        self.total
    }
}

/// What one run did (or, for a dry run, would have done).
#[derive(Debug)]
pub struct RunSummary {
    /// One record per successfully planned/performed file.
    pub records: Vec<ActionRecord>,
    /// The tally shown at the confirmation gate.
    pub tally: RunTally,
    /// Files that failed to plan or relocate.
    pub failed: usize,
    /// False when the gate declined; no records exist in that case.
    pub confirmed: bool,
}

/// Runs the walk/classify/plan/relocate pipeline for one configuration.
///
/// All settings arrive through [`OrganizeConfig`] at construction; the
/// organizer holds no global state and can be run from tests with a
/// programmatic confirmation gate.
pub struct Organizer {
    config: OrganizeConfig,
    table: CategoryTable,
    filters: CompiledFilters,
}

impl Organizer {
    /// Creates an organizer from explicit configuration.
    pub fn new(config: OrganizeConfig, table: CategoryTable, filters: CompiledFilters) -> Self {
        Self {
            config,
            table,
            filters,
        }
    }

    /// Executes one run.
    ///
    /// The gate receives the category tally and decides whether the run
    /// proceeds; when it declines, the run performs zero relocations and
    /// returns zero records. Per-file failures are reported as warnings
    /// and counted, never aborting the run.
    ///
    /// # Errors
    ///
    /// Fails fast when the source root does not exist or is not a
    /// directory. After that point only per-file errors occur, and those
    /// are absorbed into the summary.
    pub fn run<F>(&self, gate: F) -> OrganizeResult<RunSummary>
    where
        F: FnOnce(&RunTally) -> bool,
    {
        self.check_source_root()?;

        if self.config.dry_run {
            OutputFormatter::dry_run_notice(&format!(
                "Analyzing {} (no files will be touched)",
                self.config.source_root.display()
            ));
        } else {
            OutputFormatter::info(&format!(
                "Organizing {} into {}",
                self.config.source_root.display(),
                self.config.dest_root.display()
            ));
        }

        let files = walk_files(&self.config.source_root, &self.config.dest_root);
        let (records, tally) = self.classify_all(files);

        OutputFormatter::tally_table(&tally);

        if !gate(&tally) {
            OutputFormatter::plain("Operation canceled.");
            return Ok(RunSummary {
                records: Vec::new(),
                tally,
                failed: 0,
                confirmed: false,
            });
        }

        let (out, failed) = self.process(&records);

        if let Some(report_path) = &self.config.report_path {
            match write_report(report_path, &out) {
                Ok(()) => {
                    OutputFormatter::success(&format!("Report saved to {}", report_path.display()));
                }
                Err(e) => OutputFormatter::error(&e.to_string()),
            }
        }

        Ok(RunSummary {
            records: out,
            tally,
            failed,
            confirmed: true,
        })
    }

    /// Classifies every walked file and builds the tally.
    fn classify_all(&self, files: Vec<PathBuf>) -> (Vec<FileRecord>, RunTally) {
        let mut tally = RunTally::default();
        let mut records = Vec::new();

        for path in files {
            if !self.filters.should_include(&path) {
                continue;
            }
            let ext = extension_of(&path);
            let category = self.table.classify(&ext).to_string();
            let subfolder = self.table.subfolder(&category, &path);
            tally.add(&category);
            records.push(FileRecord {
                path,
                category,
                subfolder,
            });
        }

        (records, tally)
    }

    /// Plans (and, outside dry-run, performs) every classified file.
    ///
    /// Category and subfolder are derived again here: the modification
    /// time is re-read at processing time, so a file whose mtime changed
    /// since classification lands in the bucket current at execution.
    fn process(&self, records: &[FileRecord]) -> (Vec<ActionRecord>, usize) {
        let mut planner = DestinationPlanner::new();
        let mut out = Vec::new();
        let mut failed = 0usize;

        let pb = OutputFormatter::progress_bar(records.len() as u64);
        for record in records {
            let ext = extension_of(&record.path);
            let category = self.table.classify(&ext);
            let subfolder = self.table.subfolder(category, &record.path);

            let planned = planner.plan(
                &record.path,
                &self.config.dest_root,
                category,
                &subfolder,
                self.config.kind,
            );

            match planned {
                Ok(action) if self.config.dry_run => {
                    out.push(ActionRecord::planned(&action));
                }
                Ok(action) => match FileOrganizer::relocate(&action) {
                    Ok(final_path) => out.push(ActionRecord::realized(&action, &final_path)),
                    Err(e) => {
                        pb.suspend(|| OutputFormatter::warning(&e.to_string()));
                        failed += 1;
                    }
                },
                Err(e) => {
                    pb.suspend(|| OutputFormatter::warning(&e.to_string()));
                    failed += 1;
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        (out, failed)
    }

    fn check_source_root(&self) -> OrganizeResult<()> {
        let root = &self.config.source_root;
        let meta = std::fs::metadata(root).map_err(|e| OrganizeError::InvalidSourceRoot {
            path: root.clone(),
            source: e,
        })?;
        if !meta.is_dir() {
            return Err(OrganizeError::InvalidSourceRoot {
                path: root.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            });
        }
        Ok(())
    }
}
