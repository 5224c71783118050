//! Output formatting and styling.
//!
//! Centralizes all console output: colored status lines, the pre-run
//! category tally, the per-file progress bar, and the dry-run notice.
//! Nothing here affects the organizer's behavior; it only reports it.

use crate::cli::RunTally;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints the pre-confirmation tally of files found per category.
    pub fn tally_table(tally: &RunTally) {
        Self::header("Files found by category");

        let width = tally
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        for (category, count) in tally.iter() {
            println!(
                "  {:<width$} {}",
                category,
                count.to_string().green(),
                width = width
            );
        }
        println!(
            "  {:<width$} {}",
            "Total".bold(),
            tally.total().to_string().green().bold(),
            width = width
        );
    }

    /// Progress bar over the per-file processing loop.
    pub fn progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}
