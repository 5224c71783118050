use clap::Parser;
use maestro::cli::{Organizer, RunTally};
use maestro::config::{OrganizeConfig, SettingsFile};
use maestro::output::OutputFormatter;
use maestro::planner::ActionKind;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Organize a directory tree into category- and year-based folders.
#[derive(Debug, Parser)]
#[command(name = "maestro", version, about)]
struct Cli {
    /// Root source directory to scan.
    #[arg(short = 'o', long)]
    source: PathBuf,

    /// Destination directory for organized files.
    #[arg(short = 'd', long)]
    destination: PathBuf,

    /// Copy files instead of moving them.
    #[arg(short = 'c', long)]
    copy: bool,

    /// Simulate the run without moving or copying anything.
    #[arg(long)]
    dry_run: bool,

    /// Write a CSV report of every action to this file.
    #[arg(short = 'r', long)]
    report: Option<PathBuf>,

    /// TOML settings file (category table and filters).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Proceed without asking for confirmation.
    #[arg(short = 'y', long)]
    yes: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match SettingsFile::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };
    let filters = match settings.compile_filters() {
        Ok(filters) => filters,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let kind = if cli.copy {
        ActionKind::Copy
    } else {
        ActionKind::Move
    };
    let config = match OrganizeConfig::new(
        &cli.source,
        &cli.destination,
        kind,
        cli.dry_run,
        cli.report.as_deref(),
    ) {
        Ok(config) => config,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let organizer = Organizer::new(config, settings.category_table(), filters);
    let skip_prompt = cli.yes;

    let started = Instant::now();
    match organizer.run(|tally| skip_prompt || confirm(tally)) {
        Ok(summary) if !summary.confirmed => ExitCode::SUCCESS,
        Ok(summary) => {
            OutputFormatter::success(&format!(
                "Organization complete: {} file(s) in {:.2}s",
                summary.records.len(),
                started.elapsed().as_secs_f64()
            ));
            if summary.failed > 0 {
                OutputFormatter::warning(&format!(
                    "{} file(s) could not be processed; see messages above.",
                    summary.failed
                ));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Interactive confirmation gate shown between the tally and the run.
fn confirm(_tally: &RunTally) -> bool {
    print!("Do you want to continue? (y/n): ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim().eq_ignore_ascii_case("y")
}
