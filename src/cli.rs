//! Command-line interface module for mediatidy.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading and flag overrides
//! - Running the scan and rendering its report

use crate::config::MediaConfig;
use crate::dedup::ReadErrorPolicy;
use crate::output::OutputFormatter;
use crate::pipeline::{MediaScanner, ScanReport};
use clap::Parser;
use std::path::PathBuf;

/// Find unique photos and videos and read their capture dates from file names.
#[derive(Debug, Clone, Parser)]
#[command(name = "mediatidy", version, about)]
pub struct Cli {
    /// Directory to scan recursively.
    pub root: PathBuf,

    /// Configuration file (defaults to .mediatidyrc.toml, then
    /// ~/.config/mediatidy/config.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Hash files on all CPU cores.
    #[arg(long)]
    pub parallel: bool,

    /// Skip unreadable files instead of stopping.
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Returns the log level filter selected by `-v` flags.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

/// Runs a scan as described by the parsed arguments and prints the report.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use mediatidy::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["mediatidy", "/path/to/photos"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    let report = scan_with_config(cli, !cli.json)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Error serializing report: {}", e))?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Loads configuration, applies flag overrides and scans the root directory.
///
/// # Arguments
///
/// * `cli` - Parsed arguments
/// * `show_progress` - Whether to draw a progress bar while hashing
pub fn scan_with_config(cli: &Cli, show_progress: bool) -> Result<ScanReport, String> {
    let mut config = MediaConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    apply_overrides(&mut config, cli);

    let mut scanner = MediaScanner::from_config(&config)
        .map_err(|e| format!("Error in configuration: {}", e))?;

    let progress = show_progress.then(OutputFormatter::create_progress_bar);
    if let Some(pb) = &progress {
        OutputFormatter::info(&format!("Scanning {}", cli.root.display()));
        scanner = scanner.with_progress(pb.clone());
    }

    let result = scanner.scan(&cli.root);
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    result.map_err(|e| format!("Error scanning {}: {}", cli.root.display(), e))
}

/// Command-line flags only ever switch options on.
fn apply_overrides(config: &mut MediaConfig, cli: &Cli) {
    if cli.parallel {
        config.dedup.parallel = true;
    }
    if cli.skip_unreadable {
        config.dedup.on_read_error = ReadErrorPolicy::Skip;
    }
}

fn print_report(report: &ScanReport) {
    if report.files.is_empty() {
        OutputFormatter::warning(&format!(
            "No pictures or videos found under {}",
            report.root.display()
        ));
        return;
    }

    OutputFormatter::file_list(report);
    OutputFormatter::duplicate_list(report);
    OutputFormatter::summary_table(report);
    println!();
    OutputFormatter::success("Scan complete. No files were modified.");
}
