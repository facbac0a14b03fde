//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! output, the digest progress bar and the scan summary table.

use crate::media_category::MediaKind;
use crate::pipeline::ScanReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mediatidy::output::OutputFormatter;
    /// OutputFormatter::success("Scan complete");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for digesting files.
    ///
    /// The length is filled in once the number of files to digest is known.
    pub fn create_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb.set_message("hashing");
        pb
    }

    /// Prints one line per unique file: kind, date and path.
    pub fn file_list(report: &ScanReport) {
        Self::header("FILES");
        for file in &report.files {
            let date = match file.date {
                Some(date) => date.to_string().green(),
                None => "no date".dimmed(),
            };
            println!(
                "  {:<7} {:<10} {}",
                file.kind.label(),
                date,
                file.path.display()
            );
        }
    }

    /// Prints each duplicate next to the file it duplicates.
    pub fn duplicate_list(report: &ScanReport) {
        if report.duplicates.is_empty() {
            return;
        }

        Self::header("DUPLICATES");
        for duplicate in &report.duplicates {
            println!(
                "  {} {} {}",
                duplicate.path.display().to_string().yellow(),
                "=".dimmed(),
                duplicate.original.display()
            );
        }
    }

    /// Prints a summary table with counts from a scan.
    pub fn summary_table(report: &ScanReport) {
        Self::header("SUMMARY");

        let rows = [
            ("Pictures", report.count_kind(MediaKind::Picture)),
            ("Videos", report.count_kind(MediaKind::Video)),
            ("Dated", report.dated()),
            ("Undated", report.undated()),
            ("Duplicates", report.duplicates.len()),
            ("Ignored", report.ignored),
        ];

        let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

        println!("{:<width$} | {}", "Category".bold(), "Files".bold(), width = width);
        println!("{}", "-".repeat(width + 10));
        for (name, count) in &rows {
            println!(
                "{:<width$} | {} {}",
                name,
                count.to_string().green(),
                if *count == 1 { "file" } else { "files" },
                width = width
            );
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Unique".bold(),
            report.files.len().to_string().green().bold(),
            if report.files.len() == 1 { "file" } else { "files" },
            width = width
        );
    }
}
