//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! progress tracking, and the report renderings for organize and restore runs.

use crate::error::OrganizeError;
use crate::file_organizer::OrganizeReport;
use crate::restore::{RestoreOutcome, RestoreSummary};
use colored::*;
use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for hashing
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyup::output::OutputFormatter;
    /// OutputFormatter::success("Folder organized!");
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

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for hashing `total` files.
    ///
    /// Returns a hidden bar when `quiet` is set; indicatif also hides it when
    /// stderr is not a terminal.
    pub fn create_progress_bar(total: u64, quiet: bool) -> ProgressBar {
        if quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Prints a summary table with move counts by category.
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = max_category_len
        );
    }

    /// Renders an organize report: moves, duplicates, errors, then the table.
    pub fn organize_report(root: &Path, report: &OrganizeReport, quiet: bool) {
        let dry_run = report.dry_run;

        if !quiet {
            for entry in &report.moves {
                let line = format!(
                    "📁 {} → {}",
                    display_relative(root, &entry.from),
                    display_relative(root, &entry.to)
                );
                if dry_run {
                    Self::dry_run_notice(&line);
                } else {
                    Self::plain(&line);
                }
            }
            for duplicate in &report.duplicates {
                let line = format!(
                    "🗑 duplicate {} (same as {})",
                    display_relative(root, &duplicate.path),
                    display_relative(root, &duplicate.original)
                );
                if dry_run {
                    Self::dry_run_notice(&line);
                } else {
                    Self::plain(&line);
                }
            }
        }

        Self::error_list(&report.errors);

        if report.moves.is_empty() && report.duplicates.is_empty() {
            Self::info("Nothing to organize.");
        } else {
            Self::summary_table(&report.category_counts(), report.moves.len());
            let removed = report.duplicates.len();
            let freed = HumanBytes(report.freed_bytes());
            if dry_run {
                Self::dry_run_notice(&format!(
                    "{} duplicate {} would be deleted ({} freed). No files were modified.",
                    removed,
                    plural(removed),
                    freed
                ));
            } else {
                Self::plain(&format!("Duplicates removed: {} ({} freed)", removed, freed));
            }
        }

        if let Some(log_path) = &report.log_path {
            Self::success(&format!(
                "Move log saved to {}. Run with --restore to undo.",
                log_path.display()
            ));
        }

        if !report.success() {
            Self::warning(&format!(
                "{} {} skipped due to errors",
                report.errors.len(),
                plural(report.errors.len())
            ));
        }
    }

    /// Renders a restore summary.
    pub fn restore_summary(root: &Path, summary: &RestoreSummary, quiet: bool) {
        if !quiet {
            for (entry, outcome) in &summary.outcomes {
                match outcome {
                    RestoreOutcome::Restored(path) => {
                        Self::plain(&format!("↩ restored → {}", display_relative(root, path)))
                    }
                    RestoreOutcome::SkippedMissingSource => Self::warning(&format!(
                        "Not found, skipped: {}",
                        display_relative(root, &entry.to)
                    )),
                    RestoreOutcome::Failed(_) => {}
                }
            }
        }

        let errors: Vec<&OrganizeError> = summary.errors().collect();
        for error in errors {
            Self::error(&error.to_string());
        }

        let line = format!(
            "Restore complete. Restored: {}, Skipped: {}, Failed: {}",
            summary.restored, summary.skipped, summary.failed
        );
        if summary.success() {
            Self::success(&line);
        } else {
            Self::warning(&line);
        }
    }

    /// Prints every per-file error with its path.
    pub fn error_list(errors: &[OrganizeError]) {
        if errors.is_empty() {
            return;
        }
        Self::header("ERRORS");
        for error in errors {
            Self::error(&error.to_string());
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// Shows `path` relative to `root` when it lives underneath it.
fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_relative() {
        let root = Path::new("/data");
        assert_eq!(
            display_relative(root, Path::new("/data/Images/c.jpg")),
            Path::new("Images/c.jpg").display().to_string()
        );
        assert_eq!(display_relative(root, Path::new("/elsewhere/x")), "/elsewhere/x");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1), "file");
        assert_eq!(plural(0), "files");
        assert_eq!(plural(2), "files");
    }

    #[test]
    fn test_quiet_progress_bar_is_hidden() {
        assert!(OutputFormatter::create_progress_bar(10, true).is_hidden());
    }
}
