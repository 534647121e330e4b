//! Console rendering of a sync report

use std::io::{self, Write};
use std::time::Duration;

use colored::Colorize;

use wplsync_core::{InventoryStats, SyncReport};

use crate::error::Result;

fn stats_line(label: &str, stats: &InventoryStats) -> String {
    format!(
        "{}: {} files, {} valid in {} folders.",
        label, stats.processed, stats.valid, stats.folders
    )
}

/// Print the text summary of `report`.
///
/// `verbose` follows [`crate::cli::Cli::verbosity`]; quiet runs print
/// nothing but per-file errors.
pub fn print_summary(report: &SyncReport, verbose: u8) {
    if verbose > 0 {
        println!("{} {}", "=>".blue().bold(), stats_line("Source", &report.source));
        println!("{} {}", "=>".blue().bold(), stats_line("Target", &report.target));

        if verbose >= 2 {
            for (label, stats) in [("source", &report.source), ("target", &report.target)] {
                if !stats.skipped_extensions.is_empty() {
                    println!(
                        "   Skipped extensions in {}: {}",
                        label,
                        stats.skipped_extensions.join(", ").dimmed()
                    );
                }
            }
        }

        println!(
            "{} Synchronized {} files. Created: {}, updated: {}, deleted: {}, unchanged: {}.",
            "OK".green().bold(),
            report.source.valid,
            report.created.len(),
            report.updated.len(),
            report.deleted.len(),
            report.unchanged.len()
        );

        if let Some(purge) = &report.purge {
            if purge.skipped {
                println!(
                    "{} Folder purge skipped: the target holds no media files.",
                    "WARN".yellow().bold()
                );
            } else {
                println!(
                    "   Purged {} files, removed {} folders.",
                    purge.purged_files.len(),
                    purge.removed_folders.len()
                );
            }
        }
    }

    let purge_errors = report.purge.iter().flat_map(|purge| &purge.errors);
    for error in report.errors.iter().chain(purge_errors) {
        println!("   {} {}: {}", "!".red(), error.path.display(), error.message);
    }
}

/// Print elapsed time and, after a dry run, how to apply the changes.
pub fn print_footer(elapsed: Duration, dry_run: bool, verbose: u8) {
    if verbose == 0 {
        return;
    }
    println!("Elapsed: {:.2} seconds.", elapsed.as_secs_f64());
    if dry_run {
        println!(
            "{} Nothing was changed. Run again with {} to apply.",
            "DRY RUN".yellow().bold(),
            "-x".cyan()
        );
    }
}

/// Print `report` as pretty JSON on stdout.
pub fn print_json(report: &SyncReport) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)?;
    Ok(())
}
