//! wplsync CLI
//!
//! Mirrors a music library, or the files referenced by WPL playlists, onto
//! a target folder such as a portable player.

mod cli;
mod error;
mod output;

use std::time::Instant;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use wplsync_core::{Interrupt, PatternConfig, SyncEngine, SyncOptions};

use cli::Cli;
use error::Result;

fn main() {
    let started = Instant::now();
    let cli = Cli::parse();
    init_tracing(cli.verbosity());

    let options = build_options(&cli);

    if let Err(e) = run(&cli, options) {
        if e.is_interrupt() {
            eprintln!("{}", "Interrupted!".yellow().bold());
            eprintln!("Elapsed: {:.2} seconds.", started.elapsed().as_secs_f64());
            return;
        }
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }

    if !cli.json {
        output::print_footer(started.elapsed(), !cli.execute, cli.verbosity());
    }
}

/// Map the verbosity level onto a log filter; `RUST_LOG` takes precedence.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Validate the folder and playlist arguments.
///
/// Invalid input is a usage error: clap prints it with the usage line and
/// exits with status 2.
fn build_options(cli: &Cli) -> SyncOptions {
    let options = SyncOptions::new(&cli.source_folder, &cli.target_folder)
        .and_then(|options| options.with_playlists(&cli.playlists));

    match options {
        Ok(mut options) => {
            options.dry_run = !cli.execute;
            options.verbose = cli.verbosity();
            options.delete_orphans = cli.delete_orphans;
            options.copy_playlists = cli.copy_playlists;
            options.allow_externals = cli.allow_externals;
            options
        }
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    }
}

fn run(cli: &Cli, options: SyncOptions) -> Result<()> {
    let patterns = match &cli.patterns {
        Some(path) => PatternConfig::load(path)?,
        None => PatternConfig::default(),
    };

    let interrupt = Interrupt::new();
    let handle = interrupt.clone();
    if let Err(e) = ctrlc::set_handler(move || handle.trigger()) {
        tracing::warn!("Cannot install Ctrl-C handler: {}", e);
    }

    let verbose = options.verbose;
    let engine = SyncEngine::new(options, &patterns, interrupt)?;
    let report = engine.run()?;

    if cli.json {
        output::print_json(&report)?;
    } else {
        output::print_summary(&report, verbose);
    }
    Ok(())
}
