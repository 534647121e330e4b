//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// wplsync - Mirror a music library, or the files of some playlists, onto a player
///
/// Runs in dry-run mode unless --execute is given.
#[derive(Parser, Debug)]
#[command(name = "wplsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Folder to copy from
    pub source_folder: PathBuf,

    /// Folder to copy to
    pub target_folder: PathBuf,

    /// WPL playlists selecting the files to sync (default: the whole source folder)
    pub playlists: Vec<PathBuf>,

    /// Apply the changes instead of only reporting them
    #[arg(short = 'x', long)]
    pub execute: bool,

    /// Only report warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Report more detail (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Copy the playlist files as well
    #[arg(short, long)]
    pub copy_playlists: bool,

    /// Delete orphaned target files and purge emptied folders
    #[arg(short, long = "delete")]
    pub delete_orphans: bool,

    /// Accept playlist entries outside the source folder
    #[arg(short = 'e', long)]
    pub allow_externals: bool,

    /// TOML file overriding the media, copy and transient file patterns
    #[arg(long, value_name = "FILE")]
    pub patterns: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// 0 = quiet, 1 = default, one more per `-v`.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}
