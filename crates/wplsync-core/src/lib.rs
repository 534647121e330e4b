//! Synchronization engine for wplsync
//!
//! This crate implements a one-directional sync of a media library (or of
//! the files referenced by a set of playlists) onto a target folder:
//!
//! - **Inventories**: the synchronizable files below a root, keyed by
//!   [`RelativePath`](wplsync_fs::RelativePath)
//! - **Reconciliation**: orphans, creations, updates and unchanged files
//! - **Execution**: copies with preserved timestamps, orphan deletion
//! - **Purge**: removal of folders holding only disposable files
//!
//! # Architecture
//!
//! ```text
//!                      CLI
//!                       |
//!                   SyncEngine
//!                       |
//!   +---------+---------+---------+---------+
//!   |         |         |         |         |
//! playlist inventory reconcile executor   purge
//!   |         |                   |         |
//!   +---------+------ patterns ---+---------+
//!                       |
//!                  wplsync-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use wplsync_core::{Interrupt, PatternConfig, SyncEngine, SyncOptions};
//!
//! fn example() -> wplsync_core::Result<()> {
//!     let options = SyncOptions::new("/music", "/media/player")?
//!         .with_playlists(["/music/Road trip.wpl"])?;
//!     let engine = SyncEngine::new(options, &PatternConfig::default(), Interrupt::new())?;
//!     let report = engine.run()?;
//!     println!("{} files would be copied", report.created.len());
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod executor;
pub mod interrupt;
pub mod inventory;
pub mod options;
pub mod patterns;
pub mod playlist;
pub mod purge;
pub mod reconcile;

pub use engine::{SyncEngine, SyncReport};
pub use error::{Error, Result};
pub use executor::{Applied, Executor, FileError};
pub use interrupt::Interrupt;
pub use inventory::{
    FileEntry, Inventory, InventoryBuilder, InventoryStats, build_source_inventory, scan_folder,
};
pub use options::SyncOptions;
pub use patterns::{Classifier, PLAYLIST_PATTERN, PatternConfig, PatternSet};
pub use playlist::{Playlist, PlaylistFormat};
pub use purge::{PurgeOutcome, Purger};
pub use reconcile::{Reconciliation, reconcile};
