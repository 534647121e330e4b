//! SyncEngine implementation
//!
//! The SyncEngine runs the three passes of a sync in order: inventories of
//! both trees, the reconciliation and its execution, then the folder purge.

use serde::Serialize;
use tracing::debug;

use wplsync_fs::RelativePath;

use crate::Result;
use crate::executor::{Executor, FileError};
use crate::interrupt::Interrupt;
use crate::inventory::{Inventory, InventoryStats, build_source_inventory, scan_folder};
use crate::options::SyncOptions;
use crate::patterns::{Classifier, PatternConfig};
use crate::purge::{PurgeOutcome, Purger};
use crate::reconcile::reconcile;

/// Report of a sync run.
///
/// Dry-run and execute mode produce the same report for the same trees;
/// only [`SyncReport::dry_run`] differs.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub source: InventoryStats,
    pub target: InventoryStats,
    /// Files copied because the target had no counterpart
    pub created: Vec<RelativePath>,
    /// Files copied over an outdated counterpart
    pub updated: Vec<RelativePath>,
    /// Target files without source counterpart
    pub orphans: Vec<RelativePath>,
    /// Orphans that were deleted
    pub deleted: Vec<RelativePath>,
    pub unchanged: Vec<RelativePath>,
    pub bytes_copied: u64,
    /// `None` unless orphan deletion was requested
    pub purge: Option<PurgeOutcome>,
    /// Failed copies, deletions and removals
    pub errors: Vec<FileError>,
}

impl SyncReport {
    /// Number of source files taken into account.
    pub fn synchronized(&self) -> usize {
        self.created.len() + self.updated.len() + self.unchanged.len()
    }

    /// True if no per-file operation failed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
            && self
                .purge
                .as_ref()
                .is_none_or(|purge| purge.errors.is_empty())
    }
}

/// Engine for one source → target synchronization.
pub struct SyncEngine {
    options: SyncOptions,
    classifier: Classifier,
    interrupt: Interrupt,
}

impl SyncEngine {
    /// Create an engine for `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern in `patterns` does not compile.
    pub fn new(options: SyncOptions, patterns: &PatternConfig, interrupt: Interrupt) -> Result<Self> {
        let classifier = patterns.compile(options.copy_playlists)?;
        Ok(Self {
            options,
            classifier,
            interrupt,
        })
    }

    /// Build the source and target inventories.
    pub fn scan(&self) -> Result<(Inventory, Inventory)> {
        let source = build_source_inventory(&self.options, &self.classifier, &self.interrupt)?;
        let target = scan_folder(&self.options.target_folder, &self.classifier, &self.interrupt)?;

        for (label, inventory) in [("Source", &source), ("Target", &target)] {
            debug!(
                "{}: {} files, {} valid in {} folders.",
                label,
                inventory.processed_count(),
                inventory.len(),
                inventory.folders().len()
            );
        }
        Ok((source, target))
    }

    /// Run the sync and report what was done.
    pub fn run(&self) -> Result<SyncReport> {
        let (source, target) = self.scan()?;
        let plan = reconcile(&source, &target);

        let applied = Executor::new(&self.options, &self.interrupt).apply(&plan, &source, &target)?;

        debug!(
            "Synchronized {} files. Created: {}, updated: {}, deleted: {}, unchanged: {}.",
            source.len(),
            applied.created.len(),
            applied.updated.len(),
            applied.deleted.len(),
            plan.unchanged.len()
        );

        let purge = if self.options.delete_orphans {
            let purger = Purger::new(&self.options, &self.classifier, &self.interrupt);
            Some(purger.purge(&target, &applied)?)
        } else {
            None
        };

        Ok(SyncReport {
            dry_run: self.options.dry_run,
            source: source.stats(),
            target: target.stats(),
            created: applied.created,
            updated: applied.updated,
            orphans: plan.to_delete,
            deleted: applied.deleted,
            unchanged: plan.unchanged,
            bytes_copied: applied.bytes_copied,
            purge,
            errors: applied.errors,
        })
    }
}
