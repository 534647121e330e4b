//! Applies a [`Reconciliation`] to the target tree
//!
//! Deletions run first, then creations, then updates, each in plan order.
//! In dry-run mode every step is logged and recorded but nothing on disk
//! changes. A failing copy or delete is recorded and the run continues.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace, warn};

use wplsync_fs::{RelativePath, io, is_within};

use crate::interrupt::Interrupt;
use crate::inventory::{FileEntry, Inventory};
use crate::options::SyncOptions;
use crate::reconcile::Reconciliation;
use crate::{Error, Result};

/// A per-file failure that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// What the executor did (or, in dry-run mode, would have done).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Applied {
    pub created: Vec<RelativePath>,
    pub updated: Vec<RelativePath>,
    pub deleted: Vec<RelativePath>,
    pub bytes_copied: u64,
    pub errors: Vec<FileError>,
}

/// Performs the file mutations of a run.
pub struct Executor<'a> {
    options: &'a SyncOptions,
    interrupt: &'a Interrupt,
}

impl<'a> Executor<'a> {
    pub fn new(options: &'a SyncOptions, interrupt: &'a Interrupt) -> Self {
        Self { options, interrupt }
    }

    /// The source tree is never modified.
    fn guard(&self, path: &Path) -> Result<()> {
        if is_within(path, &self.options.source_folder) {
            return Err(Error::WouldModifySource {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Copy a source file that has no counterpart in the target.
    pub fn apply_create(&self, entry: &FileEntry) -> Result<u64> {
        let dest = entry.relative_path.to_native(&self.options.target_folder);
        self.copy(entry, &dest)
    }

    /// Overwrite an outdated target file with its source.
    pub fn apply_update(&self, source: &FileEntry, target: &FileEntry) -> Result<u64> {
        self.copy(source, &target.full_path)
    }

    /// Remove an orphaned target file.
    pub fn apply_delete(&self, entry: &FileEntry) -> Result<()> {
        self.guard(&entry.full_path)?;
        if self.options.dry_run {
            return Ok(());
        }
        Ok(io::remove_file(&entry.full_path)?)
    }

    fn copy(&self, source: &FileEntry, dest: &Path) -> Result<u64> {
        self.guard(dest)?;
        if self.options.dry_run {
            return Ok(source.size);
        }
        Ok(io::copy_with_times(&source.full_path, dest)?)
    }

    /// Apply the whole plan.
    ///
    /// Orphans are only deleted with `delete_orphans`.
    ///
    /// # Errors
    ///
    /// Stops on interruption or when a destination lies inside the source
    /// folder. Other failures end up in [`Applied::errors`].
    pub fn apply(
        &self,
        plan: &Reconciliation,
        source: &Inventory,
        target: &Inventory,
    ) -> Result<Applied> {
        let mut applied = Applied::default();

        if self.options.delete_orphans {
            for key in &plan.to_delete {
                self.interrupt.check()?;
                let Some(entry) = target.get(key) else { continue };
                debug!("DELETE: {}", entry.full_path.display());
                match self.apply_delete(entry) {
                    Ok(()) => applied.deleted.push(key.clone()),
                    Err(err) => record(&mut applied.errors, &entry.full_path, err)?,
                }
            }
        }

        for key in &plan.to_create {
            self.interrupt.check()?;
            let Some(entry) = source.get(key) else { continue };
            debug!("CREATE: {}", key);
            match self.apply_create(entry) {
                Ok(bytes) => {
                    applied.bytes_copied += bytes;
                    applied.created.push(key.clone());
                }
                Err(err) => record(&mut applied.errors, &entry.full_path, err)?,
            }
        }

        for key in &plan.to_update {
            self.interrupt.check()?;
            let (Some(source_entry), Some(target_entry)) = (source.get(key), target.get(key)) else {
                continue;
            };
            debug!("UPDATE: {}", key);
            match self.apply_update(source_entry, target_entry) {
                Ok(bytes) => {
                    applied.bytes_copied += bytes;
                    applied.updated.push(key.clone());
                }
                Err(err) => record(&mut applied.errors, &target_entry.full_path, err)?,
            }
        }

        for key in &plan.unchanged {
            trace!("UNCHANGED: {}", key);
        }

        Ok(applied)
    }
}

/// Keep going after per-file failures; abort on the fatal ones.
pub(crate) fn record(errors: &mut Vec<FileError>, path: &Path, err: Error) -> Result<()> {
    match err {
        Error::WouldModifySource { .. } | Error::Interrupted => Err(err),
        err => {
            warn!("{}", err);
            errors.push(FileError {
                path: path.to_path_buf(),
                message: err.to_string(),
            });
            Ok(())
        }
    }
}
