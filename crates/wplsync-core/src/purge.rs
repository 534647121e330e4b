//! Removal of target folders that hold nothing worth keeping
//!
//! After orphans are deleted, a folder may be left with only album art or
//! filesystem litter. Such files are deleted and folders that end up
//! empty are removed, children before parents, so removal cascades up to
//! (but never including) the target root.
//!
//! The purge plan is computed on an in-memory view of the target tree
//! with this run's deletions and creations applied, which keeps dry-run
//! and execute mode in agreement even though a dry run leaves the disk
//! untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use wplsync_fs::{RelativePath, canonicalize, io, is_within};

use crate::executor::{Applied, FileError, record};
use crate::interrupt::Interrupt;
use crate::inventory::Inventory;
use crate::options::SyncOptions;
use crate::patterns::Classifier;
use crate::{Error, Result};

/// Result of a folder purge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgeOutcome {
    /// The purge did not run because the target held no media files
    pub skipped: bool,
    pub purged_files: Vec<RelativePath>,
    pub removed_folders: Vec<RelativePath>,
    pub errors: Vec<FileError>,
}

#[derive(Debug, Default)]
struct DirNode {
    files: BTreeSet<String>,
    subdirs: BTreeSet<String>,
}

/// Folder tree of the target as it looks after this run.
#[derive(Debug)]
struct TreeView {
    nodes: BTreeMap<RelativePath, DirNode>,
}

impl TreeView {
    fn scan(root: &Path, interrupt: &Interrupt) -> Result<Self> {
        let mut view = Self {
            nodes: BTreeMap::new(),
        };
        view.nodes.insert(RelativePath::default(), DirNode::default());

        for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
            interrupt.check()?;
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            let full_path = canonicalize(entry.path())?;
            let Ok(key) = RelativePath::from_root(&full_path, root) else {
                continue;
            };
            if entry.file_type().is_dir() {
                view.add_dir(&key);
            } else {
                view.add_file(&key);
            }
        }
        Ok(view)
    }

    fn add_dir(&mut self, key: &RelativePath) {
        if self.nodes.contains_key(key) {
            return;
        }
        self.nodes.insert(key.clone(), DirNode::default());
        if let (Some(parent), Some(name)) = (key.parent(), key.file_name()) {
            self.add_dir(&parent);
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.subdirs.insert(name.to_string());
            }
        }
    }

    fn add_file(&mut self, key: &RelativePath) {
        if let (Some(parent), Some(name)) = (key.parent(), key.file_name()) {
            self.add_dir(&parent);
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.files.insert(name.to_string());
            }
        }
    }

    fn remove_file(&mut self, key: &RelativePath) {
        if let (Some(parent), Some(name)) = (key.parent(), key.file_name()) {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.files.remove(name);
            }
        }
    }
}

/// Deletes disposable files and empty folders below the target root.
pub struct Purger<'a> {
    options: &'a SyncOptions,
    classifier: &'a Classifier,
    interrupt: &'a Interrupt,
}

impl<'a> Purger<'a> {
    pub fn new(options: &'a SyncOptions, classifier: &'a Classifier, interrupt: &'a Interrupt) -> Self {
        Self {
            options,
            classifier,
            interrupt,
        }
    }

    /// Purge the target tree.
    ///
    /// `target` is the inventory taken before any mutation and `applied`
    /// what the executor did afterwards. A target inventory without a
    /// single media file aborts the purge, since every folder would
    /// qualify for removal.
    pub fn purge(&self, target: &Inventory, applied: &Applied) -> Result<PurgeOutcome> {
        let root = &self.options.target_folder;
        info!("Purge folders in {} ...", root.display());

        let media_count = target
            .entries()
            .filter(|entry| {
                entry
                    .relative_path
                    .file_name()
                    .is_some_and(|name| self.classifier.is_media(name))
            })
            .count();
        if media_count == 0 {
            warn!(
                "The target folder does not contain media files. \
                 This could result in removing the complete target folder; aborted."
            );
            return Ok(PurgeOutcome {
                skipped: true,
                ..PurgeOutcome::default()
            });
        }

        let mut view = TreeView::scan(root, self.interrupt)?;
        for key in &applied.deleted {
            view.remove_file(key);
        }
        for key in applied.created.iter().chain(&applied.updated) {
            view.add_file(key);
        }

        let mut outcome = PurgeOutcome::default();
        self.purge_dir(&mut view, &RelativePath::default(), &mut outcome)?;
        Ok(outcome)
    }

    /// Post-order purge of `dir`. Returns true if `dir` was removed.
    fn purge_dir(
        &self,
        view: &mut TreeView,
        dir: &RelativePath,
        outcome: &mut PurgeOutcome,
    ) -> Result<bool> {
        self.interrupt.check()?;
        let root = &self.options.target_folder;

        let subdirs: Vec<String> = match view.nodes.get(dir) {
            Some(node) => node.subdirs.iter().cloned().collect(),
            None => return Ok(false),
        };
        for name in subdirs {
            if self.purge_dir(view, &dir.join(&name), outcome)? {
                if let Some(node) = view.nodes.get_mut(dir) {
                    node.subdirs.remove(&name);
                }
            }
        }

        let Some(node) = view.nodes.get_mut(dir) else {
            return Ok(false);
        };

        if node.files.iter().all(|name| self.classifier.is_purgeable(name)) {
            for name in node.files.clone() {
                let key = dir.join(&name);
                let path = key.to_native(root);
                debug!("Purge transient file {}", path.display());
                match self.remove(&path, io::remove_file) {
                    Ok(()) => {
                        node.files.remove(&name);
                        outcome.purged_files.push(key);
                    }
                    Err(err) => record(&mut outcome.errors, &path, err)?,
                }
            }
        }

        // The target root itself always stays
        if dir.is_empty() || !node.files.is_empty() || !node.subdirs.is_empty() {
            return Ok(false);
        }

        let path = dir.to_native(root);
        debug!("Remove empty folder {}", path.display());
        match self.remove(&path, io::remove_empty_dir) {
            Ok(()) => {
                view.nodes.remove(dir);
                outcome.removed_folders.push(dir.clone());
                Ok(true)
            }
            Err(err) => {
                record(&mut outcome.errors, &path, err)?;
                Ok(false)
            }
        }
    }

    fn remove(&self, path: &Path, op: fn(&Path) -> wplsync_fs::Result<()>) -> Result<()> {
        if is_within(path, &self.options.source_folder) {
            return Err(Error::WouldModifySource {
                path: PathBuf::from(path),
            });
        }
        if self.options.dry_run {
            return Ok(());
        }
        Ok(op(path)?)
    }
}
