//! File inventories of a source or target tree
//!
//! An [`Inventory`] is built once by an [`InventoryBuilder`], either by
//! walking a folder or by reading playlists, and is read-only afterwards.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use serde::Serialize;
use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

use wplsync_fs::{RelativePath, canonicalize, io, resolve};

use crate::interrupt::Interrupt;
use crate::options::SyncOptions;
use crate::patterns::Classifier;
use crate::playlist::{Playlist, PlaylistFormat};
use crate::Result;

/// One synchronizable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Canonical absolute location
    pub full_path: PathBuf,
    /// Key relative to the inventory root
    pub relative_path: RelativePath,
    /// Size in bytes at scan time
    pub size: u64,
    /// Modification time at scan time
    pub modified: FileTime,
}

impl FileEntry {
    /// Same size and modification time. Content is not compared.
    pub fn shallow_eq(&self, other: &FileEntry) -> bool {
        self.size == other.size && self.modified == other.modified
    }
}

/// Counters describing an inventory, suitable for reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    /// Files looked at, including skipped ones
    pub processed: usize,
    /// Files in the inventory
    pub valid: usize,
    /// Folders below the root holding files or visited by the walk
    pub folders: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total_bytes: u64,
    /// Lower-cased extensions of files skipped for not matching a sync pattern
    pub skipped_extensions: Vec<String>,
    /// Missing or rejected files, in discovery order
    pub error_files: Vec<PathBuf>,
}

/// The synchronizable files below one root.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    root_folder: PathBuf,
    file_list: Vec<RelativePath>,
    file_map: HashMap<RelativePath, FileEntry>,
    folders: BTreeSet<RelativePath>,
    processed_count: usize,
    skipped_count: usize,
    error_count: usize,
    total_bytes: u64,
    extensions: BTreeMap<String, bool>,
    error_files: Vec<PathBuf>,
}

impl Inventory {
    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Keys in discovery order, each key once.
    pub fn file_list(&self) -> &[RelativePath] {
        &self.file_list
    }

    pub fn get(&self, key: &RelativePath) -> Option<&FileEntry> {
        self.file_map.get(key)
    }

    pub fn contains(&self, key: &RelativePath) -> bool {
        self.file_map.contains_key(key)
    }

    /// Entries in discovery order.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.file_list.iter().filter_map(|key| self.file_map.get(key))
    }

    pub fn len(&self) -> usize {
        self.file_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_map.is_empty()
    }

    pub fn folders(&self) -> &BTreeSet<RelativePath> {
        &self.folders
    }

    pub fn processed_count(&self) -> usize {
        self.processed_count
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Lower-cased extension to "at least one file was skipped because of it".
    pub fn extensions(&self) -> &BTreeMap<String, bool> {
        &self.extensions
    }

    /// Paths that could not be added, in discovery order.
    pub fn error_files(&self) -> &[PathBuf] {
        &self.error_files
    }

    pub fn stats(&self) -> InventoryStats {
        InventoryStats {
            processed: self.processed_count,
            valid: self.len(),
            folders: self.folders.len(),
            skipped: self.skipped_count,
            errors: self.error_count,
            total_bytes: self.total_bytes,
            skipped_extensions: self
                .extensions
                .iter()
                .filter(|(_, skipped)| **skipped)
                .map(|(ext, _)| ext.clone())
                .collect(),
            error_files: self.error_files.clone(),
        }
    }
}

/// Populates an [`Inventory`] from folder walks and playlists.
pub struct InventoryBuilder<'a> {
    inventory: Inventory,
    classifier: &'a Classifier,
    interrupt: &'a Interrupt,
    allow_externals: bool,
}

impl<'a> InventoryBuilder<'a> {
    /// Start an empty inventory rooted at the canonical `root_folder`.
    pub fn new(root_folder: &Path, classifier: &'a Classifier, interrupt: &'a Interrupt) -> Self {
        Self {
            inventory: Inventory {
                root_folder: root_folder.to_path_buf(),
                ..Inventory::default()
            },
            classifier,
            interrupt,
            allow_externals: false,
        }
    }

    /// Accept files outside the root; they are keyed below `external/`.
    pub fn allow_externals(mut self, allow: bool) -> Self {
        self.allow_externals = allow;
        self
    }

    /// Add every matching file below the root.
    ///
    /// Symbolic links are not followed and count as skipped. Entries that
    /// cannot be read during the walk are left out.
    pub fn scan_folder(&mut self) -> Result<()> {
        let root = self.inventory.root_folder.clone();
        info!("Reading folder \"{}\" ...", root.display());

        for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
            self.interrupt.check()?;

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            let full_path = canonicalize(entry.path())?;
            let file_type = entry.file_type();
            if file_type.is_dir() {
                match RelativePath::from_root(&full_path, &root) {
                    Ok(key) if !key.is_empty() => {
                        self.inventory.folders.insert(key);
                    }
                    _ => {}
                }
            } else if file_type.is_symlink() {
                self.inventory.processed_count += 1;
                self.inventory.skipped_count += 1;
                trace!("Skipping symbolic link {}", full_path.display());
            } else {
                self.add_file(&full_path);
            }
        }
        Ok(())
    }

    /// Add the files referenced by a playlist, in playlist order.
    pub fn scan_playlist(&mut self, playlist_path: &Path) -> Result<()> {
        PlaylistFormat::from_path(playlist_path)?;
        info!("Parsing playlist \"{}\" ...", playlist_path.display());

        let playlist = Playlist::load(playlist_path)?;
        info!(
            "Scanning playlist \"{}\" ({}) ...",
            playlist.title.as_deref().unwrap_or_default(),
            playlist.generator.as_deref().unwrap_or("unknown generator")
        );

        for full_path in playlist.resolve()? {
            self.interrupt.check()?;
            self.add_file(&full_path);
        }
        Ok(())
    }

    /// Classify one canonical file path and add it if it is synchronizable.
    ///
    /// Returns true if the file was added. Missing files, files outside the
    /// root (unless externals are allowed) and files matching no sync
    /// pattern are counted and left out.
    pub fn add_file(&mut self, full_path: &Path) -> bool {
        let inventory = &mut self.inventory;
        inventory.processed_count += 1;

        let metadata = match fs::metadata(full_path) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => {
                inventory.skipped_count += 1;
                inventory.error_count += 1;
                inventory.error_files.push(full_path.to_path_buf());
                info!("File not found: '{}'", full_path.display());
                return false;
            }
        };

        let key = RelativePath::from_root(full_path, &inventory.root_folder).or_else(|_| {
            // Playlists may reach the root through a symbolic link
            resolve(full_path)
                .and_then(|real| RelativePath::from_root(&real, &inventory.root_folder))
        });
        let key = match key {
            Ok(key) => key,
            Err(_) if self.allow_externals => RelativePath::external(full_path),
            Err(_) => {
                inventory.skipped_count += 1;
                inventory.error_count += 1;
                inventory.error_files.push(full_path.to_path_buf());
                warn!(
                    "Skipping '{}': outside of {} (use --allow-externals)",
                    full_path.display(),
                    inventory.root_folder.display()
                );
                return false;
            }
        };

        let name = key.file_name().unwrap_or_default();
        if !self.classifier.is_sync(name) {
            inventory.extensions.insert(key.extension(), true);
            inventory.skipped_count += 1;
            trace!("Skipping {}", full_path.display());
            return false;
        }
        inventory.extensions.entry(key.extension()).or_insert(false);

        let entry = FileEntry {
            full_path: full_path.to_path_buf(),
            relative_path: key.clone(),
            size: metadata.len(),
            modified: io::modified_time(&metadata),
        };

        if let Some(parent) = key.parent().filter(|parent| !parent.is_empty()) {
            inventory.folders.insert(parent);
        }
        inventory.total_bytes += entry.size;
        match inventory.file_map.insert(key.clone(), entry) {
            // Keep the first position, take the latest content
            Some(previous) => inventory.total_bytes -= previous.size,
            None => inventory.file_list.push(key),
        }
        true
    }

    pub fn finish(self) -> Inventory {
        self.inventory
    }
}

/// Inventory of every synchronizable file below `root_folder`.
pub fn scan_folder(
    root_folder: &Path,
    classifier: &Classifier,
    interrupt: &Interrupt,
) -> Result<Inventory> {
    let mut builder = InventoryBuilder::new(root_folder, classifier, interrupt);
    builder.scan_folder()?;
    Ok(builder.finish())
}

/// Inventory of the source side of a run.
///
/// Without playlists this is the folder scan of the source folder.
/// Otherwise the contributions of all playlists are merged into one
/// inventory rooted at the source folder; with `copy_playlists` the
/// playlist files themselves are added after their references.
pub fn build_source_inventory(
    options: &SyncOptions,
    classifier: &Classifier,
    interrupt: &Interrupt,
) -> Result<Inventory> {
    let mut builder = InventoryBuilder::new(&options.source_folder, classifier, interrupt)
        .allow_externals(options.allow_externals);

    if options.playlist_paths.is_empty() {
        builder.scan_folder()?;
    } else {
        for playlist_path in &options.playlist_paths {
            builder.scan_playlist(playlist_path)?;
            if options.copy_playlists {
                builder.add_file(playlist_path);
            }
        }
    }
    Ok(builder.finish())
}
