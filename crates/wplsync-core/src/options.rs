//! Run options resolved once from the command line

use std::path::{Path, PathBuf};

use wplsync_fs::{canonicalize, paths_independent, resolve};

use crate::playlist::PlaylistFormat;
use crate::{Error, Result};

/// Options for a sync run.
///
/// Construct with [`SyncOptions::new`], which validates the folder pair,
/// then attach playlists with [`SyncOptions::with_playlists`]. The flags
/// are plain fields; dry-run is on unless explicitly disabled.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Source folder with symbolic links resolved
    pub source_folder: PathBuf,
    /// Target folder with symbolic links resolved
    pub target_folder: PathBuf,
    /// Resolved playlist files; empty means "synchronize the whole folder"
    pub playlist_paths: Vec<PathBuf>,
    /// Only report what would change
    pub dry_run: bool,
    /// 0 = quiet, 1 = default, 2 and up = more detail
    pub verbose: u8,
    /// Delete orphans and purge folders left with disposable files only
    pub delete_orphans: bool,
    /// Synchronize the playlist files themselves
    pub copy_playlists: bool,
    /// Accept source files outside the source folder
    pub allow_externals: bool,
}

impl SyncOptions {
    /// Validate the source and target folders and resolve them to their real
    /// locations.
    ///
    /// Symbolic links are followed before the overlap check, so a link that
    /// points into the other folder is rejected like the folder itself.
    ///
    /// # Errors
    ///
    /// Fails if either path is not an existing folder or if one folder
    /// contains the other.
    pub fn new(source_folder: impl AsRef<Path>, target_folder: impl AsRef<Path>) -> Result<Self> {
        let source_folder = canonicalize(source_folder)?;
        let target_folder = canonicalize(target_folder)?;

        for folder in [&source_folder, &target_folder] {
            if !folder.is_dir() {
                return Err(Error::NotADirectory {
                    path: folder.clone(),
                });
            }
        }

        let source_folder = resolve(&source_folder)?;
        let target_folder = resolve(&target_folder)?;

        if !paths_independent(&source_folder, &target_folder)? {
            return Err(Error::OverlappingFolders {
                source_folder,
                target_folder,
            });
        }

        Ok(Self {
            source_folder,
            target_folder,
            playlist_paths: Vec::new(),
            dry_run: true,
            verbose: 1,
            delete_orphans: false,
            copy_playlists: false,
            allow_externals: false,
        })
    }

    /// Restrict the source to the files referenced by `playlists`.
    ///
    /// # Errors
    ///
    /// Fails if a playlist does not exist or has an unsupported extension.
    pub fn with_playlists<I, P>(mut self, playlists: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for playlist in playlists {
            let path = canonicalize(playlist)?;
            if !path.is_file() {
                return Err(Error::PlaylistNotFound { path });
            }
            PlaylistFormat::from_path(&path)?;
            self.playlist_paths.push(resolve(&path)?);
        }
        Ok(self)
    }
}
