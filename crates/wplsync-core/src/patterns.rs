//! File classification by glob pattern
//!
//! Three pattern tables decide what happens to a file:
//!
//! - **media**: audio files and playlists that are always synchronized
//! - **copy**: auxiliary files (album art) synchronized next to media
//! - **transient**: filesystem metadata that may be deleted at any time
//!
//! Patterns are matched against the file name only. Matching ignores case
//! on hosts with case-insensitive filesystems.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Pattern added to the sync set when playlists are copied.
pub const PLAYLIST_PATTERN: &str = "*.wpl";

const CASE_INSENSITIVE: bool = cfg!(windows);

const DEFAULT_MEDIA: &[&str] = &[
    "*.aif", "*.m3u", "*.m4a", "*.m4p", "*.mp3", "*.mpa", "*.oga", "*.ogg", "*.pcast", "*.ra",
    "*.wav", "*.wma",
];

const DEFAULT_COPY: &[&str] = &["Folder.jpg", "AlbumArtSmall.jpg"];

const DEFAULT_TRANSIENT: &[&str] = &[".DS_Store", "desktop.ini", "Thumbs.db"];

fn to_owned(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}

/// The pattern tables as configured by the user.
///
/// Missing keys in a loaded file keep their default table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub media: Vec<String>,
    pub copy: Vec<String>,
    pub transient: Vec<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            media: to_owned(DEFAULT_MEDIA),
            copy: to_owned(DEFAULT_COPY),
            transient: to_owned(DEFAULT_TRANSIENT),
        }
    }
}

impl PatternConfig {
    /// Load pattern tables from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| wplsync_fs::Error::io(path, e))?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: PathBuf::from(path),
            message: e.to_string(),
        })
    }

    /// Compile the tables into a [`Classifier`].
    ///
    /// With `include_playlists` the sync set also matches [`PLAYLIST_PATTERN`].
    pub fn compile(&self, include_playlists: bool) -> Result<Classifier> {
        let mut sync: Vec<String> = self.media.iter().chain(&self.copy).cloned().collect();
        if include_playlists {
            sync.push(PLAYLIST_PATTERN.to_string());
        }
        let purge: Vec<String> = self.transient.iter().chain(&self.copy).cloned().collect();

        Ok(Classifier {
            media: PatternSet::new(&self.media)?,
            sync: PatternSet::new(&sync)?,
            purge: PatternSet::new(&purge)?,
        })
    }
}

/// An ordered list of glob patterns compiled for matching.
#[derive(Debug, Clone)]
pub struct PatternSet {
    glob_set: GlobSet,
}

impl PatternSet {
    /// Compile a list of patterns.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut pattern_list = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(CASE_INSENSITIVE)
                .literal_separator(true)
                .build()
                .map_err(|e| Error::Pattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
            builder.add(glob);
            pattern_list.push(pattern.to_string());
        }

        let glob_set = builder.build().map_err(|e| Error::Pattern {
            pattern: pattern_list.join(" "),
            message: e.to_string(),
        })?;

        Ok(Self { glob_set })
    }

    /// True if `name` matches at least one pattern.
    pub fn matches_any(&self, name: &str) -> bool {
        self.glob_set.is_match(name)
    }
}

/// Immutable classification policy shared by every component of a run.
#[derive(Debug, Clone)]
pub struct Classifier {
    media: PatternSet,
    sync: PatternSet,
    purge: PatternSet,
}

impl Classifier {
    /// Build a classifier from the default tables.
    pub fn with_defaults() -> Result<Self> {
        PatternConfig::default().compile(false)
    }

    /// Audio files and playlists.
    pub fn is_media(&self, name: &str) -> bool {
        self.media.matches_any(name)
    }

    /// Media or copy files, i.e. everything that is synchronized.
    pub fn is_sync(&self, name: &str) -> bool {
        self.sync.matches_any(name)
    }

    /// Transient or copy files, i.e. everything a folder purge may delete.
    pub fn is_purgeable(&self, name: &str) -> bool {
        self.purge.matches_any(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_patterns_are_both_synced_and_purgeable() {
        let classifier = Classifier::with_defaults().unwrap();
        assert!(classifier.is_sync("Folder.jpg"));
        assert!(classifier.is_purgeable("Folder.jpg"));
        assert!(!classifier.is_media("Folder.jpg"));
    }

    #[test]
    fn pattern_does_not_cross_separator() {
        let set = PatternSet::new(&["*.mp3"]).unwrap();
        assert!(set.matches_any("song.mp3"));
        assert!(!set.matches_any("album/song.mp3"));
    }
}
