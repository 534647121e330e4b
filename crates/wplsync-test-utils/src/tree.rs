//! [`TestTree`] builder for sync test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tempfile::TempDir;

use crate::wpl::wpl_document;

/// A temporary folder with helpers to lay out files and assert on them.
///
/// All `rel` arguments are forward-slash paths relative to [`TestTree::root`].
///
/// # Example
///
/// ```rust,no_run
/// use wplsync_test_utils::TestTree;
///
/// let source = TestTree::new();
/// source.write("Artist/Album/01.mp3", "audio");
/// source.write_wpl("mix.wpl", "Mix", &["Artist/Album/01.mp3"]);
/// source.assert_file_exists("Artist/Album/01.mp3");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary folder.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary folder.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Native path of `rel` below the root.
    pub fn path(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root().to_path_buf(), |path, segment| path.join(segment))
    }

    /// Create the folder `rel` and its parents.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("Could not create {}: {}", path.display(), e));
        path
    }

    /// Write `content` to `rel`, creating parent folders.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {}", path.display(), e));
        path
    }

    /// Write `content` to `rel` and set its modification time to `unix_secs`.
    pub fn write_with_mtime(&self, rel: &str, content: &str, unix_secs: i64) -> PathBuf {
        let path = self.write(rel, content);
        self.set_mtime(rel, unix_secs);
        path
    }

    /// Set the modification time of `rel` to `unix_secs`.
    pub fn set_mtime(&self, rel: &str, unix_secs: i64) {
        let path = self.path(rel);
        filetime::set_file_mtime(&path, FileTime::from_unix_time(unix_secs, 0))
            .unwrap_or_else(|e| panic!("Could not set mtime of {}: {}", path.display(), e));
    }

    /// Modification time of `rel`.
    pub fn mtime(&self, rel: &str) -> FileTime {
        let path = self.path(rel);
        let metadata = fs::metadata(&path)
            .unwrap_or_else(|_| panic!("Could not stat file: {}", path.display()));
        FileTime::from_last_modification_time(&metadata)
    }

    /// Write a WPL playlist at `rel` referencing `sources` verbatim.
    pub fn write_wpl(&self, rel: &str, title: &str, sources: &[&str]) -> PathBuf {
        self.write(rel, &wpl_document(title, sources))
    }

    /// Read `rel` as text.
    pub fn read(&self, rel: &str) -> String {
        let path = self.path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// All files below the root as sorted forward-slash paths.
    pub fn files(&self) -> Vec<String> {
        let mut files = Vec::new();
        collect(self.root(), "", &mut files, false);
        files.sort();
        files
    }

    /// All folders below the root (excluding the root) as sorted
    /// forward-slash paths.
    pub fn dirs(&self) -> Vec<String> {
        let mut dirs = Vec::new();
        collect(self.root(), "", &mut dirs, true);
        dirs.sort();
        dirs
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `rel` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `rel` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, rel: &str, content: &str) {
        let file_content = self.read(rel);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            rel,
            content,
            file_content
        );
    }
}

fn collect(dir: &Path, prefix: &str, out: &mut Vec<String>, want_dirs: bool) {
    let entries = fs::read_dir(dir)
        .unwrap_or_else(|_| panic!("Could not list folder: {}", dir.display()));
    for entry in entries {
        let entry = entry.unwrap();
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };
        let file_type = entry.file_type().unwrap();
        if file_type.is_dir() {
            if want_dirs {
                out.push(rel.clone());
            }
            collect(&entry.path(), &rel, out, want_dirs);
        } else if !want_dirs {
            out.push(rel);
        }
    }
}
