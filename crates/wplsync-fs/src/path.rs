//! Canonical paths and inventory keys
//!
//! Absolute paths are compared in canonical form: made absolute, with `.`
//! and `..` segments collapsed. The canonical form keeps the case of its
//! input. On case-insensitive hosts, comparisons between paths and between
//! keys ignore case, so `C:\Music` and `c:\music` name the same folder
//! while copies keep the on-disk spelling.
//!
//! [`canonicalize`] never resolves symbolic links and works for paths that
//! do not exist yet. Roots that must not alias each other go through
//! [`resolve`] instead.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::{Error, Result};

/// Folder below the target root that receives files from outside the source.
pub const EXTERNAL_DIR: &str = "external";

/// Resolve `path` to its canonical absolute form.
///
/// Relative input is resolved against the current working directory.
/// The path does not need to exist.
pub fn canonicalize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let absolute = std::path::absolute(path).map_err(|e| Error::io(path, e))?;
    let collapsed = collapse_dots(&absolute);
    Ok(dunce::simplified(&collapsed).to_path_buf())
}

/// Resolve an existing `path` to its real location, following symbolic links.
pub fn resolve(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    dunce::canonicalize(path).map_err(|e| Error::io(path, e))
}

/// Return true if neither canonical path contains the other.
///
/// Containment is decided per path component, which is the same as
/// comparing both paths as strings with a trailing separator appended:
/// `/music` and `/music2` are independent, `/music` and `/music/a` are not.
pub fn paths_independent(a: impl AsRef<Path>, b: impl AsRef<Path>) -> Result<bool> {
    let a = canonicalize(a)?;
    let b = canonicalize(b)?;
    Ok(!(is_within(&a, &b) || is_within(&b, &a)))
}

/// Return true if the canonical `path` equals `root` or lies below it.
///
/// Both arguments are expected in canonical form.
pub fn is_within(path: &Path, root: &Path) -> bool {
    strip_root(path, root).is_some()
}

/// Remainder of `path` below `root`, matching components the way the host
/// file system compares names.
fn strip_root<'a>(path: &'a Path, root: &Path) -> Option<&'a Path> {
    let mut rest = path.components();
    for expected in root.components() {
        let actual = rest.next()?;
        if fold_case(&actual.as_os_str().to_string_lossy())
            != fold_case(&expected.as_os_str().to_string_lossy())
        {
            return None;
        }
    }
    Some(rest.as_path())
}

fn collapse_dots(path: &Path) -> PathBuf {
    let mut kept: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match kept.last() {
                Some(Component::Normal(_)) => {
                    kept.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => kept.push(component),
            },
            _ => kept.push(component),
        }
    }
    kept.into_iter().collect()
}

#[cfg(windows)]
fn fold_case(name: &str) -> Cow<'_, str> {
    Cow::Owned(name.to_lowercase())
}

#[cfg(not(windows))]
fn fold_case(name: &str) -> Cow<'_, str> {
    Cow::Borrowed(name)
}

/// A path relative to an inventory root, used as the inventory key.
///
/// Segments are joined with forward slashes on every platform, so keys
/// built from a source tree and a target tree compare equal whenever the
/// files occupy the same position below their roots. Keys keep the case
/// they were built with but compare case-insensitively on Windows.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RelativePath {
    inner: String,
}

impl RelativePath {
    /// Build a key from a relative path.
    ///
    /// Root and prefix components are dropped, `.` is skipped and `..`
    /// removes the preceding segment.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let mut segments: Vec<String> = Vec::new();
        for component in path.as_ref().components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
                Component::ParentDir => {
                    segments.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Self {
            inner: segments.join("/"),
        }
    }

    /// Key of the canonical `full` path relative to the canonical `root`.
    pub fn from_root(full: &Path, root: &Path) -> Result<Self> {
        strip_root(full, root)
            .map(Self::new)
            .ok_or_else(|| Error::OutsideRoot {
                path: full.to_path_buf(),
                root: root.to_path_buf(),
            })
    }

    /// Key for a file that lives outside the inventory root.
    ///
    /// The absolute location is mirrored below [`EXTERNAL_DIR`], e.g.
    /// `/data/other/song.mp3` becomes `external/data/other/song.mp3` and
    /// `C:\other\song.mp3` becomes `external/C/other/song.mp3`.
    pub fn external(full: &Path) -> Self {
        let mut segments = vec![EXTERNAL_DIR.to_string()];
        for component in full.components() {
            match component {
                Component::Prefix(prefix) => {
                    let drive: String = prefix
                        .as_os_str()
                        .to_string_lossy()
                        .chars()
                        .filter(|c| c.is_alphanumeric())
                        .collect();
                    if !drive.is_empty() {
                        segments.push(drive);
                    }
                }
                Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
                Component::ParentDir => {
                    if segments.len() > 1 {
                        segments.pop();
                    }
                }
                Component::RootDir | Component::CurDir => {}
            }
        }
        Self {
            inner: segments.join("/"),
        }
    }

    /// Get the forward-slash string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// True for the key of the root itself.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Native location of this key below `root`.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in self.segments() {
            path.push(segment);
        }
        path
    }

    /// Append a single segment.
    pub fn join(&self, segment: &str) -> Self {
        if self.is_empty() {
            Self::new(segment)
        } else {
            Self::new(format!("{}/{}", self.inner, segment))
        }
    }

    /// Iterate over the individual path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }

    /// The last segment.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Key of the containing folder. The root folder has the empty key.
    pub fn parent(&self) -> Option<Self> {
        if self.is_empty() {
            return None;
        }
        let parent = match self.inner.rfind('/') {
            Some(idx) => &self.inner[..idx],
            None => "",
        };
        Some(Self {
            inner: parent.to_string(),
        })
    }

    /// Lower-cased extension including the leading dot, or an empty string.
    ///
    /// A leading dot does not start an extension, so `.DS_Store` has none.
    pub fn extension(&self) -> String {
        let name = self.file_name().unwrap_or_default();
        match name.rfind('.') {
            Some(idx) if idx > 0 => name[idx..].to_lowercase(),
            _ => String::new(),
        }
    }

    fn compare_key(&self) -> Cow<'_, str> {
        fold_case(&self.inner)
    }
}

impl PartialEq for RelativePath {
    fn eq(&self, other: &Self) -> bool {
        self.compare_key() == other.compare_key()
    }
}

impl Eq for RelativePath {}

impl Hash for RelativePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.compare_key().hash(state);
    }
}

impl PartialOrd for RelativePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RelativePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_key().cmp(&other.compare_key())
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for RelativePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<&Path> for RelativePath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
