//! File mutations performed on the target tree

use std::fs::{self, Metadata};
use std::path::Path;

use filetime::FileTime;

use crate::{Error, Result};

/// Modification time of a file as recorded in its metadata.
pub fn modified_time(metadata: &Metadata) -> FileTime {
    FileTime::from_last_modification_time(metadata)
}

/// Copy `source` to `dest`, carrying over access and modification times.
///
/// Missing parent directories of `dest` are created and an existing
/// `dest` is overwritten. Returns the number of bytes copied.
pub fn copy_with_times(source: &Path, dest: &Path) -> Result<u64> {
    let metadata = fs::metadata(source).map_err(|e| Error::io(source, e))?;
    if !metadata.is_file() {
        return Err(Error::NotAFile {
            path: source.to_path_buf(),
        });
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let bytes = fs::copy(source, dest).map_err(|e| Error::io(dest, e))?;

    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = modified_time(&metadata);
    filetime::set_file_times(dest, atime, mtime).map_err(|e| Error::io(dest, e))?;

    tracing::trace!(source = %source.display(), dest = %dest.display(), bytes, "copied");
    Ok(bytes)
}

/// Remove a single file.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

/// Remove a directory that is expected to be empty.
///
/// Fails instead of deleting anything if the directory still has entries.
pub fn remove_empty_dir(path: &Path) -> Result<()> {
    fs::remove_dir(path).map_err(|e| Error::io(path, e))
}
