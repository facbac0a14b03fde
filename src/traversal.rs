//! Recursive listing of the regular files under a directory.
//!
//! The walk is iterative, so deeply nested trees do not grow the call stack.
//! Symbolic links are reported and skipped, never followed.

use crate::error::{ScanError, ScanResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists every regular file found at any depth under `root`.
///
/// Files are returned in the order the filesystem lists them, depth first:
/// the files of a subdirectory appear at the position the subdirectory was
/// listed in its parent. Entries that are neither files nor directories
/// (symlinks, sockets, devices, fifos) are logged at `info` level and left out.
///
/// # Errors
///
/// Returns [`ScanError::Access`] if `root` is not a readable directory, or if
/// any directory below it cannot be listed. The walk stops at the first such
/// failure instead of returning a partial listing.
///
/// # Examples
///
/// ```no_run
/// use mediatidy::traversal::list_all;
/// use std::path::Path;
///
/// for file in list_all(Path::new("/home/user/Pictures"))? {
///     println!("{}", file.display());
/// }
/// # Ok::<(), mediatidy::ScanError>(())
/// ```
pub fn list_all(root: &Path) -> ScanResult<Vec<PathBuf>> {
    let metadata = fs::metadata(root).map_err(|e| ScanError::Access {
        path: root.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(ScanError::Access {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        });
    }

    log::debug!("Exploring directory {}", root.display());

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        let file_type = entry.file_type();

        if file_type.is_file() {
            log::debug!("Added file {}", entry.path().display());
            files.push(entry.into_path());
        } else if file_type.is_dir() {
            log::debug!("Exploring directory {}", entry.path().display());
        } else {
            log::info!("Ignoring path {}", entry.path().display());
        }
    }

    Ok(files)
}

/// Converts a walk failure into an access error on the offending directory.
fn walk_error(root: &Path, error: walkdir::Error) -> ScanError {
    let path = error
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let source = match error.into_io_error() {
        Some(io_error) => io_error,
        None => io::Error::other("filesystem loop detected"),
    };
    ScanError::Access { path, source }
}
