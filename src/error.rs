//! Errors raised while scanning a media tree.
//!
//! Only hard I/O failures are errors. A file without a date in its name, or a
//! path that is no longer a regular file, is represented with `Option` or by
//! leaving the path out of a result.

use std::path::{Path, PathBuf};

/// Errors that can occur while walking a directory tree or digesting files.
#[derive(Debug)]
pub enum ScanError {
    /// A directory could not be listed during traversal.
    Access {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A file's contents could not be read while computing its digest.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ScanError {
    /// Returns the path the failure relates to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Access { path, .. } | Self::Read { path, .. } => path,
        }
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access { path, source } => {
                write!(f, "Cannot access directory {}: {}", path.display(), source)
            }
            Self::Read { path, source } => {
                write!(f, "Cannot read file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Access { source, .. } | Self::Read { source, .. } => Some(source),
        }
    }
}

/// Result type for scanning operations.
pub type ScanResult<T> = Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_display_mentions_path() {
        let err = ScanError::Read {
            path: PathBuf::from("/photos/a.jpg"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("/photos/a.jpg"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_source_is_io_error() {
        let err = ScanError::Access {
            path: PathBuf::from("/photos"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.path(), Path::new("/photos"));
        assert!(err.source().is_some());
    }
}
