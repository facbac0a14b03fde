//! The classification pipeline: traversal, filtering, deduplication and date
//! extraction, run in that order over one directory tree.

use crate::config::{ConfigError, MediaConfig};
use crate::date_extractor::{CalendarDate, date_from_name};
use crate::dedup::{DedupOptions, Deduplicator, Duplicate};
use crate::error::ScanResult;
use crate::media_category::{MediaExtensions, MediaKind};
use crate::traversal::list_all;
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A unique media file with what could be learnt about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedFile {
    pub path: PathBuf,
    pub kind: MediaKind,
    /// Capture date read from the file name, if it carries one.
    pub date: Option<CalendarDate>,
}

/// Everything found while scanning a directory tree.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// The directory that was scanned.
    pub root: PathBuf,
    /// Unique media files in traversal order.
    pub files: Vec<ClassifiedFile>,
    /// Media files whose contents duplicate an earlier file.
    pub duplicates: Vec<Duplicate>,
    /// Number of regular files that are not pictures or videos.
    pub ignored: usize,
}

impl ScanReport {
    pub fn count_kind(&self, kind: MediaKind) -> usize {
        self.files.iter().filter(|f| f.kind == kind).count()
    }

    /// Number of unique files with a date in their name.
    pub fn dated(&self) -> usize {
        self.files.iter().filter(|f| f.date.is_some()).count()
    }

    pub fn undated(&self) -> usize {
        self.files.len() - self.dated()
    }
}

/// Runs the classification pipeline with a fixed configuration.
///
/// # Examples
///
/// ```no_run
/// use mediatidy::pipeline::MediaScanner;
/// use std::path::Path;
///
/// let report = MediaScanner::default().scan(Path::new("/home/user/Pictures"))?;
/// for file in &report.files {
///     println!("{} {:?}", file.path.display(), file.date);
/// }
/// # Ok::<(), mediatidy::ScanError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MediaScanner {
    extensions: MediaExtensions,
    deduplicator: Deduplicator,
}

impl MediaScanner {
    pub fn new(extensions: MediaExtensions, options: DedupOptions) -> Self {
        Self {
            extensions,
            deduplicator: Deduplicator::new(options),
        }
    }

    /// Builds a scanner from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured extensions are invalid.
    pub fn from_config(config: &MediaConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.media_extensions()?, config.dedup))
    }

    /// Reports digest progress on `progress`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.deduplicator = self.deduplicator.with_progress(progress);
        self
    }

    pub fn extensions(&self) -> &MediaExtensions {
        &self.extensions
    }

    /// Scans `root` and classifies the unique media files below it.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Access`](crate::ScanError::Access) if a directory
    /// cannot be listed, and [`ScanError::Read`](crate::ScanError::Read) if a
    /// media file cannot be read under the aborting read policy.
    pub fn scan(&self, root: &Path) -> ScanResult<ScanReport> {
        let all_files = list_all(root)?;
        let media = self.extensions.media_kinds(&all_files);
        let ignored = all_files.len() - media.len();
        log::info!(
            "Found {} files under {}, {} of them media",
            all_files.len(),
            root.display(),
            media.len()
        );

        let paths: Vec<&Path> = media.iter().map(|(path, _)| path.as_path()).collect();
        let outcome = self.deduplicator.partition(&paths)?;
        log::info!(
            "{} unique media files, {} duplicates",
            outcome.unique.len(),
            outcome.duplicates.len()
        );

        // Unique paths come out in the same order as `media`.
        let mut unique = outcome.unique.into_iter().peekable();
        let files = media
            .into_iter()
            .filter_map(|(path, kind)| {
                let path = unique.next_if_eq(&path)?;
                let date = date_from_name(&path);
                Some(ClassifiedFile { path, kind, date })
            })
            .collect();

        Ok(ScanReport {
            root: root.to_path_buf(),
            files,
            duplicates: outcome.duplicates,
            ignored,
        })
    }
}

/// Scans `root` with the given extensions and deduplication options.
pub fn classify(
    root: &Path,
    extensions: &MediaExtensions,
    options: DedupOptions,
) -> ScanResult<ScanReport> {
    MediaScanner::new(extensions.clone(), options).scan(root)
}
