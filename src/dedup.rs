/// Content-based deduplication of files.
///
/// Files are compared by the SHA-1 digest of their full contents. Of each set
/// of identical files, the one appearing first in the input is kept and the
/// others are reported as duplicates of it.
use crate::error::{ScanError, ScanResult};
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use sha1::{Digest as _, Sha1};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Length in bytes of a [`Digest`].
pub const DIGEST_LEN: usize = 20;

/// The 160-bit SHA-1 digest of a file's contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Computes the digest of an in-memory byte slice.
    pub fn of_bytes(data: &[u8]) -> Self {
        Self::from_hasher(Sha1::new_with_prefix(data))
    }

    fn from_hasher(hasher: Sha1) -> Self {
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Streams a file through SHA-1 and returns its digest.
///
/// # Errors
///
/// Returns [`ScanError::Read`] if the file cannot be opened or read.
pub fn digest_file(path: &Path) -> ScanResult<Digest> {
    let read_error = |e| ScanError::Read {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = File::open(path).map_err(read_error)?;
    let mut hasher = Sha1::new();
    io::copy(&mut file, &mut hasher).map_err(read_error)?;

    Ok(Digest::from_hasher(hasher))
}

/// What to do when a file cannot be read while deduplicating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    /// Stop and return the error.
    #[default]
    Abort,
    /// Log a warning and leave the file out of the result.
    Skip,
}

/// Options controlling a [`Deduplicator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupOptions {
    /// Compute digests on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
    /// Policy for unreadable files.
    #[serde(default)]
    pub on_read_error: ReadErrorPolicy,
}

/// A path dropped because an earlier path has the same contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    /// The discarded path.
    pub path: PathBuf,
    /// The kept path with identical contents.
    pub original: PathBuf,
    pub digest: Digest,
}

/// Result of splitting a list of paths into unique files and duplicates.
#[derive(Debug, Clone, Default)]
pub struct DedupOutcome {
    /// One path per distinct content, in input order.
    pub unique: Vec<PathBuf>,
    /// Every discarded path, in input order.
    pub duplicates: Vec<Duplicate>,
}

/// Splits paths into unique-content files and duplicates.
///
/// Entries that are not regular files at the time of the call are left out
/// of both lists. When digests are computed in parallel, the keep/discard
/// decision is still taken in a single pass over the input order, so the
/// first occurrence of every content always wins.
#[derive(Clone, Default)]
pub struct Deduplicator {
    options: DedupOptions,
    progress: Option<ProgressBar>,
}

impl fmt::Debug for Deduplicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deduplicator")
            .field("options", &self.options)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl Deduplicator {
    pub fn new(options: DedupOptions) -> Self {
        Self {
            options,
            progress: None,
        }
    }

    /// Reports each digested file on `progress`. Its length is set to the
    /// number of files to digest.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn options(&self) -> &DedupOptions {
        &self.options
    }

    /// Returns the paths with unique contents, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Read`] for the first unreadable file in input
    /// order, unless the policy is [`ReadErrorPolicy::Skip`].
    pub fn unique<P: AsRef<Path>>(&self, paths: &[P]) -> ScanResult<Vec<PathBuf>> {
        self.partition(paths).map(|outcome| outcome.unique)
    }

    /// Splits `paths` into unique files and duplicates.
    ///
    /// # Errors
    ///
    /// See [`unique`](Self::unique).
    pub fn partition<P: AsRef<Path>>(&self, paths: &[P]) -> ScanResult<DedupOutcome> {
        let files: Vec<&Path> = paths
            .iter()
            .map(|path| path.as_ref())
            .filter(|path| {
                let is_file = path.is_file();
                if !is_file {
                    log::debug!("Not a regular file, excluded: {}", path.display());
                }
                is_file
            })
            .collect();

        if let Some(progress) = &self.progress {
            progress.set_length(files.len() as u64);
        }

        if self.options.parallel {
            let digests: Vec<(&Path, ScanResult<Digest>)> = files
                .par_iter()
                .map(|&path| (path, self.digest_tracked(path)))
                .collect();
            self.merge(digests)
        } else {
            // Lazy so that an aborting policy stops reading at the first failure.
            self.merge(files.into_iter().map(|path| (path, self.digest_tracked(path))))
        }
    }

    fn digest_tracked(&self, path: &Path) -> ScanResult<Digest> {
        let digest = digest_file(path);
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
        digest
    }

    /// Applies first-occurrence-wins over digests given in input order.
    fn merge<'a, I>(&self, digests: I) -> ScanResult<DedupOutcome>
    where
        I: IntoIterator<Item = (&'a Path, ScanResult<Digest>)>,
    {
        let mut seen: HashMap<Digest, PathBuf> = HashMap::new();
        let mut outcome = DedupOutcome::default();

        for (path, digest) in digests {
            let digest = match digest {
                Ok(digest) => digest,
                Err(e) => match self.options.on_read_error {
                    ReadErrorPolicy::Abort => return Err(e),
                    ReadErrorPolicy::Skip => {
                        log::warn!("Skipping unreadable file: {}", e);
                        continue;
                    }
                },
            };

            match seen.entry(digest) {
                Entry::Occupied(entry) => {
                    log::debug!(
                        "Duplicate {} of {}",
                        path.display(),
                        entry.get().display()
                    );
                    outcome.duplicates.push(Duplicate {
                        path: path.to_path_buf(),
                        original: entry.get().clone(),
                        digest,
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(path.to_path_buf());
                    outcome.unique.push(path.to_path_buf());
                }
            }
        }

        Ok(outcome)
    }
}

/// Returns the paths with unique contents, keeping the first of each set of
/// identical files.
///
/// Paths that do not name a regular file are silently left out. Digests are
/// computed sequentially and any read failure aborts the call.
///
/// # Examples
///
/// ```no_run
/// use mediatidy::dedup::unique_digest;
/// use std::path::PathBuf;
///
/// let files = vec![PathBuf::from("a.jpg"), PathBuf::from("copy_of_a.jpg")];
/// let unique = unique_digest(&files)?;
/// # Ok::<(), mediatidy::ScanError>(())
/// ```
pub fn unique_digest<P: AsRef<Path>>(paths: &[P]) -> ScanResult<Vec<PathBuf>> {
    Deduplicator::default().unique(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    #[test]
    fn test_digest_known_value() {
        assert_eq!(
            Digest::of_bytes(b"abc").to_string(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_digest_file_matches_bytes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let content = vec![7u8; 200_000];
        let path = write(temp_dir.path(), "big.jpg", &content);

        assert_eq!(digest_file(&path).unwrap(), Digest::of_bytes(&content));
    }

    #[test]
    fn test_digest_missing_file_is_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing.jpg");
        assert!(matches!(
            digest_file(&missing),
            Err(ScanError::Read { .. })
        ));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        let b = write(dir, "b.jpg", b"same");
        let a = write(dir, "a.jpg", b"same");
        let c = write(dir, "c.jpg", b"same");

        assert_eq!(unique_digest(&[&b, &a, &c]).unwrap(), vec![b.clone()]);
        assert_eq!(unique_digest(&[&c, &b, &a]).unwrap(), vec![c]);
    }

    #[test]
    fn test_distinct_contents_all_kept() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        let paths = vec![
            write(dir, "1.jpg", b"one"),
            write(dir, "2.jpg", b"two"),
            write(dir, "3.jpg", b""),
        ];

        assert_eq!(unique_digest(&paths).unwrap(), paths);
    }

    #[test]
    fn test_non_files_are_excluded() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        let file = write(dir, "1.jpg", b"one");
        let paths = vec![dir.join("missing.jpg"), dir.to_path_buf(), file.clone()];

        assert_eq!(unique_digest(&paths).unwrap(), vec![file]);
    }

    #[test]
    fn test_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        let paths = vec![
            write(dir, "a.jpg", b"x"),
            write(dir, "b.jpg", b"y"),
            write(dir, "c.jpg", b"x"),
        ];

        let once = unique_digest(&paths).unwrap();
        let twice = unique_digest(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_partition_records_duplicates() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        let a = write(dir, "a.jpg", b"x");
        let b = write(dir, "b.jpg", b"y");
        let c = write(dir, "c.jpg", b"x");

        let outcome = Deduplicator::default()
            .partition(&[&a, &b, &c])
            .unwrap();
        assert_eq!(outcome.unique, vec![a.clone(), b]);
        assert_eq!(
            outcome.duplicates,
            vec![Duplicate {
                path: c,
                original: a,
                digest: Digest::of_bytes(b"x"),
            }]
        );
    }

    #[test]
    fn test_parallel_keeps_input_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        let paths: Vec<PathBuf> = (0..64)
            .map(|i| write(dir, &format!("{:02}.jpg", i), format!("{}", i % 5).as_bytes()))
            .collect();

        let sequential = Deduplicator::default().partition(&paths).unwrap();
        let parallel = Deduplicator::new(DedupOptions {
            parallel: true,
            ..Default::default()
        })
        .partition(&paths)
        .unwrap();

        assert_eq!(parallel.unique, paths[..5].to_vec());
        assert_eq!(parallel.unique, sequential.unique);
        assert_eq!(parallel.duplicates, sequential.duplicates);
    }

    #[test]
    fn test_progress_counts_digested_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        let paths = vec![
            write(dir, "a.jpg", b"x"),
            dir.join("missing.jpg"),
            write(dir, "b.jpg", b"x"),
        ];

        let progress = ProgressBar::hidden();
        Deduplicator::default()
            .with_progress(progress.clone())
            .unique(&paths)
            .unwrap();
        assert_eq!(progress.length(), Some(2));
        assert_eq!(progress.position(), 2);
    }

    fn denied(path: &Path) -> ScanResult<Digest> {
        Err(ScanError::Read {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    #[test]
    fn test_read_errors_under_each_policy() {
        let a = Path::new("a.jpg");
        let b = Path::new("b.jpg");
        let c = Path::new("c.jpg");
        let d = Path::new("d.jpg");
        let x = Digest::of_bytes(b"x");
        let digests = || {
            vec![
                (a, Ok(x)),
                (b, denied(b)),
                (c, denied(c)),
                (d, Ok(x)),
            ]
        };

        // Abort returns the first failure in input order.
        match Deduplicator::default().merge(digests()) {
            Err(ScanError::Read { path, .. }) => assert_eq!(path, b),
            other => panic!("Expected read error, got {:?}", other),
        }

        let skipping = Deduplicator::new(DedupOptions {
            on_read_error: ReadErrorPolicy::Skip,
            ..Default::default()
        });
        let outcome = skipping.merge(digests()).unwrap();
        assert_eq!(outcome.unique, vec![a.to_path_buf()]);
        assert_eq!(
            outcome.duplicates,
            vec![Duplicate {
                path: d.to_path_buf(),
                original: a.to_path_buf(),
                digest: x,
            }]
        );
    }

    #[test]
    fn test_skipped_file_never_becomes_original() {
        let a = Path::new("a.jpg");
        let b = Path::new("b.jpg");
        let c = Path::new("c.jpg");
        let x = Digest::of_bytes(b"x");

        let skipping = Deduplicator::new(DedupOptions {
            on_read_error: ReadErrorPolicy::Skip,
            ..Default::default()
        });
        let outcome = skipping
            .merge(vec![(a, denied(a)), (b, Ok(x)), (c, Ok(x))])
            .unwrap();

        assert_eq!(outcome.unique, vec![b.to_path_buf()]);
        assert_eq!(outcome.duplicates.len(), 1);
        assert_eq!(outcome.duplicates[0].path, c);
        assert_eq!(outcome.duplicates[0].original, b);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_policies() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        let a = write(dir, "a.jpg", b"x");
        let locked = write(dir, "locked.jpg", b"y");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root from reading.
        if File::open(&locked).is_ok() {
            return;
        }

        let paths = vec![a.clone(), locked.clone()];
        match unique_digest(&paths) {
            Err(ScanError::Read { path, .. }) => assert_eq!(path, locked),
            other => panic!("Expected read error, got {:?}", other),
        }

        let skipping = Deduplicator::new(DedupOptions {
            on_read_error: ReadErrorPolicy::Skip,
            ..Default::default()
        });
        assert_eq!(skipping.unique(&paths).unwrap(), vec![a]);
    }
}
