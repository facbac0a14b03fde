//! mediatidy - find the unique photos and videos in a directory tree
//!
//! This library walks a directory tree, keeps the files recognised as
//! pictures or videos by their extension, drops files whose contents
//! duplicate an earlier file, and reads capture dates encoded in file names.
//! It never moves, renames or deletes anything.

pub mod cli;
pub mod config;
pub mod date_extractor;
pub mod dedup;
pub mod error;
pub mod media_category;
pub mod output;
pub mod pipeline;
pub mod traversal;

pub use config::{ConfigError, MediaConfig};
pub use date_extractor::{CalendarDate, date_from_name};
pub use dedup::{DedupOptions, Deduplicator, Digest, ReadErrorPolicy, unique_digest};
pub use error::{ScanError, ScanResult};
pub use media_category::{MediaExtensions, MediaKind};
pub use pipeline::{ClassifiedFile, MediaScanner, ScanReport, classify};
pub use traversal::list_all;
