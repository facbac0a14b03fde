//! Media and deduplication configuration.
//!
//! This module loads the extension sets that decide what counts as a picture
//! or a video, together with the deduplication policy, from a TOML file.
//!
//! # Configuration File Format
//!
//! ```toml
//! [media]
//! pictures = [".jpg", ".png"]   # replaces the default picture set
//! videos = [".mp4"]             # replaces the default video set
//! extra_pictures = [".tiff"]    # added to the picture set
//! extra_videos = [".mov"]       # added to the video set
//!
//! [dedup]
//! parallel = false
//! on_read_error = "abort"       # or "skip"
//! ```
//!
//! Every table and key is optional.

use crate::dedup::DedupOptions;
use crate::media_category::{
    DEFAULT_PICTURE_EXTENSIONS, DEFAULT_VIDEO_EXTENSIONS, MediaExtensions,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".mediatidyrc.toml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// An extension entry is blank or is not a single extension.
    InvalidExtension(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidExtension(ext) => {
                write!(f, "Invalid extension '{}': expected e.g. \".jpg\"", ext)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Complete configuration as read from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub media: MediaRules,
    #[serde(default)]
    pub dedup: DedupOptions,
}

/// Extension rules for recognising media files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaRules {
    /// Replaces the default picture extensions when present.
    #[serde(default)]
    pub pictures: Option<Vec<String>>,

    /// Replaces the default video extensions when present.
    #[serde(default)]
    pub videos: Option<Vec<String>>,

    /// Picture extensions added on top of the base set.
    #[serde(default)]
    pub extra_pictures: Vec<String>,

    /// Video extensions added on top of the base set.
    #[serde(default)]
    pub extra_videos: Vec<String>,
}

impl MediaConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.mediatidyrc.toml` in the current directory
    /// 3. Look for `~/.config/mediatidy/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any file found is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("mediatidy")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        log::debug!("Loaded configuration from {}", path.display());

        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the extension sets described by the `[media]` table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidExtension` for blank entries and for
    /// entries such as `tar.gz` or `a/b` that are not a single extension.
    pub fn media_extensions(&self) -> Result<MediaExtensions, ConfigError> {
        let rules = &self.media;
        let all_entries = rules
            .pictures
            .iter()
            .flatten()
            .chain(rules.videos.iter().flatten())
            .chain(&rules.extra_pictures)
            .chain(&rules.extra_videos);
        for ext in all_entries {
            validate_extension(ext)?;
        }

        let mut extensions = MediaExtensions::empty();
        match &rules.pictures {
            Some(pictures) => pictures
                .iter()
                .for_each(|ext| extensions.add_picture_extension(ext)),
            None => DEFAULT_PICTURE_EXTENSIONS
                .iter()
                .for_each(|ext| extensions.add_picture_extension(ext)),
        }
        match &rules.videos {
            Some(videos) => videos
                .iter()
                .for_each(|ext| extensions.add_video_extension(ext)),
            None => DEFAULT_VIDEO_EXTENSIONS
                .iter()
                .for_each(|ext| extensions.add_video_extension(ext)),
        }

        for ext in &rules.extra_pictures {
            extensions.add_picture_extension(ext);
        }
        for ext in &rules.extra_videos {
            extensions.add_video_extension(ext);
        }

        Ok(extensions)
    }
}

fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    let bare = ext.trim().trim_start_matches('.');
    if bare.is_empty() || bare.contains(['/', '\\', '.']) {
        return Err(ConfigError::InvalidExtension(ext.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::ReadErrorPolicy;
    use crate::media_category::MediaKind;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = MediaConfig::default();
        assert_eq!(config.dedup, DedupOptions::default());
        assert_eq!(config.dedup.on_read_error, ReadErrorPolicy::Abort);
        assert!(!config.dedup.parallel);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = MediaConfig::from_toml("").unwrap();
        assert_eq!(config, MediaConfig::default());
    }

    #[test]
    fn test_default_extensions() {
        let extensions = MediaConfig::default().media_extensions().unwrap();
        assert_eq!(
            extensions.kind_of(Path::new("a.heic")),
            Some(MediaKind::Picture)
        );
        assert_eq!(
            extensions.kind_of(Path::new("a.mkv")),
            Some(MediaKind::Video)
        );
    }

    #[test]
    fn test_replace_pictures_keeps_default_videos() {
        let config = MediaConfig::from_toml(
            r#"
            [media]
            pictures = [".jpg"]
            "#,
        )
        .unwrap();
        let extensions = config.media_extensions().unwrap();

        assert_eq!(
            extensions.kind_of(Path::new("a.jpg")),
            Some(MediaKind::Picture)
        );
        assert_eq!(extensions.kind_of(Path::new("a.png")), None);
        assert_eq!(
            extensions.kind_of(Path::new("a.mp4")),
            Some(MediaKind::Video)
        );
    }

    #[test]
    fn test_extra_extensions() {
        let config = MediaConfig::from_toml(
            r#"
            [media]
            extra_pictures = ["TIFF"]
            extra_videos = [".mov"]
            "#,
        )
        .unwrap();
        let extensions = config.media_extensions().unwrap();

        assert_eq!(
            extensions.kind_of(Path::new("scan.tiff")),
            Some(MediaKind::Picture)
        );
        assert_eq!(
            extensions.kind_of(Path::new("clip.MOV")),
            Some(MediaKind::Video)
        );
        assert_eq!(
            extensions.kind_of(Path::new("a.png")),
            Some(MediaKind::Picture)
        );
    }

    #[test]
    fn test_dedup_table() {
        let config = MediaConfig::from_toml(
            r#"
            [dedup]
            parallel = true
            on_read_error = "skip"
            "#,
        )
        .unwrap();

        assert!(config.dedup.parallel);
        assert_eq!(config.dedup.on_read_error, ReadErrorPolicy::Skip);
    }

    #[test]
    fn test_invalid_policy_is_error() {
        let result = MediaConfig::from_toml(
            r#"
            [dedup]
            on_read_error = "ignore"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_blank_extension_is_error() {
        let config = MediaConfig::from_toml(
            r#"
            [media]
            extra_pictures = ["."]
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.media_extensions(),
            Err(ConfigError::InvalidExtension(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[media]\nvideos = [\".mov\"]\n").unwrap();

        let config = MediaConfig::load(Some(&path)).unwrap();
        assert_eq!(config.media.videos, Some(vec![".mov".to_string()]));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("missing.toml");

        assert!(matches!(
            MediaConfig::load(Some(&path)),
            Err(ConfigError::ConfigNotFound(_))
        ));
    }
}
