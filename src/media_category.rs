/// Media classification by file extension.
///
/// This module decides whether a path names a picture or a video, using a
/// configurable set of extensions for each kind. Matching ignores case and is
/// done on the extension including its leading dot.
///
/// # Examples
///
/// ```
/// use mediatidy::media_category::{MediaExtensions, MediaKind};
/// use std::path::Path;
///
/// let extensions = MediaExtensions::default();
/// assert_eq!(extensions.kind_of(Path::new("IMG_0001.JPG")), Some(MediaKind::Picture));
/// assert_eq!(extensions.kind_of(Path::new("clip.mkv")), Some(MediaKind::Video));
/// assert_eq!(extensions.kind_of(Path::new("notes.txt")), None);
/// ```
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Picture extensions recognised when no configuration overrides them.
pub const DEFAULT_PICTURE_EXTENSIONS: &[&str] = &[
    ".bmp", ".gif", ".jpg", ".jpeg", ".png", ".webp", ".heic", ".heif", ".avif",
];

/// Video extensions recognised when no configuration overrides them.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &[".3gp", ".mp4", ".mkv", ".webm"];

/// The kind of media a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still images (JPEG, PNG, HEIC, etc.)
    Picture,
    /// Video clips (MP4, MKV, WEBM, etc.)
    Video,
}

impl MediaKind {
    /// Returns a lowercase label used in reports.
    ///
    /// ```
    /// use mediatidy::media_category::MediaKind;
    ///
    /// assert_eq!(MediaKind::Picture.label(), "picture");
    /// assert_eq!(MediaKind::Video.label(), "video");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Picture => "picture",
            MediaKind::Video => "video",
        }
    }
}

/// The picture and video extension sets used to recognise media files.
///
/// Extensions are normalised on insert: lowercased, with a leading dot.
#[derive(Debug, Clone)]
pub struct MediaExtensions {
    pictures: HashSet<String>,
    videos: HashSet<String>,
}

impl MediaExtensions {
    /// Creates a `MediaExtensions` with no recognised extensions.
    pub fn empty() -> Self {
        Self {
            pictures: HashSet::new(),
            videos: HashSet::new(),
        }
    }

    /// Creates a `MediaExtensions` from explicit picture and video lists.
    pub fn new<P, V>(pictures: P, videos: V) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let mut extensions = Self::empty();
        for ext in pictures {
            extensions.add_picture_extension(ext.as_ref());
        }
        for ext in videos {
            extensions.add_video_extension(ext.as_ref());
        }
        extensions
    }

    /// Adds an extension to the picture set.
    pub fn add_picture_extension(&mut self, ext: &str) {
        self.pictures.insert(normalize_extension(ext));
    }

    /// Adds an extension to the video set.
    pub fn add_video_extension(&mut self, ext: &str) {
        self.videos.insert(normalize_extension(ext));
    }

    /// Returns true if `ext` is a recognised picture extension.
    pub fn is_picture_extension(&self, ext: &str) -> bool {
        self.pictures.contains(&normalize_extension(ext))
    }

    /// Returns true if `ext` is a recognised video extension.
    pub fn is_video_extension(&self, ext: &str) -> bool {
        self.videos.contains(&normalize_extension(ext))
    }

    /// Maps a path to its media kind using the extension of its file name.
    ///
    /// Pictures take precedence if an extension was added to both sets.
    /// Paths without an extension are never media.
    pub fn kind_of(&self, path: &Path) -> Option<MediaKind> {
        let ext = extension_with_dot(path)?;

        if self.pictures.contains(&ext) {
            Some(MediaKind::Picture)
        } else if self.videos.contains(&ext) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Returns the paths that name a picture or a video, in their original order.
    ///
    /// No filesystem access is made; only the file name is inspected.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediatidy::media_category::MediaExtensions;
    /// use std::path::PathBuf;
    ///
    /// let paths = ["a.JPG", "b.txt", "c.mp4", "d.unknown"].map(PathBuf::from);
    /// let media = MediaExtensions::default().filter_media(&paths);
    /// assert_eq!(media, vec![PathBuf::from("a.JPG"), PathBuf::from("c.mp4")]);
    /// ```
    pub fn filter_media<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<PathBuf> {
        self.media_kinds(paths)
            .into_iter()
            .map(|(path, _)| path)
            .collect()
    }

    /// Like [`filter_media`](Self::filter_media), pairing each kept path with its kind.
    pub fn media_kinds<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<(PathBuf, MediaKind)> {
        paths
            .iter()
            .filter_map(|path| {
                let path = path.as_ref();
                self.kind_of(path).map(|kind| (path.to_path_buf(), kind))
            })
            .collect()
    }

    /// Alias of [`filter_media`](Self::filter_media).
    ///
    /// Despite the name, videos are kept as well as pictures.
    pub fn filter_pictures<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<PathBuf> {
        self.filter_media(paths)
    }
}

impl Default for MediaExtensions {
    fn default() -> Self {
        Self::new(DEFAULT_PICTURE_EXTENSIONS, DEFAULT_VIDEO_EXTENSIONS)
    }
}

/// Lowercases an extension and makes sure it starts with a dot.
fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Extracts the lowercased extension of a path's file name, dot included.
fn extension_with_dot(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy();
    Some(format!(".{}", ext.to_lowercase()))
}
