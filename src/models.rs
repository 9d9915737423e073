use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// A reference to one piece of playable media.
///
/// The variant is decided once, when the locator is first classified, and is
/// never re-evaluated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackRef {
    /// Existing local file, stored as an absolute path
    LocalFile(PathBuf),
    /// Syntactically valid URI (network stream, non-existing file URL, ...)
    Uri(Url),
    /// Locator that is neither an existing file nor a valid URI
    Unresolved(String),
}

impl TrackRef {
    /// Reference a local file without checking that it exists
    pub fn local(path: impl Into<PathBuf>) -> Self {
        TrackRef::LocalFile(absolute_path(&path.into()))
    }

    /// The locator string: absolute path, URL serialization or the raw text
    pub fn locator(&self) -> String {
        match self {
            TrackRef::LocalFile(path) => path.to_string_lossy().into_owned(),
            TrackRef::Uri(url) => url.as_str().to_string(),
            TrackRef::Unresolved(raw) => raw.clone(),
        }
    }

    pub fn is_local_file(&self) -> bool {
        matches!(self, TrackRef::LocalFile(_))
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, TrackRef::Unresolved(_))
    }

    /// Short name for track lists: file name, last URL segment, or raw text
    pub fn display_name(&self) -> String {
        match self {
            TrackRef::LocalFile(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
            TrackRef::Uri(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| url.as_str().to_string()),
            TrackRef::Unresolved(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.locator())
    }
}

/// Classify a user or file supplied locator.
///
/// Existing filesystem paths win over URI parsing, so a local file whose name
/// happens to look like a URL is still treated as a file. `file://` URLs that
/// point at an existing file are stored as local files.
pub fn classify(locator: &str) -> TrackRef {
    if locator.is_empty() {
        return TrackRef::Unresolved(String::new());
    }

    let path = Path::new(locator);
    if path.exists() {
        return TrackRef::LocalFile(absolute_path(path));
    }

    match Url::parse(locator) {
        Ok(url) => {
            if url.scheme() == "file" {
                if let Ok(path) = url.to_file_path() {
                    if path.exists() {
                        return TrackRef::LocalFile(path);
                    }
                }
            }
            TrackRef::Uri(url)
        }
        Err(_) => TrackRef::Unresolved(locator.to_string()),
    }
}

/// Make a path absolute relative to the working directory, without touching symlinks
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// How `advance` picks the next track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    #[default]
    Sequential,
    Loop,
    Random,
}

impl PlaybackMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackMode::Sequential => "sequential",
            PlaybackMode::Loop => "loop",
            PlaybackMode::Random => "random",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sequential" | "seq" => Some(PlaybackMode::Sequential),
            "loop" | "repeat" => Some(PlaybackMode::Loop),
            "random" | "shuffle" => Some(PlaybackMode::Random),
            _ => None,
        }
    }
}

/// Direction for `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Playback state as reported by the media engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }
}

/// Metadata the engine extracted for the current media
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub album_artist: Option<String>,
}
