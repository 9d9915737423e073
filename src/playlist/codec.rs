//! Simple Playlist Format (SPF) encoding, plus read-only M3U import.
//!
//! An SPF file is UTF-8 text: the header line `Simple Playlist Format 1.0`
//! followed by one locator per line. Local files are written as their full
//! absolute path.

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::error::CodecError;
use crate::models::{absolute_path, classify, TrackRef};

/// First line of every SPF file
pub const SPF_HEADER: &str = "Simple Playlist Format 1.0";

const BOM: char = '\u{feff}';

/// Supported playlist formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaylistFormat {
    Spf,
    M3u,
}

impl PlaylistFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            PlaylistFormat::Spf => "spf",
            PlaylistFormat::M3u => "m3u",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "spf" => Some(PlaylistFormat::Spf),
            "m3u" | "m3u8" => Some(PlaylistFormat::M3u),
            _ => None,
        }
    }

    /// Detect format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

pub fn is_m3u(path: &Path) -> bool {
    PlaylistFormat::from_path(path) == Some(PlaylistFormat::M3u)
}

/// Serialize tracks to SPF text, one newline-terminated line per track.
///
/// A locator containing a line break, or a local path that is not valid
/// UTF-8, cannot be represented and is skipped.
pub fn encode(tracks: &[TrackRef]) -> String {
    let mut out = String::with_capacity(SPF_HEADER.len() + 1 + tracks.len() * 64);
    out.push_str(SPF_HEADER);
    out.push('\n');

    for track in tracks {
        if let TrackRef::LocalFile(path) = track {
            if path.to_str().is_none() {
                warn!("Skipping path that is not valid UTF-8: {}", path.display());
                continue;
            }
        }
        let locator = track.locator();
        if locator.contains(['\n', '\r']) {
            warn!("Skipping locator with line break: {:?}", locator);
            continue;
        }
        out.push_str(&locator);
        out.push('\n');
    }

    out
}

/// Parse SPF text into tracks.
///
/// Fails only when the header line is missing or wrong. Lines that do not
/// resolve to an existing file or a valid URI are dropped.
pub fn decode(text: &str) -> Result<Vec<TrackRef>, CodecError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut lines = text.lines().map(|line| line.trim_end_matches('\r'));

    match lines.next() {
        Some(header) if header == SPF_HEADER => {}
        other => {
            return Err(CodecError::InvalidHeader {
                found: other.map(str::to_string),
            })
        }
    }

    let mut tracks = Vec::new();
    for line in lines {
        match classify(line) {
            TrackRef::Unresolved(raw) => debug!("Dropping unresolvable playlist line: {:?}", raw),
            track => tracks.push(track),
        }
    }

    Ok(tracks)
}

/// Load an SPF file
pub fn read_file(path: &Path) -> Result<Vec<TrackRef>, CodecError> {
    let text = fs::read_to_string(path)?;
    let tracks = decode(&text)?;
    info!("Loaded {} tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}

/// Save tracks as an SPF file.
///
/// The text goes to a sibling temporary file first and is renamed over the
/// target, so an existing playlist is never left half written. An existing
/// symlink is followed and the file it points at is replaced.
pub fn write_file(path: &Path, tracks: &[TrackRef]) -> Result<(), CodecError> {
    let target = if path.exists() {
        fs::canonicalize(path)?
    } else {
        path.to_path_buf()
    };
    let mut tmp_name = target.file_name().map(OsString::from).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = target.with_file_name(tmp_name);

    fs::write(&tmp_path, encode(tracks))?;
    if let Err(e) = fs::rename(&tmp_path, &target) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    info!("Saved {} tracks to {}", tracks.len(), path.display());
    Ok(())
}

/// Parse M3U text. Comment lines are skipped; relative entries resolve
/// against `base_dir`.
pub fn decode_m3u(text: &str, base_dir: &Path) -> Vec<TrackRef> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut tracks = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let candidate = Path::new(line);
        let joined = base_dir.join(candidate);
        let track = if candidate.is_relative() && joined.exists() {
            TrackRef::LocalFile(absolute_path(&joined))
        } else {
            classify(line)
        };

        match track {
            TrackRef::Unresolved(raw) => debug!("Dropping unresolvable M3U entry: {:?}", raw),
            track => tracks.push(track),
        }
    }

    tracks
}

/// Load an M3U file
pub fn read_m3u(path: &Path) -> Result<Vec<TrackRef>, CodecError> {
    let text = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(decode_m3u(&text, base_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_audio_file(dir: &Path, name: &str) -> PathBuf {
        let file_path = dir.join(name);
        fs::write(&file_path, b"dummy audio data").unwrap();
        file_path
    }

    #[test]
    fn test_playlist_format_extension() {
        assert_eq!(PlaylistFormat::Spf.extension(), "spf");
        assert_eq!(PlaylistFormat::M3u.extension(), "m3u");
    }

    #[test]
    fn test_playlist_format_from_extension() {
        assert_eq!(PlaylistFormat::from_extension("spf"), Some(PlaylistFormat::Spf));
        assert_eq!(PlaylistFormat::from_extension("SPF"), Some(PlaylistFormat::Spf));
        assert_eq!(PlaylistFormat::from_extension("m3u8"), Some(PlaylistFormat::M3u));
        assert_eq!(PlaylistFormat::from_extension("pls"), None);
        assert_eq!(PlaylistFormat::from_extension(""), None);
        assert!(is_m3u(Path::new("/music/list.M3U")));
        assert!(!is_m3u(Path::new("/music/song.mp3")));
    }

    #[test]
    fn test_encode_writes_full_absolute_paths() {
        let tracks = vec![
            TrackRef::local("/music/one.flac"),
            classify("http://example.com/two.mp3"),
        ];

        let text = encode(&tracks);
        assert_eq!(
            text,
            "Simple Playlist Format 1.0\n/music/one.flac\nhttp://example.com/two.mp3\n"
        );
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]), "Simple Playlist Format 1.0\n");
    }

    #[test]
    fn test_encode_skips_line_breaks() {
        let tracks = vec![
            TrackRef::Unresolved("bad\nname".to_string()),
            TrackRef::local("/music/ok.mp3"),
        ];
        assert_eq!(encode(&tracks), "Simple Playlist Format 1.0\n/music/ok.mp3\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_encode_skips_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tracks = vec![
            TrackRef::LocalFile(PathBuf::from(OsStr::from_bytes(b"/music/\xff.mp3"))),
            TrackRef::local("/music/ok.mp3"),
        ];
        assert_eq!(encode(&tracks), "Simple Playlist Format 1.0\n/music/ok.mp3\n");
    }

    #[test]
    fn test_decode_empty_input_is_invalid() {
        match decode("") {
            Err(CodecError::InvalidHeader { found }) => assert_eq!(found, None),
            other => panic!("Expected InvalidHeader, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_wrong_header_is_invalid() {
        match decode("not the right header\n") {
            Err(CodecError::InvalidHeader { found }) => {
                assert_eq!(found.as_deref(), Some("not the right header"));
            }
            other => panic!("Expected InvalidHeader, got {:?}", other),
        }

        assert!(decode("Simple Playlist Format 1.1\n").is_err());
        assert!(decode(" Simple Playlist Format 1.0\n").is_err());
    }

    #[test]
    fn test_decode_header_only() {
        assert_eq!(decode("Simple Playlist Format 1.0\n").unwrap(), vec![]);
        assert_eq!(decode("Simple Playlist Format 1.0").unwrap(), vec![]);
    }

    #[test]
    fn test_decode_tolerates_bom_and_crlf() {
        let tracks = decode("\u{feff}Simple Playlist Format 1.0\r\nhttp://example.com/a.mp3\r\n").unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].locator(), "http://example.com/a.mp3");
    }

    #[test]
    fn test_decode_drops_unresolvable_lines() {
        let temp_dir = TempDir::new().unwrap();
        let real = create_test_audio_file(temp_dir.path(), "real.mp3");
        let text = format!(
            "{}\n{}\n\n/does/not/exist\nhttp://example.com/a.mp3\n",
            SPF_HEADER,
            real.display()
        );

        let tracks = decode(&text).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0], TrackRef::LocalFile(real));
        assert_eq!(tracks[1].locator(), "http://example.com/a.mp3");
    }

    #[test]
    fn test_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let first = create_test_audio_file(temp_dir.path(), "first.flac");
        let second = create_test_audio_file(temp_dir.path(), "second track.ogg");
        let tracks = vec![
            TrackRef::LocalFile(first.clone()),
            classify("https://radio.example.org/live?bitrate=320"),
            TrackRef::LocalFile(second),
            TrackRef::LocalFile(first),
        ];

        assert_eq!(decode(&encode(&tracks)).unwrap(), tracks);
    }

    #[test]
    fn test_write_and_read_file() {
        let temp_dir = TempDir::new().unwrap();
        let song = create_test_audio_file(temp_dir.path(), "song.mp3");
        let playlist_path = temp_dir.path().join("mix.spf");
        let tracks = vec![TrackRef::LocalFile(song), classify("http://example.com/s")];

        write_file(&playlist_path, &tracks).unwrap();

        let content = fs::read_to_string(&playlist_path).unwrap();
        assert!(content.starts_with("Simple Playlist Format 1.0\n"));
        assert!(!temp_dir.path().join("mix.spf.tmp").exists());
        assert_eq!(read_file(&playlist_path).unwrap(), tracks);
    }

    #[test]
    fn test_write_file_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let playlist_path = temp_dir.path().join("mix.spf");
        fs::write(&playlist_path, "old content that is much longer than the new one\n").unwrap();

        write_file(&playlist_path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&playlist_path).unwrap(), "Simple Playlist Format 1.0\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_keeps_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let real_dir = temp_dir.path().join("shared");
        fs::create_dir(&real_dir).unwrap();
        let real = real_dir.join("mix.spf");
        fs::write(&real, "Simple Playlist Format 1.0\n").unwrap();
        let link = temp_dir.path().join("mix.spf");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_file(&link, &[classify("http://example.com/a.mp3")]).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(
            fs::read_to_string(&real).unwrap(),
            "Simple Playlist Format 1.0\nhttp://example.com/a.mp3\n"
        );
        assert!(!real_dir.join("mix.spf.tmp").exists());
    }

    #[test]
    fn test_write_file_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let playlist_path = temp_dir.path().join("missing").join("mix.spf");

        match write_file(&playlist_path, &[]) {
            Err(CodecError::Io(_)) => {}
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            read_file(&temp_dir.path().join("nope.spf")),
            Err(CodecError::Io(_))
        ));
    }

    #[test]
    fn test_read_file_with_invalid_header() {
        let temp_dir = TempDir::new().unwrap();
        let playlist_path = temp_dir.path().join("list.spf");
        fs::write(&playlist_path, "#EXTM3U\n/music/a.mp3\n").unwrap();

        assert!(matches!(
            read_file(&playlist_path),
            Err(CodecError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_decode_m3u() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("album");
        fs::create_dir(&sub).unwrap();
        let song = create_test_audio_file(&sub, "01.flac");
        let absolute = create_test_audio_file(temp_dir.path(), "abs.mp3");

        let text = format!(
            "#EXTM3U\n#EXTINF:180,Artist - Title\nalbum/01.flac\n\n{}\nmissing.mp3\nhttp://example.com/x.mp3\n",
            absolute.display()
        );
        let tracks = decode_m3u(&text, temp_dir.path());

        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0], TrackRef::LocalFile(song));
        assert_eq!(tracks[1], TrackRef::LocalFile(absolute));
        assert_eq!(tracks[2].locator(), "http://example.com/x.mp3");
    }
}
