use thiserror::Error;

/// Main player error type
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Playlist error: {0}")]
    Playlist(#[from] PlaylistError),

    #[error("Playlist file error: {0}")]
    Codec(#[from] CodecError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("Command parse error: {0}")]
    Parse(#[from] crate::cli::ParseError),
}

impl PlayerError {
    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            PlayerError::Playlist(err) => err.user_message(),
            PlayerError::Codec(err) => err.user_message(),
            PlayerError::Engine(err) => err.user_message(),
            PlayerError::Config(err) => err.user_message(),
            PlayerError::File(err) => Self::format_file_error(err),
            PlayerError::Parse(err) => format!("Command error: {}", err),
        }
    }

    /// Get suggested recovery actions for the error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PlayerError::Playlist(err) => err.recovery_suggestions(),
            PlayerError::Codec(err) => err.recovery_suggestions(),
            PlayerError::Engine(err) => err.recovery_suggestions(),
            PlayerError::Config(err) => err.recovery_suggestions(),
            PlayerError::File(_) => vec!["Check that the path is correct and readable".to_string()],
            PlayerError::Parse(_) => vec!["Type 'help' to see available commands".to_string()],
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            PlayerError::Playlist(err) => err.is_recoverable(),
            PlayerError::Codec(err) => err.is_recoverable(),
            PlayerError::Engine(err) => err.is_recoverable(),
            PlayerError::Config(err) => err.is_recoverable(),
            PlayerError::File(_) => false,
            PlayerError::Parse(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PlayerError::Playlist(PlaylistError::EmptyPlaylist) => ErrorSeverity::Info,
            PlayerError::Playlist(_) => ErrorSeverity::Warning,
            PlayerError::Codec(CodecError::InvalidHeader { .. }) => ErrorSeverity::Warning,
            PlayerError::Codec(_) => ErrorSeverity::Error,
            PlayerError::Engine(_) => ErrorSeverity::Error,
            PlayerError::Config(_) => ErrorSeverity::Warning,
            PlayerError::File(_) => ErrorSeverity::Error,
            PlayerError::Parse(_) => ErrorSeverity::Info,
        }
    }

    fn format_file_error(err: &std::io::Error) -> String {
        match err.kind() {
            std::io::ErrorKind::NotFound => "File or directory not found".to_string(),
            std::io::ErrorKind::PermissionDenied => "Permission denied - cannot access file".to_string(),
            _ => format!("File system error: {}", err),
        }
    }
}

/// Error severity levels for logging and user feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "INFO",
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Error => "ERROR",
        }
    }

    pub fn log_level(&self) -> log::Level {
        match self {
            ErrorSeverity::Info => log::Level::Info,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error => log::Level::Error,
        }
    }
}

/// Playlist mutation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("Index {index} out of range for playlist of {len} tracks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Playlist is empty")]
    EmptyPlaylist,
}

impl PlaylistError {
    pub fn user_message(&self) -> String {
        match self {
            PlaylistError::IndexOutOfRange { index, len } => {
                format!("Track number {} is not valid for a playlist of {} tracks", index + 1, len)
            }
            PlaylistError::EmptyPlaylist => {
                "No tracks in playlist - add some files first".to_string()
            }
        }
    }

    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PlaylistError::IndexOutOfRange { .. } => vec![
                "Use 'list' to see available tracks".to_string(),
                "Track numbers start from 1".to_string(),
            ],
            PlaylistError::EmptyPlaylist => vec![
                "Use 'add <path-or-url>' to add tracks".to_string(),
                "Use 'load <file.spf>' to load a saved playlist".to_string(),
            ],
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            PlaylistError::IndexOutOfRange { .. } => false, // Requires valid index
            PlaylistError::EmptyPlaylist => true, // Can add tracks
        }
    }
}

/// Simple Playlist Format read/write errors
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid playlist header: {}", .found.as_deref().unwrap_or("<missing>"))]
    InvalidHeader { found: Option<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub fn user_message(&self) -> String {
        match self {
            CodecError::InvalidHeader { .. } => {
                "The selected file is not a valid SPF file.".to_string()
            }
            CodecError::Io(err) => {
                format!("An error occurred while accessing the playlist: {}", err)
            }
        }
    }

    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            CodecError::InvalidHeader { .. } => vec![
                format!("The first line must read '{}'", crate::playlist::codec::SPF_HEADER),
                "Check that the file was saved by this player".to_string(),
            ],
            CodecError::Io(_) => vec![
                "Check that the playlist path is correct".to_string(),
                "Check file and directory permissions".to_string(),
            ],
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            CodecError::InvalidHeader { .. } => false,
            CodecError::Io(_) => true, // Can retry with another path
        }
    }
}

/// Errors reported by a media engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("No media loaded")]
    NoMedia,

    #[error("Cannot open media: {locator}")]
    OpenFailed { locator: String },

    #[error("Seek position {position_ms}ms exceeds duration {duration_ms}ms")]
    InvalidSeekPosition { position_ms: u64, duration_ms: u64 },
}

impl EngineError {
    pub fn user_message(&self) -> String {
        match self {
            EngineError::NoMedia => "Nothing to play - select a track first".to_string(),
            EngineError::OpenFailed { locator } => format!("Cannot play '{}'", locator),
            EngineError::InvalidSeekPosition { position_ms, duration_ms } => format!(
                "Cannot seek to {:.1}s - track is only {:.1}s long",
                *position_ms as f64 / 1000.0,
                *duration_ms as f64 / 1000.0
            ),
        }
    }

    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            EngineError::NoMedia => vec![
                "Use 'select <n>' to choose a track".to_string(),
            ],
            EngineError::OpenFailed { .. } => vec![
                "Check that the file still exists".to_string(),
                "Remove the track with 'remove <n>'".to_string(),
            ],
            EngineError::InvalidSeekPosition { duration_ms, .. } => vec![
                format!("Use a position between 0 and {} seconds", duration_ms / 1000),
            ],
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::NoMedia)
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    ConfigDirNotFound,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::ConfigDirNotFound => {
                "Cannot find or create configuration directory".to_string()
            }
            ConfigError::IoError(err) => {
                format!("Cannot access configuration file: {}", err)
            }
            ConfigError::SerializationError(_) => {
                "Failed to save configuration settings".to_string()
            }
            ConfigError::DeserializationError(_) => {
                "Configuration file is corrupted or has invalid format".to_string()
            }
        }
    }

    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ConfigError::ConfigDirNotFound => vec![
                "Check that you have write permissions to your home directory".to_string(),
            ],
            ConfigError::IoError(_) => vec![
                "Check file permissions for the configuration directory".to_string(),
            ],
            ConfigError::SerializationError(_) => vec![
                "Try resetting configuration to defaults".to_string(),
            ],
            ConfigError::DeserializationError(_) => vec![
                "Delete the configuration file to reset to defaults".to_string(),
            ],
        }
    }

    pub fn is_recoverable(&self) -> bool {
        true // Defaults are always available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_message_is_one_based() {
        let err = PlaylistError::IndexOutOfRange { index: 4, len: 3 };
        assert!(err.user_message().contains("Track number 5"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_invalid_header_display() {
        let err = CodecError::InvalidHeader { found: Some("#EXTM3U".to_string()) };
        assert_eq!(err.to_string(), "Invalid playlist header: #EXTM3U");

        let err = CodecError::InvalidHeader { found: None };
        assert_eq!(err.to_string(), "Invalid playlist header: <missing>");
    }

    #[test]
    fn test_severity_mapping() {
        let empty: PlayerError = PlaylistError::EmptyPlaylist.into();
        assert_eq!(empty.severity(), ErrorSeverity::Info);
        assert_eq!(empty.severity().log_level(), log::Level::Info);

        let header: PlayerError = CodecError::InvalidHeader { found: None }.into();
        assert_eq!(header.severity(), ErrorSeverity::Warning);
        assert_eq!(header.severity().as_str(), "WARNING");

        let engine: PlayerError = EngineError::NoMedia.into();
        assert_eq!(engine.severity(), ErrorSeverity::Error);
        assert!(engine.is_recoverable());
    }

    #[test]
    fn test_recovery_suggestions_not_empty() {
        let errors: Vec<PlayerError> = vec![
            PlaylistError::EmptyPlaylist.into(),
            PlaylistError::IndexOutOfRange { index: 0, len: 0 }.into(),
            CodecError::InvalidHeader { found: None }.into(),
            EngineError::OpenFailed { locator: "x".to_string() }.into(),
            ConfigError::ConfigDirNotFound.into(),
        ];

        for err in errors {
            assert!(!err.recovery_suggestions().is_empty(), "no suggestions for {}", err);
            assert!(!err.user_message().is_empty());
        }
    }
}
