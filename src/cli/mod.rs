use crate::models::PlaybackMode;
use crate::playlist::PlaylistFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod status;
pub use status::StatusDisplay;

/// Playlist player for Simple Playlist Format files
#[derive(Parser)]
#[command(name = "spfplay")]
#[command(about = "Manage and play Simple Playlist Format (.spf) playlists")]
#[command(version = "0.1.0")]
pub struct CliApp {
    /// Use this configuration file instead of the default one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// One-shot commands; without one the player starts interactively
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the tracks of a playlist file
    Show {
        /// Playlist file (.spf)
        file: String,
    },
    /// Append files or URLs to a playlist file, creating it if needed
    Add {
        /// Playlist file (.spf)
        file: String,
        /// Files, URLs or .m3u lists to append
        #[arg(required = true)]
        locators: Vec<String>,
    },
    /// Remove one track from a playlist file
    Remove {
        /// Playlist file (.spf)
        file: String,
        /// Track number as shown by `show` (starting at 1)
        index: usize,
    },
}

/// Commands understood by the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Play,
    Stop,
    Next,
    Prev,
    Mute,
    Volume(u8),
    /// Seek target in whole seconds
    Seek(u64),
    /// Zero-based row
    Select(usize),
    Add(String),
    /// Zero-based row
    Remove(usize),
    Move { from: usize, to: usize },
    Reset,
    Mode(PlaybackMode),
    Load(String),
    Save(String),
    List,
    Status,
    Exit,
}

impl CliApp {
    /// Parse command line arguments
    pub fn parse() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Expand tilde (~) in path to home directory
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            match dirs::home_dir() {
                Some(home_dir) => home_dir.join(rest),
                None => PathBuf::from(path),
            }
        } else if path == "~" {
            dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
        } else {
            PathBuf::from(path)
        }
    }

    /// Turn a playlist name into a file path.
    ///
    /// `~` is expanded, relative names are looked up in `playlist_dir`, and
    /// `.spf` is appended when the name has no extension.
    pub fn resolve_playlist_path(name: &str, playlist_dir: &Path) -> PathBuf {
        let mut path = Self::expand_path(name.trim());
        if path.is_relative() {
            path = playlist_dir.join(path);
        }
        if path.extension().is_none() {
            path.set_extension(PlaylistFormat::Spf.extension());
        }
        path
    }

    /// Parse command from string (for interactive mode)
    pub fn parse_command(input: &str) -> Result<ShellCommand, ParseError> {
        let args: Vec<&str> = input.split_whitespace().collect();
        if args.is_empty() {
            return Err(ParseError::EmptyCommand);
        }

        // Arguments that name files keep the user's spacing
        let rest = || {
            input
                .trim()
                .split_once(char::is_whitespace)
                .map(|(_, rest)| rest.trim_start().to_string())
                .unwrap_or_default()
        };

        match args[0] {
            "play" | "pause" => Ok(ShellCommand::Play),
            "stop" => Ok(ShellCommand::Stop),
            "next" => Ok(ShellCommand::Next),
            "prev" | "previous" => Ok(ShellCommand::Prev),
            "mute" => Ok(ShellCommand::Mute),
            "volume" | "vol" => {
                let value = Self::require(&args, "volume", "level")?;
                match value.parse::<u8>() {
                    Ok(level) if level <= 100 => Ok(ShellCommand::Volume(level)),
                    _ => Err(ParseError::InvalidArgument {
                        argument: "volume level".to_string(),
                        value: value.to_string(),
                        expected: "number 0-100".to_string(),
                    }),
                }
            }
            "seek" => {
                let value = Self::require(&args, "seek", "position")?;
                Ok(ShellCommand::Seek(Self::parse_time(value)?))
            }
            "select" => {
                let value = Self::require(&args, "select", "track number")?;
                Ok(ShellCommand::Select(Self::parse_row(value)?))
            }
            "add" => {
                Self::require(&args, "add", "file or URL")?;
                Ok(ShellCommand::Add(rest()))
            }
            "remove" | "rm" => {
                let value = Self::require(&args, "remove", "track number")?;
                Ok(ShellCommand::Remove(Self::parse_row(value)?))
            }
            "move" | "mv" => {
                let from = Self::require(&args, "move", "from")?;
                let to = args.get(2).ok_or_else(|| ParseError::MissingArgument {
                    command: "move".to_string(),
                    argument: "to".to_string(),
                })?;
                Ok(ShellCommand::Move {
                    from: Self::parse_row(from)?,
                    to: Self::parse_row(to)?,
                })
            }
            "reset" | "clear" => Ok(ShellCommand::Reset),
            "mode" => {
                let value = Self::require(&args, "mode", "playback mode")?;
                PlaybackMode::from_name(value)
                    .map(ShellCommand::Mode)
                    .ok_or_else(|| ParseError::InvalidArgument {
                        argument: "playback mode".to_string(),
                        value: value.to_string(),
                        expected: "sequential, loop or random".to_string(),
                    })
            }
            "load" | "open" => {
                Self::require(&args, "load", "playlist file")?;
                Ok(ShellCommand::Load(rest()))
            }
            "save" => {
                Self::require(&args, "save", "playlist file")?;
                Ok(ShellCommand::Save(rest()))
            }
            "list" | "ls" => Ok(ShellCommand::List),
            "status" => Ok(ShellCommand::Status),
            "exit" | "quit" => Ok(ShellCommand::Exit),
            "help" => Err(ParseError::HelpRequested),
            _ => Err(ParseError::UnknownCommand {
                command: args[0].to_string(),
            }),
        }
    }

    fn require<'a>(args: &[&'a str], command: &str, argument: &str) -> Result<&'a str, ParseError> {
        args.get(1).copied().ok_or_else(|| ParseError::MissingArgument {
            command: command.to_string(),
            argument: argument.to_string(),
        })
    }

    /// Parse a 1-based track number into a zero-based row
    pub fn parse_row(value: &str) -> Result<usize, ParseError> {
        match value.parse::<usize>() {
            Ok(number) if number >= 1 => Ok(number - 1),
            _ => Err(ParseError::InvalidArgument {
                argument: "track number".to_string(),
                value: value.to_string(),
                expected: "a number starting at 1".to_string(),
            }),
        }
    }

    /// Parse "90", "90s" or "1:30" into whole seconds
    pub fn parse_time(time_str: &str) -> Result<u64, ParseError> {
        let trimmed = time_str.trim();
        let invalid = || ParseError::InvalidTimeFormat {
            input: time_str.to_string(),
        };

        if let Some((minutes, seconds)) = trimmed.split_once(':') {
            let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
            let seconds: u64 = seconds.parse().map_err(|_| invalid())?;
            if seconds >= 60 {
                return Err(invalid());
            }
            minutes
                .checked_mul(60)
                .and_then(|minutes| minutes.checked_add(seconds))
                .ok_or_else(invalid)
        } else {
            trimmed.trim_end_matches('s').parse().map_err(|_| invalid())
        }
    }

    /// Display help information
    pub fn display_help() {
        println!("SPF Player - Available Commands:");
        println!();
        println!("Playback Control:");
        println!("  play               - Play, or pause while playing");
        println!("  stop               - Stop playback");
        println!("  next               - Next track");
        println!("  prev               - Previous track");
        println!("  seek <time>        - Seek to position (e.g. '90', '1:30')");
        println!("  volume <0-100>     - Set volume (0 mutes)");
        println!("  mute               - Toggle mute");
        println!();
        println!("Playlist:");
        println!("  list               - Show the playlist");
        println!("  select <n>         - Jump to track n");
        println!("  add <file|url>     - Append a file, URL or .m3u list");
        println!("  remove <n>         - Remove track n");
        println!("  move <from> <to>   - Move a track");
        println!("  reset              - Stop and empty the playlist");
        println!("  mode <mode>        - sequential, loop or random");
        println!("  load <name>        - Append tracks from a .spf file");
        println!("  save <name>        - Save the playlist as a .spf file");
        println!();
        println!("General:");
        println!("  status             - Show player status");
        println!("  help               - Show this help message");
        println!("  exit, quit         - Exit the player");
    }
}

/// Command parsing errors
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Unknown command: {command}")]
    UnknownCommand { command: String },

    #[error("Missing argument for {command}: {argument}")]
    MissingArgument { command: String, argument: String },

    #[error("Invalid argument {argument}: got '{value}', expected {expected}")]
    InvalidArgument {
        argument: String,
        value: String,
        expected: String,
    },

    #[error("Invalid time format: {input}")]
    InvalidTimeFormat { input: String },

    #[error("Help requested")]
    HelpRequested,
}
