use crate::controller::{PlayerView, TransportIcon};
use crate::error::{ErrorSeverity, PlayerError};
use crate::models::{PlaybackState, TrackRef};
use crate::playlist::Playlist;

/// Status display formatter for the CLI
pub struct StatusDisplay;

impl StatusDisplay {
    /// Print the track list with the current track marked
    pub fn display_playlist(playlist: &Playlist) {
        for line in Self::playlist_lines(playlist) {
            println!("{}", line);
        }
    }

    /// Track list rows, 1-based, as shown by `list`
    pub fn playlist_lines(playlist: &Playlist) -> Vec<String> {
        if playlist.is_empty() {
            return vec!["Playlist is empty".to_string()];
        }

        let mut lines = Vec::with_capacity(playlist.len() + 1);
        lines.push(format!(
            "Playlist ({} tracks, {}):",
            playlist.len(),
            playlist.playback_mode().as_str()
        ));
        for (index, track) in playlist.items().iter().enumerate() {
            let is_current = playlist.current_index() == Some(index);
            lines.push(Self::format_track_row(index, track, is_current));
        }
        lines
    }

    pub fn format_track_row(index: usize, track: &TrackRef, is_current: bool) -> String {
        let marker = if is_current { ">" } else { " " };
        let kind = match track {
            TrackRef::LocalFile(_) => "file",
            TrackRef::Uri(_) => "url ",
            TrackRef::Unresolved(_) => "??? ",
        };
        format!(
            "{} {:>3}: [{}] {}  ({})",
            marker,
            index + 1,
            kind,
            Self::truncate(&track.display_name(), 40),
            Self::truncate(&track.locator(), 60)
        )
    }

    /// Print the transport area the way the window would show it
    pub fn display_status(view: &PlayerView, state: PlaybackState, playlist: &Playlist) {
        println!("┌─ {} ─────────────────────────────────────", view.window_title);
        println!("│ State: {}  [{}]", state.as_str(), Self::transport_label(view.play_button));
        println!("│ Time: {} / {}", view.current_time, view.total_time);
        println!(
            "│ Volume: {}{}",
            view.volume_display,
            if view.muted { " (muted)" } else { "" }
        );
        match playlist.current() {
            Some(track) => println!("│ Track: {}", Self::truncate(&track.locator(), 60)),
            None => println!("│ Track: none"),
        }
        println!("│ Mode: {}", playlist.playback_mode().as_str());
        if let Some(error) = &view.last_error {
            println!("│ Last error: {}", error);
        }
        println!("└──────────────────────────────────────────────────");
    }

    pub fn transport_label(icon: TransportIcon) -> &'static str {
        match icon {
            TransportIcon::Play => "▶ play",
            TransportIcon::Pause => "⏸ pause",
        }
    }

    /// Display error with severity, message and suggestions
    pub fn display_error(error: &PlayerError) {
        for line in Self::error_lines(error) {
            eprintln!("{}", line);
        }
    }

    /// The boxed error report printed by [`StatusDisplay::display_error`]
    pub fn error_lines(error: &PlayerError) -> Vec<String> {
        let severity = error.severity();
        let severity_icon = match severity {
            ErrorSeverity::Info => "ℹ",
            ErrorSeverity::Warning => "⚠",
            ErrorSeverity::Error => "✗",
        };

        let mut lines = vec![format!(
            "┌─ {} {} ─────────────────────────────────────────────────┐",
            severity_icon,
            severity.as_str()
        )];

        for line in Self::wrap_text(&error.user_message(), 55) {
            lines.push(format!("│ {}", line));
        }

        let suggestions = error.recovery_suggestions();
        if !suggestions.is_empty() {
            lines.push("│".to_string());
            lines.push("│ Suggestions:".to_string());
            for suggestion in suggestions.iter().take(3) {
                for line in Self::wrap_text(&format!("• {}", suggestion), 53) {
                    lines.push(format!("│   {}", line));
                }
            }
        }

        lines.push("│".to_string());
        lines.push(format!("│ {}", Self::recovery_note(error)));
        lines.push("└─────────────────────────────────────────────────────────┘".to_string());
        lines
    }

    pub fn recovery_note(error: &PlayerError) -> &'static str {
        if error.is_recoverable() {
            "The player state is unchanged; fix the input and try again."
        } else {
            "⚠ This error requires manual intervention to resolve."
        }
    }

    /// Wrap text on word boundaries
    pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }

        lines
    }

    /// Truncate string to fit display width
    pub fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", kept)
        }
    }
}
