pub mod headless;

use crate::error::EngineError;
use crate::models::{PlaybackState, TrackMetadata, TrackRef};

pub use headless::HeadlessEngine;

/// Notifications coming back from a media engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StateChanged(PlaybackState),
    /// Playback position in milliseconds
    PositionChanged(u64),
    /// Media duration in milliseconds
    DurationChanged(u64),
    VolumeChanged(u8),
    MutedChanged(bool),
    MetadataChanged(TrackMetadata),
    /// The loaded media played to its end
    EndOfMedia,
    Error(String),
}

/// Core trait for the media playback engine the player drives.
///
/// Decoding and output live behind this trait; the player only sends
/// commands and polls notifications on its own thread.
pub trait MediaEngine {
    /// Load media for playback, or unload with `None`
    fn load(&mut self, track: Option<&TrackRef>) -> Result<(), EngineError>;

    /// Start or resume playback of the loaded media
    fn play(&mut self) -> Result<(), EngineError>;

    /// Pause playback while preserving position
    fn pause(&mut self) -> Result<(), EngineError>;

    /// Stop playback and reset position
    fn stop(&mut self) -> Result<(), EngineError>;

    /// Seek to an absolute position in milliseconds
    fn set_position(&mut self, position_ms: u64) -> Result<(), EngineError>;

    /// Set the output volume (0 to 100)
    fn set_volume(&mut self, volume: u8);

    fn set_muted(&mut self, muted: bool);

    fn state(&self) -> PlaybackState;

    fn volume(&self) -> u8;

    fn is_muted(&self) -> bool;

    fn position(&self) -> u64;

    fn duration(&self) -> u64;

    fn metadata(&self) -> TrackMetadata;

    /// Next pending notification, oldest first
    fn poll_event(&mut self) -> Option<EngineEvent>;
}
