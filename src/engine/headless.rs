use std::collections::VecDeque;

use log::{debug, warn};

use super::{EngineEvent, MediaEngine};
use crate::error::EngineError;
use crate::models::{PlaybackState, TrackMetadata, TrackRef};

/// Media engine without audio output.
///
/// Tracks transport state the way a real engine would and queues the
/// matching notifications. Time only moves through [`HeadlessEngine::simulate_progress`].
#[derive(Debug)]
pub struct HeadlessEngine {
    media: Option<TrackRef>,
    state: PlaybackState,
    volume: u8,
    muted: bool,
    position_ms: u64,
    duration_ms: u64,
    metadata: TrackMetadata,
    events: VecDeque<EngineEvent>,
}

impl HeadlessEngine {
    pub fn new(volume: u8) -> Self {
        Self {
            media: None,
            state: PlaybackState::Stopped,
            volume: volume.min(100),
            muted: false,
            position_ms: 0,
            duration_ms: 0,
            metadata: TrackMetadata::default(),
            events: VecDeque::new(),
        }
    }

    pub fn media(&self) -> Option<&TrackRef> {
        self.media.as_ref()
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!("Engine state {} -> {}", self.state.as_str(), state.as_str());
            self.state = state;
            self.events.push_back(EngineEvent::StateChanged(state));
        }
    }

    fn set_position_internal(&mut self, position_ms: u64) {
        if self.position_ms != position_ms {
            self.position_ms = position_ms;
            self.events.push_back(EngineEvent::PositionChanged(position_ms));
        }
    }

    /// Pretend the engine has read the media and found the given duration
    pub fn simulate_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
        self.events.push_back(EngineEvent::DurationChanged(duration_ms));
    }

    pub fn simulate_metadata(&mut self, metadata: TrackMetadata) {
        self.metadata = metadata.clone();
        self.events.push_back(EngineEvent::MetadataChanged(metadata));
    }

    pub fn simulate_error(&mut self, message: &str) {
        warn!("Engine error: {}", message);
        self.events.push_back(EngineEvent::Error(message.to_string()));
    }

    /// Let playback time pass. Reaching the duration emits `EndOfMedia`.
    pub fn simulate_progress(&mut self, elapsed_ms: u64) {
        if self.state != PlaybackState::Playing {
            return;
        }

        let mut position = self.position_ms.saturating_add(elapsed_ms);
        let finished = self.duration_ms > 0 && position >= self.duration_ms;
        if finished {
            position = self.duration_ms;
        }

        self.set_position_internal(position);
        if finished {
            self.events.push_back(EngineEvent::EndOfMedia);
        }
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new(100)
    }
}

impl MediaEngine for HeadlessEngine {
    fn load(&mut self, track: Option<&TrackRef>) -> Result<(), EngineError> {
        match track {
            None => {
                self.stop()?;
                self.media = None;
            }
            Some(TrackRef::Unresolved(raw)) => {
                return Err(EngineError::OpenFailed { locator: raw.clone() });
            }
            Some(track) => {
                debug!("Engine loading {}", track);
                self.media = Some(track.clone());
                self.set_position_internal(0);
                self.duration_ms = 0;
                self.events.push_back(EngineEvent::DurationChanged(0));
                self.metadata = TrackMetadata {
                    title: Some(track.display_name()),
                    album_artist: None,
                };
                self.events.push_back(EngineEvent::MetadataChanged(self.metadata.clone()));
            }
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        if self.media.is_none() {
            return Err(EngineError::NoMedia);
        }
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        if self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        if self.state != PlaybackState::Stopped {
            self.set_state(PlaybackState::Stopped);
            self.set_position_internal(0);
        }
        Ok(())
    }

    fn set_position(&mut self, position_ms: u64) -> Result<(), EngineError> {
        if self.media.is_none() {
            return Err(EngineError::NoMedia);
        }
        if self.duration_ms > 0 && position_ms > self.duration_ms {
            return Err(EngineError::InvalidSeekPosition {
                position_ms,
                duration_ms: self.duration_ms,
            });
        }
        self.set_position_internal(position_ms);
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(100);
        if self.volume != volume {
            self.volume = volume;
            self.events.push_back(EngineEvent::VolumeChanged(volume));
        }
    }

    fn set_muted(&mut self, muted: bool) {
        if self.muted != muted {
            self.muted = muted;
            self.events.push_back(EngineEvent::MutedChanged(muted));
        }
    }

    fn state(&self) -> PlaybackState {
        self.state
    }

    fn volume(&self) -> u8 {
        self.volume
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn position(&self) -> u64 {
        self.position_ms
    }

    fn duration(&self) -> u64 {
        self.duration_ms
    }

    fn metadata(&self) -> TrackMetadata {
        self.metadata.clone()
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.events.pop_front()
    }
}
