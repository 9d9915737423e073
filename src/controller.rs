use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use chrono::NaiveTime;
use log::{debug, info, warn};

use crate::engine::{EngineEvent, MediaEngine};
use crate::error::PlayerError;
use crate::models::{Direction, PlaybackMode, PlaybackState, TrackRef};
use crate::playlist::{codec, Playlist, PlaylistEvent};

/// Window title shown when nothing is playing
pub const DEFAULT_TITLE: &str = "Media Player";

/// Placeholder for the time labels while stopped
pub const NO_TIME: &str = "--:--";

/// Icon shown on the play button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportIcon {
    Play,
    Pause,
}

/// Everything a front-end needs to render the transport area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub play_button: TransportIcon,
    pub muted: bool,
    pub volume_slider: u8,
    pub volume_display: u8,
    pub seek_enabled: bool,
    pub seek_max_secs: u64,
    pub seek_value_secs: u64,
    /// Set while the user drags the seek slider; position updates leave it alone
    pub seek_dragging: bool,
    pub current_time: String,
    pub total_time: String,
    pub window_title: String,
    pub selected_row: Option<usize>,
    pub last_error: Option<String>,
}

impl PlayerView {
    fn new(volume: u8, muted: bool) -> Self {
        let shown = if muted { 0 } else { volume };
        Self {
            play_button: TransportIcon::Play,
            muted,
            volume_slider: shown,
            volume_display: shown,
            seek_enabled: false,
            seek_max_secs: 0,
            seek_value_secs: 0,
            seek_dragging: false,
            current_time: NO_TIME.to_string(),
            total_time: NO_TIME.to_string(),
            window_title: DEFAULT_TITLE.to_string(),
            selected_row: None,
            last_error: None,
        }
    }
}

/// Format a position as `mm:ss`, or `hh:mm:ss` once the total reaches an hour
pub fn format_time(secs: u64, total_secs: u64) -> String {
    let format = if total_secs < 3600 { "%M:%S" } else { "%H:%M:%S" };
    match NaiveTime::from_num_seconds_from_midnight_opt((secs % 86_400) as u32, 0) {
        Some(time) => time.format(format).to_string(),
        None => NO_TIME.to_string(),
    }
}

/// Glue between user gestures, the playlist, and the media engine.
///
/// Every gesture runs to completion and then drains the pending playlist and
/// engine notifications, so the view is consistent when the call returns.
pub struct PlayerController<E: MediaEngine> {
    playlist: Playlist,
    engine: E,
    view: PlayerView,
    pending: Rc<RefCell<VecDeque<PlaylistEvent>>>,
    /// Track currently handed to the engine
    loaded: Option<TrackRef>,
    /// Reload even if the current track did not change (explicit navigation)
    force_reload: bool,
}

impl<E: MediaEngine> PlayerController<E> {
    pub fn new(mut playlist: Playlist, engine: E) -> Self {
        let pending = Rc::new(RefCell::new(VecDeque::new()));
        let sink = pending.clone();
        playlist.subscribe(move |event| sink.borrow_mut().push_back(event.clone()));

        let view = PlayerView::new(engine.volume(), engine.is_muted());
        let mut controller = Self {
            playlist,
            engine,
            view,
            pending,
            loaded: None,
            force_reload: false,
        };
        controller.view.selected_row = controller.playlist.current_index();
        controller
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Direct engine access; call [`PlayerController::process_events`] afterwards
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn view(&self) -> &PlayerView {
        &self.view
    }

    /// Play button: toggles between playing and paused
    pub fn play_clicked(&mut self) -> Result<(), PlayerError> {
        let result = if self.engine.state() == PlaybackState::Playing {
            self.engine.pause()
        } else {
            if self.playlist.current_index().is_none() && !self.playlist.is_empty() {
                self.playlist.set_current(0)?;
                self.process_events();
            }
            self.engine.play()
        };
        self.process_events();
        Ok(result?)
    }

    /// Stop button: only acts while playing
    pub fn stop_clicked(&mut self) -> Result<(), PlayerError> {
        if self.engine.state() == PlaybackState::Playing {
            self.view.play_button = TransportIcon::Play;
            self.engine.stop()?;
            self.view.window_title = DEFAULT_TITLE.to_string();
        }
        self.process_events();
        Ok(())
    }

    pub fn next_clicked(&mut self) -> Result<(), PlayerError> {
        self.navigate(Direction::Next)
    }

    pub fn previous_clicked(&mut self) -> Result<(), PlayerError> {
        self.navigate(Direction::Previous)
    }

    fn navigate(&mut self, direction: Direction) -> Result<(), PlayerError> {
        self.force_reload = true;
        let result = self.playlist.advance(direction);
        self.process_events();
        self.force_reload = false;
        result?;
        Ok(())
    }

    pub fn mute_clicked(&mut self) {
        let muted = self.engine.is_muted();
        self.engine.set_muted(!muted);
        self.process_events();
    }

    /// Volume slider: zero mutes, anything else unmutes and applies the level
    pub fn volume_changed(&mut self, volume: u8) {
        if volume == 0 {
            self.engine.set_muted(true);
        } else {
            self.engine.set_muted(false);
            self.engine.set_volume(volume);
        }
        self.process_events();
    }

    pub fn seek_pressed(&mut self) {
        self.view.seek_dragging = true;
    }

    pub fn seek_released(&mut self) {
        self.view.seek_dragging = false;
    }

    /// Seek slider moved, in whole seconds
    pub fn seek_moved(&mut self, secs: u64) -> Result<(), PlayerError> {
        let result = self.engine.set_position(secs.saturating_mul(1000));
        self.process_events();
        Ok(result?)
    }

    /// Track list row activated
    pub fn track_activated(&mut self, row: usize) -> Result<(), PlayerError> {
        self.force_reload = true;
        let result = self.playlist.set_current(row);
        self.process_events();
        self.force_reload = false;
        Ok(result?)
    }

    /// Reset button: stop playback and empty the playlist
    pub fn reset_playlist(&mut self) -> Result<(), PlayerError> {
        if matches!(self.engine.state(), PlaybackState::Playing | PlaybackState::Paused) {
            self.engine.stop()?;
        }
        self.playlist.clear();
        self.process_events();
        Ok(())
    }

    /// Add files or URLs by hand; returns how many tracks were added
    pub fn add_tracks<I, S>(&mut self, locators: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = self.playlist.append_many(locators);
        self.process_events();
        added
    }

    pub fn remove_track(&mut self, row: usize) -> Result<TrackRef, PlayerError> {
        let result = self.playlist.remove_at(row);
        self.process_events();
        Ok(result?)
    }

    pub fn move_track(&mut self, from: usize, to: usize) -> Result<(), PlayerError> {
        let result = self.playlist.move_item(from, to);
        self.process_events();
        Ok(result?)
    }

    pub fn set_playback_mode(&mut self, mode: PlaybackMode) {
        self.playlist.set_playback_mode(mode);
    }

    /// Append the tracks of an SPF file. Nothing changes if the file is invalid.
    pub fn load_playlist(&mut self, path: &Path) -> Result<usize, PlayerError> {
        let tracks = codec::read_file(path)?;
        let count = tracks.len();
        self.playlist.extend(tracks);
        self.process_events();
        Ok(count)
    }

    pub fn save_playlist(&self, path: &Path) -> Result<(), PlayerError> {
        codec::write_file(path, self.playlist.items())?;
        Ok(())
    }

    /// Drain playlist and engine notifications until both queues are empty
    pub fn process_events(&mut self) {
        loop {
            let playlist_event = self.pending.borrow_mut().pop_front();
            if let Some(event) = playlist_event {
                self.on_playlist_event(event);
                continue;
            }

            match self.engine.poll_event() {
                Some(event) => self.on_engine_event(event),
                None => break,
            }
        }
    }

    fn on_playlist_event(&mut self, event: PlaylistEvent) {
        debug!("Playlist event: {:?}", event);
        match event {
            PlaylistEvent::ItemsChanged { .. } => {}
            PlaylistEvent::CurrentIndexChanged(index) => {
                self.view.selected_row = index;
                self.sync_loaded_track();
            }
        }
    }

    /// Hand the playlist's current track to the engine if it changed
    fn sync_loaded_track(&mut self) {
        let current = self.playlist.current().cloned();
        let forced = std::mem::take(&mut self.force_reload);
        if current == self.loaded && !forced {
            return;
        }

        match &current {
            Some(track) => {
                info!("Now playing: {}", track);
                if let Err(e) = self.engine.load(Some(track)) {
                    warn!("Cannot load {}: {}", track, e);
                    self.view.last_error = Some(e.to_string());
                }
            }
            None => {
                if let Err(e) = self.engine.load(None) {
                    warn!("Cannot unload media: {}", e);
                }
            }
        }
        self.loaded = current;
    }

    fn on_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::MutedChanged(muted) => {
                let shown = if muted { 0 } else { self.engine.volume() };
                self.view.volume_slider = shown;
                self.view.volume_display = shown;
                self.view.muted = muted;
            }
            EngineEvent::VolumeChanged(_) => {
                self.view.volume_slider = self.engine.volume();
                self.view.volume_display = self.engine.volume();
            }
            EngineEvent::StateChanged(state) => {
                match state {
                    PlaybackState::Playing => {
                        self.view.play_button = TransportIcon::Pause;
                        self.view.seek_enabled = true;
                    }
                    PlaybackState::Paused => {
                        self.view.play_button = TransportIcon::Play;
                        self.view.seek_enabled = true;
                    }
                    PlaybackState::Stopped => {
                        self.view.play_button = TransportIcon::Play;
                        self.view.seek_enabled = false;
                        self.view.current_time = NO_TIME.to_string();
                        self.view.total_time = NO_TIME.to_string();
                    }
                }
                self.update_title();
            }
            EngineEvent::DurationChanged(duration_ms) => {
                self.view.seek_max_secs = duration_ms / 1000;
            }
            EngineEvent::PositionChanged(position_ms) => {
                if !self.view.seek_dragging {
                    self.view.seek_value_secs = position_ms / 1000;
                }
                if position_ms > 0 {
                    let total = self.engine.duration() / 1000;
                    let current = position_ms / 1000;
                    self.view.current_time = format_time(current, total);
                    self.view.total_time = format_time(total, total);
                }
            }
            EngineEvent::MetadataChanged(_) => self.update_title(),
            EngineEvent::EndOfMedia => self.on_end_of_media(),
            EngineEvent::Error(message) => {
                warn!("Media engine reported: {}", message);
                self.view.last_error = Some(message);
            }
        }
    }

    fn on_end_of_media(&mut self) {
        self.force_reload = true;
        match self.playlist.advance(Direction::Next) {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => {
                self.force_reload = false;
                info!("Reached the end of the playlist");
                if let Err(e) = self.engine.stop() {
                    warn!("Cannot stop engine: {}", e);
                }
            }
        }
    }

    fn update_title(&mut self) {
        self.view.window_title = match self.engine.state() {
            PlaybackState::Playing | PlaybackState::Paused => {
                let metadata = self.engine.metadata();
                format!(
                    "{}: {} - {}",
                    DEFAULT_TITLE,
                    metadata.album_artist.unwrap_or_default(),
                    metadata.title.unwrap_or_default()
                )
            }
            PlaybackState::Stopped => DEFAULT_TITLE.to_string(),
        };
    }
}
