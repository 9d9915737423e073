use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::PlaylistError;
use crate::models::{classify, Direction, PlaybackMode, TrackRef};

pub mod codec;

pub use codec::PlaylistFormat;

/// Change notifications emitted by [`Playlist`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistEvent {
    /// The structure of the item list changed (append/remove/move/clear)
    ItemsChanged { len: usize },
    /// The current position changed, or the track under it did
    CurrentIndexChanged(Option<usize>),
}

/// Callback invoked synchronously after a mutation has been committed
pub type PlaylistObserver = Box<dyn FnMut(&PlaylistEvent)>;

/// Handle returned by [`Playlist::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Ordered, mutable list of tracks with an optional current position.
///
/// `current_index` is always either `None` or a valid index into the items.
pub struct Playlist {
    items: Vec<TrackRef>,
    current_index: Option<usize>,
    playback_mode: PlaybackMode,
    expand_m3u: bool,
    rng: StdRng,
    observers: Vec<(SubscriptionId, PlaylistObserver)>,
    next_subscription: u64,
}

impl Playlist {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a playlist whose Random mode is reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            items: Vec::new(),
            current_index: None,
            playback_mode: PlaybackMode::default(),
            expand_m3u: true,
            rng,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Register a change observer
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&PlaylistEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    fn emit(&mut self, event: PlaylistEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }

    fn emit_items_changed(&mut self) {
        let len = self.items.len();
        self.emit(PlaylistEvent::ItemsChanged { len });
    }

    pub fn playback_mode(&self) -> PlaybackMode {
        self.playback_mode
    }

    pub fn set_playback_mode(&mut self, mode: PlaybackMode) {
        debug!("Playback mode set to {}", mode.as_str());
        self.playback_mode = mode;
    }

    /// Whether `.m3u` files given to `append_many` are expanded into their entries
    pub fn set_expand_m3u(&mut self, enabled: bool) {
        self.expand_m3u = enabled;
    }

    pub fn items(&self) -> &[TrackRef] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&TrackRef> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&TrackRef> {
        self.current_index.and_then(|index| self.items.get(index))
    }

    /// Add a track to the end. Unresolved references are kept as they are.
    pub fn append(&mut self, track: TrackRef) {
        debug!("Appending track: {}", track);
        self.items.push(track);
        self.emit_items_changed();
    }

    /// Classify and append locators in order, returning how many tracks were added.
    ///
    /// Locators that are neither an existing file nor a valid URI are skipped.
    pub fn append_many<I, S>(&mut self, locators: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved = Vec::new();

        for locator in locators {
            match classify(locator.as_ref()) {
                TrackRef::Unresolved(raw) => {
                    debug!("Skipping unresolvable locator: {:?}", raw);
                }
                TrackRef::LocalFile(path) if self.expand_m3u && codec::is_m3u(&path) => {
                    match codec::read_m3u(&path) {
                        Ok(entries) => resolved.extend(entries),
                        Err(e) => warn!("Cannot read M3U list {}: {}", path.display(), e),
                    }
                }
                track => resolved.push(track),
            }
        }

        let added = resolved.len();
        self.extend(resolved);
        added
    }

    /// Append already classified tracks, e.g. the result of a playlist decode
    pub fn extend(&mut self, tracks: Vec<TrackRef>) {
        if tracks.is_empty() {
            return;
        }
        debug!("Appending {} tracks", tracks.len());
        self.items.extend(tracks);
        self.emit_items_changed();
    }

    /// Remove the track at `index`, keeping the current position valid
    pub fn remove_at(&mut self, index: usize) -> Result<TrackRef, PlaylistError> {
        let len = self.items.len();
        if index >= len {
            return Err(PlaylistError::IndexOutOfRange { index, len });
        }

        let removed = self.items.remove(index);

        let current_changed = match self.current_index {
            Some(current) if index < current => {
                self.current_index = Some(current - 1);
                true
            }
            Some(current) if index == current => {
                // The next track slides into place; past the end we clamp to the new last item
                self.current_index = match self.items.len() {
                    0 => None,
                    new_len => Some(current.min(new_len - 1)),
                };
                true
            }
            _ => false,
        };

        debug!("Removed track {}: {}", index, removed);
        self.emit_items_changed();
        if current_changed {
            self.emit(PlaylistEvent::CurrentIndexChanged(self.current_index));
        }

        Ok(removed)
    }

    /// Move the track at `from` so that it ends up at `to`
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), PlaylistError> {
        let len = self.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(PlaylistError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let track = self.items.remove(from);
        self.items.insert(to, track);

        let previous = self.current_index;
        self.current_index = previous.map(|current| {
            if current == from {
                to
            } else if from < current && current <= to {
                current - 1
            } else if to <= current && current < from {
                current + 1
            } else {
                current
            }
        });

        self.emit_items_changed();
        if self.current_index != previous {
            self.emit(PlaylistEvent::CurrentIndexChanged(self.current_index));
        }

        Ok(())
    }

    /// Remove every track and reset the current position
    pub fn clear(&mut self) {
        let had_current = self.current_index.is_some();
        self.items.clear();
        self.current_index = None;

        self.emit_items_changed();
        if had_current {
            self.emit(PlaylistEvent::CurrentIndexChanged(None));
        }
    }

    pub fn set_current(&mut self, index: usize) -> Result<(), PlaylistError> {
        let len = self.items.len();
        if index >= len {
            return Err(PlaylistError::IndexOutOfRange { index, len });
        }

        self.current_index = Some(index);
        self.emit(PlaylistEvent::CurrentIndexChanged(Some(index)));
        Ok(())
    }

    /// Move the current position according to the playback mode.
    ///
    /// Returns the new position; `None` means playback ran off either end in
    /// sequential mode.
    pub fn advance(&mut self, direction: Direction) -> Result<Option<usize>, PlaylistError> {
        let len = self.items.len();
        if len == 0 {
            return Err(PlaylistError::EmptyPlaylist);
        }

        let next = match self.playback_mode {
            PlaybackMode::Sequential => match (self.current_index, direction) {
                (None, Direction::Next) => Some(0),
                (None, Direction::Previous) => Some(len - 1),
                (Some(current), Direction::Next) => Some(current + 1).filter(|&next| next < len),
                (Some(current), Direction::Previous) => current.checked_sub(1),
            },
            PlaybackMode::Loop => match (self.current_index, direction) {
                (None, Direction::Next) => Some(0),
                (None, Direction::Previous) => Some(len - 1),
                (Some(current), Direction::Next) => Some((current + 1) % len),
                (Some(current), Direction::Previous) => Some((current + len - 1) % len),
            },
            PlaybackMode::Random => Some(self.random_index(len)),
        };

        debug!("Advance {:?} in {} mode: {:?} -> {:?}", direction, self.playback_mode.as_str(), self.current_index, next);
        self.current_index = next;
        self.emit(PlaylistEvent::CurrentIndexChanged(next));
        Ok(next)
    }

    /// Uniformly random index, different from the current one when possible
    fn random_index(&mut self, len: usize) -> usize {
        match self.current_index {
            _ if len == 1 => 0,
            Some(current) => {
                let pick = self.rng.gen_range(0..len - 1);
                if pick >= current {
                    pick + 1
                } else {
                    pick
                }
            }
            None => self.rng.gen_range(0..len),
        }
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new()
    }
}
