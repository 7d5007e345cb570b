use tracing::{debug, info};

use crate::time::is_usable_duration;
use crate::trim::TrimRange;

/// The media primitive driven by the controller.
///
/// Mirrors the surface of a media element: a readable/writable position and
/// mute flag, a read-only duration and paused flag, and play/pause.
pub trait MediaElement {
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// Duration in seconds; `0.0` or non-finite until metadata is loaded.
    fn duration(&self) -> f64;
    fn paused(&self) -> bool;
    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    fn play(&mut self);
    fn pause(&mut self);
}

/// Media callbacks resolved into messages handled one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    TimeUpdate,
    Ended,
    MetadataLoaded,
}

/// Observable playback state for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackState {
    pub current_time: f64,
    pub duration: f64,
    pub is_playing: bool,
    pub is_muted: bool,
    pub has_ended: bool,
}

/// Owns the media element, the playback state and the trim window.
///
/// Every position change goes through [`PlaybackController::handle_event`] or
/// one of the command methods, which keep the position inside the trim window.
///
/// # Example
/// ```
/// use engine::{MediaEvent, PlaybackClock, PlaybackController, TrimRange};
///
/// let mut clock = PlaybackClock::default();
/// let loaded = clock.load(100.0);
/// let mut controller = PlaybackController::new(clock);
/// controller.handle_event(loaded);
/// controller.set_trim(TrimRange { start: 10.0, end: 90.0 });
///
/// controller.seek(95.0);
/// assert_eq!(controller.state().current_time, 90.0);
/// ```
#[derive(Debug)]
pub struct PlaybackController<M> {
    media: M,
    state: PlaybackState,
    trim: TrimRange,
}

impl<M> PlaybackController<M>
where
    M: MediaElement,
{
    pub fn new(media: M) -> Self {
        let state = PlaybackState {
            current_time: media.current_time(),
            duration: 0.0,
            is_playing: !media.paused(),
            is_muted: media.muted(),
            has_ended: false,
        };
        Self {
            media,
            state,
            trim: TrimRange::default(),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn trim(&self) -> TrimRange {
        self.trim
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    /// Applies one media event.
    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate => self.on_time_update(),
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::MetadataLoaded => self.on_metadata_loaded(),
        }
    }

    /// Moves the position to `t` clamped into the trim window.
    pub fn seek(&mut self, t: f64) {
        if self.trim.is_empty() {
            return;
        }
        let clamped = self.trim.clamp(t);
        self.media.set_current_time(clamped);
        self.state.current_time = clamped;
    }

    /// Pauses when playing; otherwise resumes, restarting at the trim start
    /// when playback previously ended.
    pub fn toggle_play(&mut self) {
        if self.media.paused() {
            self.media.play();
            self.state.is_playing = !self.media.paused();
            if self.state.is_playing && self.state.has_ended {
                self.media.set_current_time(self.trim.start);
                self.state.current_time = self.trim.start;
                self.state.has_ended = false;
            }
        } else {
            self.pause();
        }
    }

    pub fn toggle_mute(&mut self) {
        let muted = !self.media.muted();
        self.media.set_muted(muted);
        self.state.is_muted = self.media.muted();
    }

    pub fn pause(&mut self) {
        self.media.pause();
        self.state.is_playing = false;
    }

    /// Restarts playback at the trim start.
    pub fn resume_from_trim_start(&mut self) {
        if self.trim.is_empty() {
            return;
        }
        self.media.set_current_time(self.trim.start);
        self.media.play();
        self.state.current_time = self.trim.start;
        self.state.is_playing = !self.media.paused();
        self.state.has_ended = false;
    }

    /// Replaces the trim window.
    ///
    /// Returns `false` and keeps the current window when `range` does not fit
    /// the loaded media. When the start moves, the position follows it.
    pub fn set_trim(&mut self, range: TrimRange) -> bool {
        let Some(range) = TrimRange::new(range.start, range.end, self.state.duration) else {
            debug!(
                start = range.start,
                end = range.end,
                duration = self.state.duration,
                "trim update rejected"
            );
            return false;
        };

        let start_moved = range.start != self.trim.start;
        self.trim = range;
        if start_moved {
            self.media.set_current_time(range.start);
            self.state.current_time = range.start;
        }
        true
    }

    fn on_time_update(&mut self) {
        let mut t = self.media.current_time();
        if self.trim.is_empty() {
            self.state.current_time = t;
            return;
        }

        if t < self.trim.start {
            self.media.set_current_time(self.trim.start);
            t = self.trim.start;
        }

        if t >= self.trim.end {
            self.media.pause();
            if t > self.trim.end {
                self.media.set_current_time(self.trim.end);
            }
            self.state.is_playing = false;
            self.state.has_ended = true;
            t = self.trim.end;
        }

        self.state.current_time = t;
    }

    fn on_ended(&mut self) {
        self.state.is_playing = false;
        self.state.has_ended = true;
    }

    fn on_metadata_loaded(&mut self) {
        let duration = self.media.duration();
        if !is_usable_duration(duration) {
            self.state.duration = 0.0;
            self.state.current_time = self.media.current_time();
            self.state.is_playing = !self.media.paused();
            self.state.has_ended = false;
            self.trim = TrimRange::default();
            return;
        }

        info!(duration, "media metadata loaded");
        self.state.duration = duration;
        self.state.current_time = self.media.current_time();
        self.state.is_playing = !self.media.paused();
        self.state.has_ended = false;
        self.trim = TrimRange::full(duration);
    }
}
