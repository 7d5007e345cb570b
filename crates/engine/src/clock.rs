use std::time::Duration;

use crate::playback::{MediaElement, MediaEvent};
use crate::time::is_usable_duration;

/// Wall-clock driven media element.
///
/// The desktop app has no native player: frames are decoded on demand and
/// the position is advanced by periodic ticks. The clock reports the same
/// events a media element would.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackClock {
    current_time: f64,
    duration: f64,
    playing: bool,
    muted: bool,
}

impl PlaybackClock {
    /// Resets the clock for a new source and reports the loaded metadata.
    pub fn load(&mut self, duration: f64) -> MediaEvent {
        self.duration = if is_usable_duration(duration) {
            duration
        } else {
            0.0
        };
        self.current_time = 0.0;
        self.playing = false;
        MediaEvent::MetadataLoaded
    }

    /// Advances the position by `elapsed` while playing.
    ///
    /// Reaching the end of the media pauses the clock and reports
    /// [`MediaEvent::Ended`] after the final time update.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<MediaEvent> {
        if !self.playing || !is_usable_duration(self.duration) {
            return Vec::new();
        }

        self.current_time += elapsed.as_secs_f64();
        if self.current_time >= self.duration {
            self.current_time = self.duration;
            self.playing = false;
            return vec![MediaEvent::TimeUpdate, MediaEvent::Ended];
        }

        vec![MediaEvent::TimeUpdate]
    }
}

impl MediaElement for PlaybackClock {
    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        self.current_time = seconds.max(0.0).min(self.duration);
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn paused(&self) -> bool {
        !self.playing
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn play(&mut self) {
        if !is_usable_duration(self.duration) {
            return;
        }
        if self.current_time >= self.duration {
            self.current_time = 0.0;
        }
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }
}
