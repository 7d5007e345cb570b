//! UI-agnostic trimming engine: playback clamping, trim-range dragging,
//! scrubbing and thumbnail sampling.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod playback;
pub mod preview;
pub mod range_selector;
pub mod scrubber;
pub mod thumbnails;
pub mod time;
pub mod trim;

pub use api::{Command, Engine, EngineErrorEvent, EngineErrorKind, Event};
pub use clock::PlaybackClock;
pub use config::TrimmerConfig;
pub use error::{EngineError, Result};
pub use playback::{MediaElement, MediaEvent, PlaybackController, PlaybackState};
pub use preview::{FfmpegMediaBackend, FrameSize, MediaBackend, PreviewFrame, ProbedMedia};
pub use range_selector::{DragAnchor, DragKind, DragSession, RangeSelector};
pub use thumbnails::{ThumbnailSet, ThumbnailSettings};
pub use time::{format_time, pct};
pub use trim::TrimRange;
