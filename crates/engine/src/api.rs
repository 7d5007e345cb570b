use std::path::{Path, PathBuf};

use crate::cache::PreviewFrameCache;
use crate::error::{EngineError, Result};
use crate::preview::{FfmpegMediaBackend, FrameSize, MediaBackend, PreviewFrame};
use crate::thumbnails::{END_MARGIN_SECONDS, ThumbnailSet, ThumbnailSettings, generate_thumbnails};
use tracing::{debug, info, warn};

const PREVIEW_CACHE_CAPACITY: usize = 96;
pub const PREVIEW_CACHE_BUCKET_SECONDS: f64 = 1.0 / 30.0;

/// Commands accepted by the engine worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Probes a video source and makes it the current one.
    ///
    /// # Example
    /// ```no_run
    /// use std::path::PathBuf;
    /// use engine::{Command, Engine};
    ///
    /// let mut engine = Engine::with_ffmpeg();
    /// let events = engine
    ///     .handle_command(Command::Load {
    ///         path: PathBuf::from("sample.mp4"),
    ///     })
    ///     .expect("load");
    /// assert_eq!(events.len(), 1);
    /// ```
    Load { path: PathBuf },
    /// Builds the thumbnail strip for the current source.
    ///
    /// A failure is reported as an [`EngineErrorKind::Thumbnails`] event
    /// rather than an error so the UI can carry on without thumbnails.
    GenerateThumbnails { settings: ThumbnailSettings },
    /// Decodes the frame shown at `at_seconds` of the current source.
    DecodePreview { at_seconds: f64 },
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MediaLoaded {
        path: PathBuf,
        duration_seconds: f64,
        width: u32,
        height: u32,
    },
    ThumbnailsReady(ThumbnailSet),
    PreviewFrameReady {
        path: PathBuf,
        at_seconds: f64,
        frame: PreviewFrame,
    },
    Error(EngineErrorEvent),
}

/// Coarse error category for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    MediaLoad,
    Thumbnails,
    Other,
}

impl From<&EngineError> for EngineErrorKind {
    fn from(value: &EngineError) -> Self {
        match value {
            EngineError::MediaLoad { .. } | EngineError::MissingDuration(_) => Self::MediaLoad,
            _ => Self::Other,
        }
    }
}

/// User-facing error payload emitted as an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineErrorEvent {
    pub kind: EngineErrorKind,
    pub message: String,
}

impl EngineErrorEvent {
    pub fn from_error(error: &EngineError) -> Self {
        Self {
            kind: EngineErrorKind::from(error),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct LoadedSource {
    path: PathBuf,
    duration_seconds: f64,
    frame_size: Option<FrameSize>,
}

/// Owns the media backend and the per-source caches.
#[derive(Debug)]
pub struct Engine<M> {
    media: M,
    source: Option<LoadedSource>,
    thumbnails: Option<ThumbnailSet>,
    preview_cache: PreviewFrameCache,
}

impl<M> Engine<M>
where
    M: MediaBackend,
{
    /// Creates a new engine with the provided media backend.
    pub fn new(media: M) -> Self {
        Self {
            media,
            source: None,
            thumbnails: None,
            preview_cache: PreviewFrameCache::new(
                PREVIEW_CACHE_CAPACITY,
                PREVIEW_CACHE_BUCKET_SECONDS,
            ),
        }
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        match command {
            Command::Load { path } => self.load(path),
            Command::GenerateThumbnails { settings } => self.generate_thumbnails(settings),
            Command::DecodePreview { at_seconds } => self.decode_preview(at_seconds),
        }
    }

    fn load(&mut self, path: PathBuf) -> Result<Vec<Event>> {
        let probed = self.media.probe(&path)?;

        let same_source = self
            .source
            .as_ref()
            .is_some_and(|source| source.path == path);
        if !same_source {
            self.preview_cache.clear();
            self.thumbnails = None;
        }

        info!(
            path = ?path,
            duration = probed.duration_seconds,
            width = probed.width,
            height = probed.height,
            "media loaded"
        );
        self.source = Some(LoadedSource {
            path: path.clone(),
            duration_seconds: probed.duration_seconds,
            frame_size: (probed.width > 0 && probed.height > 0).then_some(FrameSize {
                width: probed.width,
                height: probed.height,
            }),
        });

        Ok(vec![Event::MediaLoaded {
            path,
            duration_seconds: probed.duration_seconds,
            width: probed.width,
            height: probed.height,
        }])
    }

    fn generate_thumbnails(&mut self, settings: ThumbnailSettings) -> Result<Vec<Event>> {
        let source = self.source.as_ref().ok_or(EngineError::MediaNotLoaded)?;

        if let Some(existing) = self.thumbnails.as_ref() {
            if existing.source == source.path && existing.settings == settings {
                debug!(path = ?source.path, "thumbnails reused");
                return Ok(vec![Event::ThumbnailsReady(existing.clone())]);
            }
        }

        match generate_thumbnails(&self.media, &source.path, settings) {
            Ok(set) => {
                self.thumbnails = Some(set.clone());
                Ok(vec![Event::ThumbnailsReady(set)])
            }
            Err(error) => {
                warn!(path = ?source.path, %error, "thumbnail generation failed");
                Ok(vec![Event::Error(EngineErrorEvent {
                    kind: EngineErrorKind::Thumbnails,
                    message: error.to_string(),
                })])
            }
        }
    }

    fn decode_preview(&mut self, at_seconds: f64) -> Result<Vec<Event>> {
        let source = self.source.as_ref().ok_or(EngineError::MediaNotLoaded)?;
        let path = source.path.clone();
        let size = source.frame_size;
        let decode_at = clamp_decode_time(at_seconds, source.duration_seconds);

        let frame = self.decode_preview_cached(&path, decode_at, size)?;
        Ok(vec![Event::PreviewFrameReady {
            path,
            at_seconds,
            frame,
        }])
    }

    /// Decodes at `size`, the dimensions probed on load.
    fn decode_preview_cached(
        &mut self,
        path: &Path,
        at_seconds: f64,
        size: Option<FrameSize>,
    ) -> Result<PreviewFrame> {
        if let Some(frame) = self.preview_cache.get(path, at_seconds) {
            debug!(at_seconds, path = ?path, "preview cache hit");
            return Ok(frame);
        }

        debug!(at_seconds, path = ?path, "preview cache miss");
        let frame = self.media.decode_frame(path, at_seconds, size)?;
        self.preview_cache.insert(path, at_seconds, frame.clone());
        Ok(frame)
    }
}

/// Keeps decode requests inside the source, short of the very end.
fn clamp_decode_time(at_seconds: f64, duration_seconds: f64) -> f64 {
    if !at_seconds.is_finite() {
        return 0.0;
    }
    let last_safe = (duration_seconds - END_MARGIN_SECONDS).max(0.0);
    at_seconds.clamp(0.0, last_safe)
}

impl Engine<FfmpegMediaBackend> {
    /// Creates an engine wired to the FFmpeg backend.
    pub fn with_ffmpeg() -> Self {
        Self::new(FfmpegMediaBackend)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use super::{Command, Engine, EngineErrorKind, Event, clamp_decode_time};
    use crate::error::{EngineError, Result};
    use crate::preview::{FrameSize, MediaBackend, PreviewFrame, ProbedMedia};
    use crate::thumbnails::ThumbnailSettings;

    #[test]
    fn load_emits_media_loaded_with_probed_metadata() {
        let mut engine = Engine::new(MockBackend::new(30.0));

        let events = engine
            .handle_command(Command::Load {
                path: PathBuf::from("demo.mp4"),
            })
            .expect("load should succeed");

        assert_eq!(
            events,
            vec![Event::MediaLoaded {
                path: PathBuf::from("demo.mp4"),
                duration_seconds: 30.0,
                width: 320,
                height: 180,
            }]
        );
    }

    #[test]
    fn load_failure_is_a_media_load_error() {
        let mut engine = Engine::new(MockBackend::failing());

        let error = engine
            .handle_command(Command::Load {
                path: PathBuf::from("missing.mp4"),
            })
            .expect_err("load should fail");

        assert_eq!(EngineErrorKind::from(&error), EngineErrorKind::MediaLoad);
    }

    #[test]
    fn commands_before_load_fail() {
        let mut engine = Engine::new(MockBackend::new(30.0));

        let result = engine.handle_command(Command::DecodePreview { at_seconds: 1.0 });

        assert!(matches!(result, Err(EngineError::MediaNotLoaded)));
    }

    #[test]
    fn thumbnails_are_generated_once_per_source() {
        let backend = MockBackend::new(30.0);
        let calls = backend.decode_calls();
        let mut engine = Engine::new(backend);
        load(&mut engine, "demo.mp4");

        let settings = ThumbnailSettings::default();
        let first = engine
            .handle_command(Command::GenerateThumbnails { settings })
            .expect("thumbnails");
        let second = engine
            .handle_command(Command::GenerateThumbnails { settings })
            .expect("thumbnails");

        assert_eq!(first, second);
        let Event::ThumbnailsReady(set) = &first[0] else {
            panic!("expected ThumbnailsReady");
        };
        assert_eq!(set.frames.len(), 10);
        assert_eq!(calls.lock().expect("lock decode calls").len(), 10);
    }

    #[test]
    fn loading_another_source_regenerates_thumbnails() {
        let backend = MockBackend::new(30.0);
        let calls = backend.decode_calls();
        let mut engine = Engine::new(backend);
        let settings = ThumbnailSettings {
            count: 2,
            ..ThumbnailSettings::default()
        };

        load(&mut engine, "a.mp4");
        engine
            .handle_command(Command::GenerateThumbnails { settings })
            .expect("thumbnails");
        load(&mut engine, "b.mp4");
        engine
            .handle_command(Command::GenerateThumbnails { settings })
            .expect("thumbnails");

        assert_eq!(calls.lock().expect("lock decode calls").len(), 4);
    }

    #[test]
    fn thumbnail_failure_degrades_to_error_event() {
        let backend = MockBackend::new(30.0);
        let mut engine = Engine::new(backend);
        load(&mut engine, "demo.mp4");

        let events = engine
            .handle_command(Command::GenerateThumbnails {
                settings: ThumbnailSettings {
                    count: 0,
                    ..ThumbnailSettings::default()
                },
            })
            .expect("thumbnail failure is reported as an event");

        let [Event::Error(error)] = events.as_slice() else {
            panic!("expected a single error event");
        };
        assert_eq!(error.kind, EngineErrorKind::Thumbnails);
    }

    #[test]
    fn preview_is_decoded_at_native_size_and_cached() {
        let backend = MockBackend::new(30.0);
        let calls = backend.decode_calls();
        let mut engine = Engine::new(backend);
        load(&mut engine, "demo.mp4");

        let events = engine
            .handle_command(Command::DecodePreview { at_seconds: 1.5 })
            .expect("preview");
        engine
            .handle_command(Command::DecodePreview { at_seconds: 1.51 })
            .expect("preview");

        let Event::PreviewFrameReady {
            path,
            at_seconds,
            frame,
        } = &events[0]
        else {
            panic!("expected PreviewFrameReady");
        };
        assert_eq!(path, &PathBuf::from("demo.mp4"));
        assert_eq!(*at_seconds, 1.5);
        assert_eq!(frame.width, 320);
        let calls = calls.lock().expect("lock decode calls");
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            (
                1.5,
                Some(FrameSize {
                    width: 320,
                    height: 180
                })
            )
        );
    }

    #[test]
    fn preview_requests_past_the_end_are_pulled_back() {
        assert_eq!(clamp_decode_time(40.0, 30.0), 29.9);
        assert_eq!(clamp_decode_time(-1.0, 30.0), 0.0);
        assert_eq!(clamp_decode_time(f64::NAN, 30.0), 0.0);
    }

    fn load(engine: &mut Engine<MockBackend>, path: &str) {
        engine
            .handle_command(Command::Load {
                path: PathBuf::from(path),
            })
            .expect("load should succeed");
    }

    type DecodeCalls = Arc<Mutex<Vec<(f64, Option<FrameSize>)>>>;

    #[derive(Debug, Clone)]
    struct MockBackend {
        duration: Option<f64>,
        decode_calls: DecodeCalls,
    }

    impl MockBackend {
        fn new(duration: f64) -> Self {
            Self {
                duration: Some(duration),
                decode_calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing() -> Self {
            Self {
                duration: None,
                decode_calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn decode_calls(&self) -> DecodeCalls {
            Arc::clone(&self.decode_calls)
        }
    }

    impl MediaBackend for MockBackend {
        fn probe(&self, path: &Path) -> Result<ProbedMedia> {
            let duration_seconds = self
                .duration
                .ok_or_else(|| EngineError::MissingDuration(path.to_path_buf()))?;
            Ok(ProbedMedia {
                path: path.to_path_buf(),
                duration_seconds,
                width: 320,
                height: 180,
            })
        }

        fn decode_frame(
            &self,
            _path: &Path,
            at_seconds: f64,
            size: Option<FrameSize>,
        ) -> Result<PreviewFrame> {
            self.decode_calls
                .lock()
                .expect("lock decode calls")
                .push((at_seconds, size));
            let (width, height) = size.map_or((320, 180), |size| (size.width, size.height));
            Ok(PreviewFrame {
                width,
                height,
                bytes: Arc::from(vec![0_u8; (width * height * 4) as usize]),
            })
        }
    }
}
