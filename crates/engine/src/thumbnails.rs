use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::preview::{FrameSize, MediaBackend, PreviewFrame};

pub const DEFAULT_THUMBNAIL_COUNT: usize = 10;
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 160;
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 90;

/// Samples stay this far before the end so a seek never lands past the last
/// frame.
pub const END_MARGIN_SECONDS: f64 = 0.1;

/// How many thumbnails to sample and at which size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailSettings {
    pub count: usize,
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            count: DEFAULT_THUMBNAIL_COUNT,
            width: DEFAULT_THUMBNAIL_WIDTH,
            height: DEFAULT_THUMBNAIL_HEIGHT,
        }
    }
}

impl ThumbnailSettings {
    fn validate(&self) -> Result<FrameSize> {
        if self.count == 0 || self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidThumbnailSettings {
                count: self.count,
                width: self.width,
                height: self.height,
            });
        }
        Ok(FrameSize {
            width: self.width,
            height: self.height,
        })
    }
}

/// Thumbnails of one source, in timestamp order. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailSet {
    pub source: PathBuf,
    pub settings: ThumbnailSettings,
    pub frames: Arc<[PreviewFrame]>,
}

/// Evenly spaced sample timestamps `i * duration / count`, each kept at least
/// [`END_MARGIN_SECONDS`] before the end and never negative.
///
/// # Example
/// ```
/// use engine::thumbnails::sample_times;
///
/// assert_eq!(sample_times(30.0, 3), vec![0.0, 10.0, 20.0]);
/// ```
pub fn sample_times(duration: f64, count: usize) -> Vec<f64> {
    if count == 0 || !duration.is_finite() || duration <= 0.0 {
        return Vec::new();
    }

    let step = duration / count as f64;
    let last_safe = (duration - END_MARGIN_SECONDS).max(0.0);
    (0..count)
        .map(|i| (i as f64 * step).min(last_safe))
        .collect()
}

/// Loads `path` and rasterizes the configured number of thumbnails.
///
/// Frames are decoded one after another on the calling thread; the set is
/// fully built before it is returned. Any load or decode failure aborts the
/// whole set.
pub fn generate_thumbnails<M>(
    media: &M,
    path: &Path,
    settings: ThumbnailSettings,
) -> Result<ThumbnailSet>
where
    M: MediaBackend,
{
    let size = settings.validate()?;
    let probed = media.probe(path)?;

    let times = sample_times(probed.duration_seconds, settings.count);
    let mut frames = Vec::with_capacity(times.len());
    for at_seconds in times {
        debug!(at_seconds, path = ?path, "sampling thumbnail");
        frames.push(media.decode_frame(path, at_seconds, Some(size))?);
    }

    info!(
        path = ?path,
        count = frames.len(),
        duration = probed.duration_seconds,
        "thumbnails generated"
    );
    Ok(ThumbnailSet {
        source: path.to_path_buf(),
        settings,
        frames: frames.into(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use super::{ThumbnailSettings, generate_thumbnails, sample_times};
    use crate::error::{EngineError, Result};
    use crate::preview::{FrameSize, MediaBackend, PreviewFrame, ProbedMedia};

    #[test]
    fn samples_are_evenly_spaced_and_below_end_margin() {
        let times = sample_times(30.0, 10);

        assert_eq!(
            times,
            vec![0.0, 3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 24.0, 27.0]
        );
        assert!(times.iter().all(|t| *t <= 29.9));
    }

    #[test]
    fn samples_are_clamped_near_the_end() {
        let times = sample_times(1.0, 2);
        assert_eq!(times, vec![0.0, 0.5]);

        let times = sample_times(0.15, 3);
        assert!(times.iter().all(|t| *t <= 0.05 + f64::EPSILON));
    }

    #[test]
    fn very_short_media_never_samples_negative_times() {
        let times = sample_times(0.05, 4);
        assert_eq!(times, vec![0.0; 4]);
    }

    #[test]
    fn unknown_duration_yields_no_samples() {
        assert!(sample_times(f64::NAN, 10).is_empty());
        assert!(sample_times(0.0, 10).is_empty());
        assert!(sample_times(10.0, 0).is_empty());
    }

    #[test]
    fn generate_decodes_each_sample_in_order_at_requested_size() {
        let backend = RecordingBackend::new(Some(30.0));
        let calls = backend.calls.clone();

        let set = generate_thumbnails(
            &backend,
            Path::new("clip.mp4"),
            ThumbnailSettings::default(),
        )
        .expect("thumbnails");

        assert_eq!(set.frames.len(), 10);
        assert_eq!(set.source, PathBuf::from("clip.mp4"));
        let calls = calls.lock().expect("lock calls");
        let times: Vec<f64> = calls.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![0.0, 3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 24.0, 27.0]);
        assert!(calls.iter().all(|(_, size)| *size
            == Some(FrameSize {
                width: 160,
                height: 90
            })));
    }

    #[test]
    fn load_failure_fails_the_whole_set() {
        let backend = RecordingBackend::new(None);
        let calls = backend.calls.clone();

        let result = generate_thumbnails(
            &backend,
            Path::new("missing.mp4"),
            ThumbnailSettings::default(),
        );

        assert!(matches!(result, Err(EngineError::MissingDuration(_))));
        assert!(calls.lock().expect("lock calls").is_empty());
    }

    #[test]
    fn zero_count_is_rejected() {
        let backend = RecordingBackend::new(Some(10.0));
        let settings = ThumbnailSettings {
            count: 0,
            ..ThumbnailSettings::default()
        };

        let result = generate_thumbnails(&backend, Path::new("clip.mp4"), settings);

        assert!(matches!(
            result,
            Err(EngineError::InvalidThumbnailSettings { count: 0, .. })
        ));
    }

    type DecodeCalls = Arc<Mutex<Vec<(f64, Option<FrameSize>)>>>;

    struct RecordingBackend {
        duration: Option<f64>,
        calls: DecodeCalls,
    }

    impl RecordingBackend {
        fn new(duration: Option<f64>) -> Self {
            Self {
                duration,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl MediaBackend for RecordingBackend {
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
            self.calls
                .lock()
                .expect("lock calls")
                .push((at_seconds, size));
            let size = size.unwrap_or(FrameSize {
                width: 320,
                height: 180,
            });
            Ok(PreviewFrame {
                width: size.width,
                height: size.height,
                bytes: Arc::from(vec![0_u8; (size.width * size.height * 4) as usize]),
            })
        }
    }
}
