use std::path::{Path, PathBuf};
use std::sync::Arc;

use media_ffmpeg::MediaFfmpegError;
pub use media_ffmpeg::FrameSize;

use crate::error::{EngineError, Result};
use crate::time::is_usable_duration;

/// RGBA8 frame payload passed to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    pub bytes: Arc<[u8]>,
}

/// Result of probing one video source.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbedMedia {
    pub path: PathBuf,
    pub duration_seconds: f64,
    pub width: u32,
    pub height: u32,
}

/// Media operations required by the engine.
pub trait MediaBackend {
    /// Loads source metadata. Failures are reported as
    /// [`EngineError::MediaLoad`] or [`EngineError::MissingDuration`].
    fn probe(&self, path: &Path) -> Result<ProbedMedia>;

    /// Decodes the frame shown at `at_seconds`, scaled to `size` when given.
    fn decode_frame(
        &self,
        path: &Path,
        at_seconds: f64,
        size: Option<FrameSize>,
    ) -> Result<PreviewFrame>;
}

/// FFmpeg CLI-backed backend used by production wiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegMediaBackend;

impl MediaBackend for FfmpegMediaBackend {
    fn probe(&self, path: &Path) -> Result<ProbedMedia> {
        let load_error = |source: MediaFfmpegError| EngineError::MediaLoad {
            path: path.to_path_buf(),
            source,
        };

        let info = media_ffmpeg::probe_media(path).map_err(load_error)?;
        let video = info
            .first_video()
            .ok_or_else(|| load_error(MediaFfmpegError::MissingVideoStream(path.to_path_buf())))?;
        let (Some(width), Some(height)) = (video.width, video.height) else {
            return Err(load_error(MediaFfmpegError::MissingVideoDimensions(
                path.to_path_buf(),
            )));
        };
        let duration_seconds = info
            .duration_seconds
            .filter(|duration| is_usable_duration(*duration))
            .ok_or_else(|| EngineError::MissingDuration(path.to_path_buf()))?;

        Ok(ProbedMedia {
            path: info.path,
            duration_seconds,
            width,
            height,
        })
    }

    fn decode_frame(
        &self,
        path: &Path,
        at_seconds: f64,
        size: Option<FrameSize>,
    ) -> Result<PreviewFrame> {
        let decoded = media_ffmpeg::decode_video_frame_at_seconds(path, at_seconds, size)?;
        Ok(PreviewFrame {
            width: decoded.width,
            height: decoded.height,
            bytes: decoded.rgba.into(),
        })
    }
}
