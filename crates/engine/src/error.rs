use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by engine commands, thumbnail sampling and config loading.
#[derive(Debug)]
pub enum EngineError {
    MediaNotLoaded,
    MediaLoad {
        path: PathBuf,
        source: media_ffmpeg::MediaFfmpegError,
    },
    MissingDuration(PathBuf),
    InvalidThumbnailSettings {
        count: usize,
        width: u32,
        height: u32,
    },
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    ConfigSerialization {
        path: PathBuf,
        source: serde_json::Error,
    },
    Media(media_ffmpeg::MediaFfmpegError),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MediaNotLoaded => write!(f, "no media source is loaded"),
            Self::MediaLoad { path, source } => {
                write!(f, "failed to load video {} ({source})", path.display())
            }
            Self::MissingDuration(path) => {
                write!(f, "media duration is missing: {}", path.display())
            }
            Self::InvalidThumbnailSettings {
                count,
                width,
                height,
            } => write!(
                f,
                "invalid thumbnail settings: {count} frames at {width}x{height}"
            ),
            Self::ConfigIo { path, source } => {
                write!(f, "failed to read config {} ({source})", path.display())
            }
            Self::ConfigSerialization { path, source } => {
                write!(f, "invalid config {} ({source})", path.display())
            }
            Self::Media(err) => write!(f, "media backend error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MediaLoad { source, .. } => Some(source),
            Self::ConfigIo { source, .. } => Some(source),
            Self::ConfigSerialization { source, .. } => Some(source),
            Self::Media(err) => Some(err),
            _ => None,
        }
    }
}

impl From<media_ffmpeg::MediaFfmpegError> for EngineError {
    fn from(value: media_ffmpeg::MediaFfmpegError) -> Self {
        Self::Media(value)
    }
}
