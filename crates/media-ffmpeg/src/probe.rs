use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::error::{MediaFfmpegError, Result};

/// Stream kind discovered by probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
    Other,
}

/// Stream metadata read from `ffprobe`.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    pub kind: StreamKind,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_seconds: Option<f64>,
}

/// Media probe result.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub streams: Vec<StreamInfo>,
    pub duration_seconds: Option<f64>,
}

impl MediaInfo {
    /// Returns the first video stream.
    ///
    /// # Example
    /// ```no_run
    /// use media_ffmpeg::probe_media;
    ///
    /// let info = probe_media("sample.mp4").expect("probe should succeed");
    /// let _video = info.first_video().expect("video stream exists");
    /// ```
    pub fn first_video(&self) -> Option<&StreamInfo> {
        self.streams
            .iter()
            .find(|stream| stream.kind == StreamKind::Video)
    }
}

#[derive(Debug, Deserialize)]
struct RawProbe {
    #[serde(default)]
    streams: Vec<RawStream>,
    format: Option<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    duration: Option<String>,
}

/// Probes a media file via `ffprobe`.
///
/// The container duration is preferred; when it is absent the longest stream
/// duration is used instead.
///
/// # Example
/// ```no_run
/// use media_ffmpeg::probe_media;
///
/// let info = probe_media("sample.mp4").expect("probe should succeed");
/// assert!(!info.streams.is_empty());
/// ```
pub fn probe_media(path: impl AsRef<Path>) -> Result<MediaInfo> {
    let path = path.as_ref();

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "stream=codec_type,width,height,duration:format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|source| MediaFfmpegError::Io {
            context: "run ffprobe",
            source,
        })?;

    if !output.status.success() {
        return Err(MediaFfmpegError::CommandFailed {
            command: format!("ffprobe {}", path.display()),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let stdout = String::from_utf8(output.stdout)?;
    parse_probe_output(path, &stdout)
}

pub(crate) fn parse_probe_output(path: &Path, json: &str) -> Result<MediaInfo> {
    let raw: RawProbe = serde_json::from_str(json).map_err(|source| MediaFfmpegError::Json {
        context: "ffprobe output",
        source,
    })?;

    if raw.streams.is_empty() {
        return Err(MediaFfmpegError::Parse {
            context: "streams",
            value: "no streams found".to_string(),
        });
    }

    let mut streams = Vec::with_capacity(raw.streams.len());
    for stream in raw.streams {
        let kind = match stream.codec_type.as_deref() {
            Some("video") => StreamKind::Video,
            Some("audio") => StreamKind::Audio,
            _ => StreamKind::Other,
        };
        streams.push(StreamInfo {
            kind,
            width: stream.width,
            height: stream.height,
            duration_seconds: parse_optional_seconds(stream.duration.as_deref(), "stream duration")?,
        });
    }

    let format_duration = match raw.format {
        Some(format) => parse_optional_seconds(format.duration.as_deref(), "format duration")?,
        None => None,
    };
    let duration_seconds = format_duration.or_else(|| {
        streams
            .iter()
            .filter_map(|stream| stream.duration_seconds)
            .reduce(f64::max)
    });

    Ok(MediaInfo {
        path: path.to_path_buf(),
        streams,
        duration_seconds,
    })
}

fn parse_optional_seconds(value: Option<&str>, context: &'static str) -> Result<Option<f64>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() || raw == "N/A" {
        return Ok(None);
    }

    let seconds = raw.parse::<f64>().map_err(|_| MediaFfmpegError::Parse {
        context,
        value: raw.to_string(),
    })?;
    Ok(Some(seconds))
}
