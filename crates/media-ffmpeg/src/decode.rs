use std::path::Path;
use std::process::Command;

use crate::error::{MediaFfmpegError, Result};
use crate::probe::probe_media;

/// Output size for a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// A decoded video frame in RGBA format.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedVideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decodes the video frame shown at `at_seconds`.
///
/// With `size` the frame is scaled to exactly that size; without it the
/// stream's own dimensions are probed and kept.
///
/// # Example
/// ```no_run
/// use media_ffmpeg::{FrameSize, decode_video_frame_at_seconds};
///
/// let size = FrameSize { width: 160, height: 90 };
/// let frame = decode_video_frame_at_seconds("sample.mp4", 0.5, Some(size))
///     .expect("decode should succeed");
/// assert_eq!(frame.rgba.len(), 160 * 90 * 4);
/// ```
pub fn decode_video_frame_at_seconds(
    path: impl AsRef<Path>,
    at_seconds: f64,
    size: Option<FrameSize>,
) -> Result<DecodedVideoFrame> {
    if !at_seconds.is_finite() || at_seconds < 0.0 {
        return Err(MediaFfmpegError::InvalidTimestampSeconds(at_seconds));
    }

    let path = path.as_ref();
    let size = match size {
        Some(size) if size.width == 0 || size.height == 0 => {
            return Err(MediaFfmpegError::InvalidFrameSize {
                width: size.width,
                height: size.height,
            });
        }
        Some(size) => size,
        None => native_frame_size(path)?,
    };

    let rgba = grab_rgba_frame(path, at_seconds, size)?;
    let expected_size = size.width as usize * size.height as usize * 4;
    if rgba.len() != expected_size {
        return Err(MediaFfmpegError::Parse {
            context: "decoded rgba size",
            value: format!("expected {expected_size} bytes, got {}", rgba.len()),
        });
    }

    Ok(DecodedVideoFrame {
        width: size.width,
        height: size.height,
        rgba,
    })
}

fn native_frame_size(path: &Path) -> Result<FrameSize> {
    let media = probe_media(path)?;
    let video = media
        .first_video()
        .ok_or_else(|| MediaFfmpegError::MissingVideoStream(path.to_path_buf()))?;
    let width = video
        .width
        .ok_or_else(|| MediaFfmpegError::MissingVideoDimensions(path.to_path_buf()))?;
    let height = video
        .height
        .ok_or_else(|| MediaFfmpegError::MissingVideoDimensions(path.to_path_buf()))?;
    Ok(FrameSize { width, height })
}

fn grab_rgba_frame(path: &Path, at_seconds: f64, size: FrameSize) -> Result<Vec<u8>> {
    let filter = format!("scale={}:{},format=rgba", size.width, size.height);
    let output = Command::new("ffmpeg")
        .arg("-hide_banner")
        .arg("-v")
        .arg("error")
        .arg("-ss")
        .arg(format!("{at_seconds:.3}"))
        .arg("-i")
        .arg(path)
        .arg("-an")
        .arg("-vf")
        .arg(&filter)
        .arg("-frames:v")
        .arg("1")
        .arg("-f")
        .arg("rawvideo")
        .arg("-pix_fmt")
        .arg("rgba")
        .arg("-")
        .output()
        .map_err(|source| MediaFfmpegError::Io {
            context: "run ffmpeg frame grab",
            source,
        })?;

    if !output.status.success() {
        return Err(MediaFfmpegError::CommandFailed {
            command: format!("ffmpeg frame grab {} @ {at_seconds:.3}", path.display()),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output.stdout)
}
