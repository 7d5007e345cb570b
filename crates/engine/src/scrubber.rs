use crate::playback::{MediaElement, PlaybackController};
use crate::time::{format_time, is_usable_duration};
use crate::trim::TrimRange;

/// Converts a click on the progress bar into a seek target inside the trim
/// window.
///
/// Returns `None` when the bar has no width or the duration is unknown.
///
/// # Example
/// ```
/// use engine::TrimRange;
/// use engine::scrubber::seek_time_at;
///
/// let trim = TrimRange { start: 10.0, end: 90.0 };
/// assert_eq!(seek_time_at(50.0, 200.0, 100.0, trim), Some(25.0));
/// assert_eq!(seek_time_at(2.0, 200.0, 100.0, trim), Some(10.0));
/// ```
pub fn seek_time_at(x: f32, width: f32, duration: f64, trim: TrimRange) -> Option<f64> {
    if width <= 0.0 || !is_usable_duration(duration) {
        return None;
    }
    let ratio = f64::from(x) / f64::from(width);
    Some(trim.clamp(ratio * duration))
}

/// Seeks the controller to the clicked position.
///
/// Returns the position after the seek, or `None` when the click was ignored.
pub fn click_to_seek<M>(x: f32, width: f32, controller: &mut PlaybackController<M>) -> Option<f64>
where
    M: MediaElement,
{
    let target = seek_time_at(x, width, controller.state().duration, controller.trim())?;
    controller.seek(target);
    Some(controller.state().current_time)
}

/// Filled fraction of the progress bar, in `[0, 1]`.
pub fn progress_fraction(current_time: f64, duration: f64) -> f32 {
    if !is_usable_duration(duration) {
        return 0.0;
    }
    (current_time / duration).clamp(0.0, 1.0) as f32
}

/// `mm:ss / mm:ss` readout shown next to the transport buttons.
pub fn time_readout(current_time: f64, duration: f64) -> String {
    format!("{} / {}", format_time(current_time), format_time(duration))
}
