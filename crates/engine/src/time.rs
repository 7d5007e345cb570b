/// Microseconds per second, used for cache bucketing.
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Formats seconds as `mm:ss`.
///
/// Seconds are floored to whole seconds first. Negative or non-finite input
/// formats as `00:00`; minutes past 99 keep all their digits.
///
/// # Example
/// ```
/// use engine::format_time;
///
/// assert_eq!(format_time(65.0), "01:05");
/// assert_eq!(format_time(5.9), "00:05");
/// ```
pub fn format_time(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let minutes = whole / 60;
    let secs = whole % 60;
    format!("{minutes:02}:{secs:02}")
}

/// Returns `value` as a percentage of `duration`.
///
/// Unknown or empty durations map to `0.0` instead of dividing by zero.
///
/// # Example
/// ```
/// use engine::pct;
///
/// assert_eq!(pct(25.0, 100.0), 25.0);
/// assert_eq!(pct(25.0, 0.0), 0.0);
/// ```
pub fn pct(value: f64, duration: f64) -> f64 {
    if !is_usable_duration(duration) {
        return 0.0;
    }
    value / duration * 100.0
}

/// True when `duration` is finite and positive.
pub fn is_usable_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

/// Converts seconds into whole microseconds with nearest rounding.
pub fn seconds_to_micros(seconds: f64) -> i64 {
    if !seconds.is_finite() {
        return 0;
    }
    (seconds * MICROS_PER_SECOND).round() as i64
}
