use crate::time::is_usable_duration;

/// Trim window in seconds.
///
/// Once media is loaded `0 <= start < end <= duration` holds. Before that the
/// window is empty (`0..0`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrimRange {
    pub start: f64,
    pub end: f64,
}

impl TrimRange {
    /// Window covering the whole media.
    pub fn full(duration: f64) -> Self {
        if !is_usable_duration(duration) {
            return Self::default();
        }
        Self {
            start: 0.0,
            end: duration,
        }
    }

    /// Builds a window, rejecting values that break the trim invariant.
    ///
    /// # Example
    /// ```
    /// use engine::TrimRange;
    ///
    /// assert!(TrimRange::new(10.0, 90.0, 100.0).is_some());
    /// assert!(TrimRange::new(90.0, 10.0, 100.0).is_none());
    /// ```
    pub fn new(start: f64, end: f64, duration: f64) -> Option<Self> {
        let valid = is_usable_duration(duration)
            && start.is_finite()
            && end.is_finite()
            && 0.0 <= start
            && start < end
            && end <= duration;
        valid.then_some(Self { start, end })
    }

    /// Length of the window in seconds.
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// True before media is loaded.
    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }

    /// True when the window spans the whole media. Whole-window dragging is
    /// disabled in that state.
    pub fn is_full(&self, duration: f64) -> bool {
        self.start == 0.0 && self.end == duration
    }

    /// Clamps `t` into the window.
    pub fn clamp(&self, t: f64) -> f64 {
        t.max(self.start).min(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::TrimRange;

    #[test]
    fn full_window_spans_duration() {
        let range = TrimRange::full(42.0);
        assert_eq!(range.start, 0.0);
        assert_eq!(range.end, 42.0);
        assert!(range.is_full(42.0));
    }

    #[test]
    fn full_window_of_unknown_duration_is_empty() {
        assert!(TrimRange::full(f64::NAN).is_empty());
        assert!(TrimRange::full(0.0).is_empty());
    }

    #[test]
    fn new_rejects_out_of_bounds_windows() {
        assert!(TrimRange::new(-1.0, 5.0, 10.0).is_none());
        assert!(TrimRange::new(2.0, 11.0, 10.0).is_none());
        assert!(TrimRange::new(5.0, 5.0, 10.0).is_none());
        assert!(TrimRange::new(0.0, 10.0, 10.0).is_some());
    }

    #[test]
    fn clamp_snaps_to_nearest_bound() {
        let range = TrimRange {
            start: 10.0,
            end: 90.0,
        };
        assert_eq!(range.clamp(5.0), 10.0);
        assert_eq!(range.clamp(95.0), 90.0);
        assert_eq!(range.clamp(42.5), 42.5);
    }

    #[test]
    fn partial_window_is_not_full() {
        let range = TrimRange {
            start: 0.0,
            end: 50.0,
        };
        assert!(!range.is_full(100.0));
    }
}
