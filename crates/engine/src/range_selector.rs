use tracing::debug;

use crate::playback::{MediaElement, PlaybackController};
use crate::time::{is_usable_duration, pct};
use crate::trim::TrimRange;

/// Pointer distance in pixels within which a handle is grabbed.
pub const HANDLE_HIT_SLOP_PX: f32 = 6.0;

/// Which part of the trim bar a drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    StartHandle,
    EndHandle,
    MoveWindow,
}

/// Trim window and pointer position captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    pub original_start: f64,
    pub original_end: f64,
    pub pointer_x: f32,
}

/// A drag in progress, alive between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    pub anchor: DragAnchor,
}

/// Turns pointer gestures over the trim bar into trim window updates.
///
/// Only one pointer is tracked; a pointer-down while a session is open is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeSelector {
    session: Option<DragSession>,
}

impl RangeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Opens a drag session and pauses playback.
    ///
    /// Returns `false` without touching playback when no media is loaded, a
    /// session is already open, or `kind` is [`DragKind::MoveWindow`] while
    /// the window covers the whole media.
    pub fn pointer_down<M>(
        &mut self,
        kind: DragKind,
        pointer_x: f32,
        controller: &mut PlaybackController<M>,
    ) -> bool
    where
        M: MediaElement,
    {
        if self.session.is_some() {
            return false;
        }

        let duration = controller.state().duration;
        let trim = controller.trim();
        if !is_usable_duration(duration) {
            return false;
        }
        if kind == DragKind::MoveWindow && trim.is_full(duration) {
            debug!("window drag ignored: selection covers the whole video");
            return false;
        }

        controller.pause();
        self.session = Some(DragSession {
            kind,
            anchor: DragAnchor {
                original_start: trim.start,
                original_end: trim.end,
                pointer_x,
            },
        });
        true
    }

    /// Updates the trim window live from the pointer position.
    ///
    /// Returns the applied window, or `None` when no session is open or the
    /// move was rejected.
    pub fn pointer_move<M>(
        &mut self,
        pointer_x: f32,
        bar_width: f32,
        controller: &mut PlaybackController<M>,
    ) -> Option<TrimRange>
    where
        M: MediaElement,
    {
        let session = self.session?;
        let duration = controller.state().duration;
        let range = propose_range(&session, pointer_x, bar_width, controller.trim(), duration)?;
        controller.set_trim(range).then_some(range)
    }

    /// Closes the session and resumes playback from the trim start.
    ///
    /// Returns whether a session was open.
    pub fn pointer_up<M>(&mut self, controller: &mut PlaybackController<M>) -> bool
    where
        M: MediaElement,
    {
        let was_dragging = self.session.take().is_some();
        if was_dragging {
            controller.resume_from_trim_start();
        }
        was_dragging
    }
}

/// Maps a pointer x offset into seconds, clamping to the bar.
pub fn time_at_x(x: f32, width: f32, duration: f64) -> f64 {
    if width <= 0.0 || !is_usable_duration(duration) {
        return 0.0;
    }
    let clamped_x = x.clamp(0.0, width);
    f64::from(clamped_x) / f64::from(width) * duration
}

/// Maps seconds to an x offset on a bar of `width` pixels.
pub fn x_at_time(t: f64, width: f32, duration: f64) -> f32 {
    (pct(t, duration) / 100.0 * f64::from(width)) as f32
}

/// Computes the window a drag would produce, or `None` when the gesture is
/// rejected.
///
/// Handle drags that would cross the opposite bound are rejected. Window
/// drags shift both bounds and are pinned so the original length stays
/// inside `[0, duration]`.
///
/// # Example
/// ```
/// use engine::range_selector::propose_range;
/// use engine::{DragAnchor, DragKind, DragSession, TrimRange};
///
/// let session = DragSession {
///     kind: DragKind::MoveWindow,
///     anchor: DragAnchor { original_start: 20.0, original_end: 50.0, pointer_x: 100.0 },
/// };
/// let current = TrimRange { start: 20.0, end: 50.0 };
///
/// let moved = propose_range(&session, -100.0, 500.0, current, 100.0).unwrap();
/// assert_eq!(moved, TrimRange { start: 0.0, end: 30.0 });
/// ```
pub fn propose_range(
    session: &DragSession,
    pointer_x: f32,
    bar_width: f32,
    current: TrimRange,
    duration: f64,
) -> Option<TrimRange> {
    if bar_width <= 0.0 || !is_usable_duration(duration) {
        return None;
    }

    match session.kind {
        DragKind::StartHandle => {
            let time = time_at_x(pointer_x, bar_width, duration);
            (time < current.end).then_some(TrimRange {
                start: time,
                end: current.end,
            })
        }
        DragKind::EndHandle => {
            let time = time_at_x(pointer_x, bar_width, duration);
            (time > current.start).then_some(TrimRange {
                start: current.start,
                end: time,
            })
        }
        DragKind::MoveWindow => {
            let anchor = session.anchor;
            let delta_px = f64::from(pointer_x - anchor.pointer_x);
            let shift = delta_px / f64::from(bar_width) * duration;
            let length = anchor.original_end - anchor.original_start;

            let mut start = anchor.original_start + shift;
            let mut end = anchor.original_end + shift;
            if start < 0.0 {
                start = 0.0;
                end = length;
            } else if end > duration {
                end = duration;
                start = (duration - length).max(0.0);
            }
            Some(TrimRange { start, end })
        }
    }
}

/// Finds what a pointer-down at `x` grabs on the trim bar.
///
/// Handles win over the selection body; when both handles are in reach the
/// nearer one is chosen.
pub fn hit_test(x: f32, width: f32, range: TrimRange, duration: f64) -> Option<DragKind> {
    if width <= 0.0 || !is_usable_duration(duration) || range.is_empty() {
        return None;
    }

    let start_x = x_at_time(range.start, width, duration);
    let end_x = x_at_time(range.end, width, duration);
    let to_start = (x - start_x).abs();
    let to_end = (x - end_x).abs();

    if to_start <= HANDLE_HIT_SLOP_PX || to_end <= HANDLE_HIT_SLOP_PX {
        if to_start < to_end || (to_start == to_end && x < end_x) {
            return Some(DragKind::StartHandle);
        }
        return Some(DragKind::EndHandle);
    }

    (start_x < x && x < end_x).then_some(DragKind::MoveWindow)
}

#[cfg(test)]
mod tests {
    use super::{
        DragAnchor, DragKind, DragSession, RangeSelector, hit_test, propose_range, time_at_x,
        x_at_time,
    };
    use crate::clock::PlaybackClock;
    use crate::playback::{MediaElement, PlaybackController};
    use crate::trim::TrimRange;

    const BAR: f32 = 500.0;

    fn controller_with(duration: f64, range: TrimRange) -> PlaybackController<PlaybackClock> {
        let mut clock = PlaybackClock::default();
        let event = clock.load(duration);
        let mut controller = PlaybackController::new(clock);
        controller.handle_event(event);
        if !range.is_full(duration) {
            assert!(controller.set_trim(range));
        }
        controller
    }

    fn session(kind: DragKind, start: f64, end: f64, pointer_x: f32) -> DragSession {
        DragSession {
            kind,
            anchor: DragAnchor {
                original_start: start,
                original_end: end,
                pointer_x,
            },
        }
    }

    #[test]
    fn pointer_maps_proportionally_and_clamps() {
        assert_eq!(time_at_x(250.0, BAR, 100.0), 50.0);
        assert_eq!(time_at_x(-20.0, BAR, 100.0), 0.0);
        assert_eq!(time_at_x(900.0, BAR, 100.0), 100.0);
        assert_eq!(time_at_x(10.0, 0.0, 100.0), 0.0);
        assert_eq!(x_at_time(50.0, BAR, 100.0), 250.0);
    }

    #[test]
    fn start_handle_past_end_is_a_no_op() {
        let current = TrimRange {
            start: 10.0,
            end: 60.0,
        };
        let drag = session(DragKind::StartHandle, 10.0, 60.0, 50.0);

        for x in [300.0, 350.0, 500.0] {
            assert_eq!(propose_range(&drag, x, BAR, current, 100.0), None);
        }
        assert_eq!(
            propose_range(&drag, 100.0, BAR, current, 100.0),
            Some(TrimRange {
                start: 20.0,
                end: 60.0
            })
        );
    }

    #[test]
    fn end_handle_before_start_is_a_no_op() {
        let current = TrimRange {
            start: 40.0,
            end: 60.0,
        };
        let drag = session(DragKind::EndHandle, 40.0, 60.0, 300.0);

        assert_eq!(propose_range(&drag, 200.0, BAR, current, 100.0), None);
        assert_eq!(propose_range(&drag, 0.0, BAR, current, 100.0), None);
        assert_eq!(
            propose_range(&drag, 400.0, BAR, current, 100.0),
            Some(TrimRange {
                start: 40.0,
                end: 80.0
            })
        );
    }

    #[test]
    fn window_drag_past_left_edge_keeps_length() {
        let current = TrimRange {
            start: 20.0,
            end: 50.0,
        };
        let drag = session(DragKind::MoveWindow, 20.0, 50.0, 100.0);

        let moved = propose_range(&drag, -100.0, BAR, current, 100.0).expect("window moves");

        assert_eq!(moved.start, 0.0);
        assert_eq!(moved.len(), 30.0);
    }

    #[test]
    fn window_drag_past_right_edge_pins_end() {
        let current = TrimRange {
            start: 20.0,
            end: 50.0,
        };
        let drag = session(DragKind::MoveWindow, 20.0, 50.0, 100.0);

        let moved = propose_range(&drag, 450.0, BAR, current, 100.0).expect("window moves");

        assert_eq!(moved, TrimRange {
            start: 70.0,
            end: 100.0
        });
    }

    #[test]
    fn window_drag_shifts_by_pointer_delta() {
        let current = TrimRange {
            start: 20.0,
            end: 50.0,
        };
        let drag = session(DragKind::MoveWindow, 20.0, 50.0, 100.0);

        let moved = propose_range(&drag, 150.0, BAR, current, 100.0).expect("window moves");

        assert_eq!(moved, TrimRange {
            start: 30.0,
            end: 60.0
        });
    }

    #[test]
    fn full_window_rejects_move_drag_without_side_effects() {
        let mut controller = controller_with(100.0, TrimRange::full(100.0));
        controller.toggle_play();
        let mut selector = RangeSelector::new();

        let started = selector.pointer_down(DragKind::MoveWindow, 250.0, &mut controller);

        assert!(!started);
        assert!(!selector.is_dragging());
        assert!(controller.state().is_playing);
        assert!(controller.trim().is_full(100.0));
        assert_eq!(selector.pointer_move(300.0, BAR, &mut controller), None);
    }

    #[test]
    fn drag_lifecycle_pauses_updates_and_resumes_from_new_start() {
        let mut controller = controller_with(100.0, TrimRange::full(100.0));
        controller.toggle_play();
        let mut selector = RangeSelector::new();

        assert!(selector.pointer_down(DragKind::StartHandle, 0.0, &mut controller));
        assert!(!controller.state().is_playing);

        let applied = selector.pointer_move(125.0, BAR, &mut controller);
        assert_eq!(
            applied,
            Some(TrimRange {
                start: 25.0,
                end: 100.0
            })
        );

        assert!(selector.pointer_up(&mut controller));
        assert!(!selector.is_dragging());
        assert!(controller.state().is_playing);
        assert_eq!(controller.media().current_time(), 25.0);
    }

    #[test]
    fn rejected_move_keeps_previous_window() {
        let mut controller = controller_with(
            100.0,
            TrimRange {
                start: 10.0,
                end: 60.0,
            },
        );
        let mut selector = RangeSelector::new();
        selector.pointer_down(DragKind::StartHandle, 50.0, &mut controller);

        assert_eq!(selector.pointer_move(400.0, BAR, &mut controller), None);
        assert_eq!(controller.trim().start, 10.0);
    }

    #[test]
    fn pointer_up_without_session_does_not_resume() {
        let mut controller = controller_with(100.0, TrimRange::full(100.0));
        let mut selector = RangeSelector::new();

        assert!(!selector.pointer_up(&mut controller));
        assert!(!controller.state().is_playing);
    }

    #[test]
    fn second_pointer_down_is_ignored_while_dragging() {
        let mut controller = controller_with(100.0, TrimRange::full(100.0));
        let mut selector = RangeSelector::new();

        assert!(selector.pointer_down(DragKind::EndHandle, 500.0, &mut controller));
        assert!(!selector.pointer_down(DragKind::StartHandle, 0.0, &mut controller));
        assert_eq!(
            selector.session().map(|session| session.kind),
            Some(DragKind::EndHandle)
        );
    }

    #[test]
    fn no_session_before_media_is_loaded() {
        let mut controller = PlaybackController::new(PlaybackClock::default());
        let mut selector = RangeSelector::new();

        assert!(!selector.pointer_down(DragKind::StartHandle, 0.0, &mut controller));
    }

    #[test]
    fn hit_test_prefers_handles_then_selection() {
        let range = TrimRange {
            start: 20.0,
            end: 60.0,
        };

        assert_eq!(hit_test(103.0, BAR, range, 100.0), Some(DragKind::StartHandle));
        assert_eq!(hit_test(296.0, BAR, range, 100.0), Some(DragKind::EndHandle));
        assert_eq!(hit_test(200.0, BAR, range, 100.0), Some(DragKind::MoveWindow));
        assert_eq!(hit_test(50.0, BAR, range, 100.0), None);
        assert_eq!(hit_test(450.0, BAR, range, 100.0), None);
    }

    #[test]
    fn hit_test_is_disabled_without_duration() {
        assert_eq!(hit_test(10.0, BAR, TrimRange::default(), 0.0), None);
    }
}
