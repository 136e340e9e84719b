//! Pair gesture recognition
//!
//! [`TwoFingerDoubleTap`] consumes raw touch samples and reports the two touch
//! locations once two quick two-finger taps have been made. Pointer-only devices
//! use [`PairClickEmulator`] instead: two secondary clicks make a pair.

use crate::explore::animation::elapsed_between;
use egui::Pos2;
use instant::{Duration, Instant};

/// Longest a finger may stay down for the touch to count as a tap
pub const MAX_TAP_DURATION: Duration = Duration::from_millis(350);
/// Furthest a finger may move (points) for the touch to count as a tap
pub const MAX_TAP_MOVEMENT: f32 = 12.0;
/// Longest pause between the first tap's release and the second tap's touch-down
pub const MAX_TAP_INTERVAL: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One raw touch event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub id: u64,
    pub phase: TouchPhase,
    pub pos: Pos2,
    pub time: Instant,
}

#[derive(Debug, Clone, Copy)]
struct ActiveTouch {
    id: u64,
    order: u64,
    start_pos: Pos2,
    start_time: Instant,
    last_pos: Pos2,
}

impl ActiveTouch {
    fn moved_too_far(&self) -> bool {
        self.start_pos.distance(self.last_pos) > MAX_TAP_MOVEMENT
    }
}

/// Touches from touch-down of the first finger until all fingers are lifted
#[derive(Debug, Clone)]
struct TapAttempt {
    started: Instant,
    /// (touch order, release position)
    released: Vec<(u64, Pos2)>,
    max_fingers: usize,
    valid: bool,
}

/// Recognizes a double tap made with two fingers
#[derive(Debug, Clone, Default)]
pub struct TwoFingerDoubleTap {
    active: Vec<ActiveTouch>,
    attempt: Option<TapAttempt>,
    /// Release time of a completed two-finger tap waiting for its second tap
    first_tap_ended: Option<Instant>,
    last_multi_touch: Option<Instant>,
    next_order: u64,
}

impl TwoFingerDoubleTap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one touch sample. Returns the two touch locations of the second tap,
    /// ordered by touch-down, when the gesture completes.
    pub fn feed(&mut self, sample: TouchSample) -> Option<[Pos2; 2]> {
        match sample.phase {
            TouchPhase::Start => {
                self.touch_down(sample);
                None
            }
            TouchPhase::Move => {
                if let Some(touch) = self.active.iter_mut().find(|t| t.id == sample.id) {
                    touch.last_pos = sample.pos;
                    if touch.moved_too_far()
                        && let Some(attempt) = self.attempt.as_mut()
                    {
                        attempt.valid = false;
                    }
                }
                None
            }
            TouchPhase::End => self.touch_up(sample),
            TouchPhase::Cancel => {
                self.active.retain(|t| t.id != sample.id);
                if let Some(attempt) = self.attempt.as_mut() {
                    attempt.valid = false;
                }
                if self.active.is_empty() {
                    self.attempt = None;
                }
                self.first_tap_ended = None;
                None
            }
        }
    }

    /// True while, or shortly after, more than one finger is on the screen.
    /// Single taps should be ignored then.
    pub fn suppresses_single_tap(&self, now: Instant) -> bool {
        if self.active.len() > 1 {
            return true;
        }
        self.last_multi_touch.is_some_and(|at| {
            elapsed_between(at, now) <= MAX_TAP_DURATION + MAX_TAP_INTERVAL
        })
    }

    fn touch_down(&mut self, sample: TouchSample) {
        if self.active.iter().any(|t| t.id == sample.id) {
            return;
        }
        if self.active.is_empty() {
            self.attempt = Some(TapAttempt {
                started: sample.time,
                released: Vec::with_capacity(2),
                max_fingers: 0,
                valid: true,
            });
        }

        self.active.push(ActiveTouch {
            id: sample.id,
            order: self.next_order,
            start_pos: sample.pos,
            start_time: sample.time,
            last_pos: sample.pos,
        });
        self.next_order += 1;

        let fingers = self.active.len();
        if fingers > 1 {
            self.last_multi_touch = Some(sample.time);
        }
        if let Some(attempt) = self.attempt.as_mut() {
            attempt.max_fingers = attempt.max_fingers.max(fingers);
            if fingers > 2 {
                attempt.valid = false;
            }
        }
    }

    fn touch_up(&mut self, sample: TouchSample) -> Option<[Pos2; 2]> {
        let index = self.active.iter().position(|t| t.id == sample.id)?;
        let mut touch = self.active.remove(index);
        touch.last_pos = sample.pos;

        let attempt = self.attempt.as_mut()?;
        if touch.moved_too_far() || elapsed_between(touch.start_time, sample.time) > MAX_TAP_DURATION
        {
            attempt.valid = false;
        }
        attempt.released.push((touch.order, touch.last_pos));

        if !self.active.is_empty() {
            return None;
        }

        let attempt = self.attempt.take()?;
        let is_two_finger_tap =
            attempt.valid && attempt.max_fingers == 2 && attempt.released.len() == 2;
        if !is_two_finger_tap {
            self.first_tap_ended = None;
            return None;
        }

        match self.first_tap_ended.take() {
            Some(first_end)
                if elapsed_between(first_end, attempt.started) <= MAX_TAP_INTERVAL =>
            {
                let mut released = attempt.released;
                released.sort_by_key(|(order, _)| *order);
                tracing::trace!("Two-finger double tap recognized");
                Some([released[0].1, released[1].1])
            }
            _ => {
                self.first_tap_ended = Some(sample.time);
                None
            }
        }
    }
}

/// Makes a pin pair out of two secondary clicks
#[derive(Debug, Clone, Default)]
pub struct PairClickEmulator {
    pending: Option<Pos2>,
}

impl PairClickEmulator {
    /// The first click arms the pair, the second completes it.
    pub fn secondary_click(&mut self, pos: Pos2) -> Option<[Pos2; 2]> {
        match self.pending.take() {
            Some(first) => Some([first, pos]),
            None => {
                self.pending = Some(pos);
                None
            }
        }
    }

    /// Location of the first click of an unfinished pair
    pub fn pending(&self) -> Option<Pos2> {
        self.pending
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Script {
        start: Instant,
    }

    impl Script {
        fn new() -> Self {
            Self {
                start: Instant::now(),
            }
        }

        fn at(&self, ms: u64, id: u64, phase: TouchPhase, x: f32, y: f32) -> TouchSample {
            TouchSample {
                id,
                phase,
                pos: Pos2::new(x, y),
                time: self.start + Duration::from_millis(ms),
            }
        }
    }

    /// Feeds a two-finger tap starting at `t0`, returns the recognizer output of the last release.
    fn two_finger_tap(
        recognizer: &mut TwoFingerDoubleTap,
        script: &Script,
        t0: u64,
        ids: (u64, u64),
        a: (f32, f32),
        b: (f32, f32),
    ) -> Option<[Pos2; 2]> {
        assert!(recognizer.feed(script.at(t0, ids.0, TouchPhase::Start, a.0, a.1)).is_none());
        assert!(recognizer.feed(script.at(t0 + 10, ids.1, TouchPhase::Start, b.0, b.1)).is_none());
        assert!(recognizer.feed(script.at(t0 + 80, ids.0, TouchPhase::End, a.0, a.1)).is_none());
        recognizer.feed(script.at(t0 + 90, ids.1, TouchPhase::End, b.0, b.1))
    }

    #[test]
    fn test_recognizes_two_finger_double_tap() {
        let script = Script::new();
        let mut recognizer = TwoFingerDoubleTap::new();

        let first = two_finger_tap(&mut recognizer, &script, 0, (1, 2), (10.0, 10.0), (200.0, 300.0));
        assert!(first.is_none());
        let second =
            two_finger_tap(&mut recognizer, &script, 250, (3, 4), (12.0, 11.0), (198.0, 302.0));
        assert_eq!(
            second,
            Some([Pos2::new(12.0, 11.0), Pos2::new(198.0, 302.0)])
        );
    }

    #[test]
    fn test_points_ordered_by_touch_down() {
        let script = Script::new();
        let mut recognizer = TwoFingerDoubleTap::new();
        two_finger_tap(&mut recognizer, &script, 0, (1, 2), (0.0, 0.0), (50.0, 50.0));

        // Second tap: finger 4 lands first but lifts last.
        recognizer.feed(script.at(200, 4, TouchPhase::Start, 5.0, 5.0));
        recognizer.feed(script.at(210, 3, TouchPhase::Start, 60.0, 60.0));
        recognizer.feed(script.at(260, 3, TouchPhase::End, 60.0, 60.0));
        let result = recognizer.feed(script.at(270, 4, TouchPhase::End, 5.0, 5.0));
        assert_eq!(result, Some([Pos2::new(5.0, 5.0), Pos2::new(60.0, 60.0)]));
    }

    #[test]
    fn test_rejects_slow_second_tap() {
        let script = Script::new();
        let mut recognizer = TwoFingerDoubleTap::new();
        two_finger_tap(&mut recognizer, &script, 0, (1, 2), (0.0, 0.0), (50.0, 50.0));
        let late = two_finger_tap(&mut recognizer, &script, 1000, (3, 4), (0.0, 0.0), (50.0, 50.0));
        assert!(late.is_none());
        // The late tap counts as a new first tap.
        let third = two_finger_tap(&mut recognizer, &script, 1200, (5, 6), (0.0, 0.0), (50.0, 50.0));
        assert!(third.is_some());
    }

    #[test]
    fn test_rejects_long_press() {
        let script = Script::new();
        let mut recognizer = TwoFingerDoubleTap::new();
        two_finger_tap(&mut recognizer, &script, 0, (1, 2), (0.0, 0.0), (50.0, 50.0));

        recognizer.feed(script.at(200, 3, TouchPhase::Start, 0.0, 0.0));
        recognizer.feed(script.at(200, 4, TouchPhase::Start, 50.0, 50.0));
        recognizer.feed(script.at(800, 3, TouchPhase::End, 0.0, 0.0));
        assert!(recognizer.feed(script.at(800, 4, TouchPhase::End, 50.0, 50.0)).is_none());
    }

    #[test]
    fn test_rejects_moving_fingers() {
        let script = Script::new();
        let mut recognizer = TwoFingerDoubleTap::new();
        two_finger_tap(&mut recognizer, &script, 0, (1, 2), (0.0, 0.0), (50.0, 50.0));

        recognizer.feed(script.at(200, 3, TouchPhase::Start, 0.0, 0.0));
        recognizer.feed(script.at(205, 4, TouchPhase::Start, 50.0, 50.0));
        recognizer.feed(script.at(230, 3, TouchPhase::Move, 40.0, 0.0));
        recognizer.feed(script.at(260, 3, TouchPhase::End, 40.0, 0.0));
        assert!(recognizer.feed(script.at(270, 4, TouchPhase::End, 50.0, 50.0)).is_none());
    }

    #[test]
    fn test_rejects_three_fingers() {
        let script = Script::new();
        let mut recognizer = TwoFingerDoubleTap::new();
        two_finger_tap(&mut recognizer, &script, 0, (1, 2), (0.0, 0.0), (50.0, 50.0));

        recognizer.feed(script.at(200, 3, TouchPhase::Start, 0.0, 0.0));
        recognizer.feed(script.at(201, 4, TouchPhase::Start, 50.0, 50.0));
        recognizer.feed(script.at(202, 5, TouchPhase::Start, 90.0, 90.0));
        recognizer.feed(script.at(250, 3, TouchPhase::End, 0.0, 0.0));
        recognizer.feed(script.at(251, 4, TouchPhase::End, 50.0, 50.0));
        assert!(recognizer.feed(script.at(252, 5, TouchPhase::End, 90.0, 90.0)).is_none());
    }

    #[test]
    fn test_single_finger_taps_are_not_pairs() {
        let script = Script::new();
        let mut recognizer = TwoFingerDoubleTap::new();
        for (i, t0) in [0u64, 150, 300].into_iter().enumerate() {
            let id = i as u64;
            recognizer.feed(script.at(t0, id, TouchPhase::Start, 0.0, 0.0));
            assert!(recognizer.feed(script.at(t0 + 50, id, TouchPhase::End, 0.0, 0.0)).is_none());
        }
        assert!(!recognizer.suppresses_single_tap(script.start + Duration::from_millis(400)));
    }

    #[test]
    fn test_cancel_resets_sequence() {
        let script = Script::new();
        let mut recognizer = TwoFingerDoubleTap::new();
        two_finger_tap(&mut recognizer, &script, 0, (1, 2), (0.0, 0.0), (50.0, 50.0));
        recognizer.feed(script.at(150, 3, TouchPhase::Start, 0.0, 0.0));
        recognizer.feed(script.at(160, 3, TouchPhase::Cancel, 0.0, 0.0));
        let after = two_finger_tap(&mut recognizer, &script, 200, (4, 5), (0.0, 0.0), (50.0, 50.0));
        assert!(after.is_none());
    }

    #[test]
    fn test_multi_touch_suppresses_single_tap() {
        let script = Script::new();
        let mut recognizer = TwoFingerDoubleTap::new();
        recognizer.feed(script.at(0, 1, TouchPhase::Start, 0.0, 0.0));
        assert!(!recognizer.suppresses_single_tap(script.start));
        recognizer.feed(script.at(10, 2, TouchPhase::Start, 50.0, 50.0));
        assert!(recognizer.suppresses_single_tap(script.start + Duration::from_millis(10)));
        recognizer.feed(script.at(60, 1, TouchPhase::End, 0.0, 0.0));
        recognizer.feed(script.at(70, 2, TouchPhase::End, 50.0, 50.0));
        assert!(recognizer.suppresses_single_tap(script.start + Duration::from_millis(300)));
        assert!(!recognizer.suppresses_single_tap(script.start + Duration::from_secs(2)));
    }

    #[test]
    fn test_pair_click_emulator() {
        let mut emulator = PairClickEmulator::default();
        assert!(emulator.secondary_click(Pos2::new(1.0, 2.0)).is_none());
        assert_eq!(emulator.pending(), Some(Pos2::new(1.0, 2.0)));
        assert_eq!(
            emulator.secondary_click(Pos2::new(3.0, 4.0)),
            Some([Pos2::new(1.0, 2.0), Pos2::new(3.0, 4.0)])
        );
        assert_eq!(emulator.pending(), None);

        emulator.secondary_click(Pos2::new(5.0, 5.0));
        emulator.cancel();
        assert!(emulator.secondary_click(Pos2::new(6.0, 6.0)).is_none());
    }
}
