//! Transient notification label
//!
//! The label slides up from below the visible area with a damped spring, then
//! fades out. It is driven purely by timestamps so the UI can sample it every
//! frame with [`NotificationLabel::frame`].

use crate::explore::animation::{elapsed_between, ease_in_out, spring_progress};
use instant::{Duration, Instant};

/// Durations and spring parameters of the notification animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotificationTiming {
    /// Slide-in duration
    pub slide: Duration,
    /// Fade-out duration, starting when the slide completes
    pub fade: Duration,
    /// Spring damping ratio of the slide
    pub damping: f32,
    /// Spring initial velocity (label travels per second)
    pub initial_velocity: f32,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            slide: Duration::from_secs(2),
            fade: Duration::from_secs(1),
            damping: 0.5,
            initial_velocity: 0.5,
        }
    }
}

/// Label geometry and opacity at an instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelFrame {
    /// Vertical position: 0.0 = resting position, 1.0 = just below the visible area.
    /// Slightly negative while the spring overshoots.
    pub offset: f32,
    /// Opacity in `0.0..=1.0`
    pub alpha: f32,
}

impl LabelFrame {
    pub const HIDDEN: Self = Self {
        offset: 0.0,
        alpha: 0.0,
    };
}

#[derive(Debug, Clone, Copy)]
struct Shown {
    at: Instant,
    from_offset: f32,
}

/// The notification label of the map screen
#[derive(Debug, Clone, Default)]
pub struct NotificationLabel {
    text: String,
    shown: Option<Shown>,
    timing: NotificationTiming,
}

impl NotificationLabel {
    pub fn new(timing: NotificationTiming) -> Self {
        Self {
            text: String::new(),
            shown: None,
            timing,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timing(&self) -> &NotificationTiming {
        &self.timing
    }

    /// Sets the text and starts the slide-in.
    ///
    /// A call while the previous message is still on screen restarts the slide
    /// from wherever the label currently is; otherwise it starts below the
    /// visible area.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        let from_offset = if self.is_animating(now) {
            self.frame(now).offset
        } else {
            1.0
        };
        self.text = message.into();
        self.shown = Some(Shown {
            at: now,
            from_offset,
        });
        tracing::debug!("Notification: {}", self.text);
    }

    /// Position and opacity at `now`
    pub fn frame(&self, now: Instant) -> LabelFrame {
        let Some(shown) = self.shown else {
            return LabelFrame::HIDDEN;
        };
        let elapsed = elapsed_between(shown.at, now);
        let slide = self.timing.slide;
        let fade = self.timing.fade;

        if elapsed < slide {
            let progress = spring_progress(
                elapsed.as_secs_f32(),
                slide.as_secs_f32(),
                self.timing.damping,
                self.timing.initial_velocity,
            );
            LabelFrame {
                offset: shown.from_offset * (1.0 - progress),
                alpha: 1.0,
            }
        } else if elapsed < slide + fade {
            let t = (elapsed - slide).as_secs_f32() / fade.as_secs_f32();
            LabelFrame {
                offset: 0.0,
                alpha: 1.0 - ease_in_out(t),
            }
        } else {
            LabelFrame::HIDDEN
        }
    }

    /// True until the fade-out of the last message has completed
    pub fn is_animating(&self, now: Instant) -> bool {
        self.shown.is_some_and(|shown| {
            elapsed_between(shown.at, now) < self.timing.slide + self.timing.fade
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_hidden_until_shown() {
        let label = NotificationLabel::default();
        let now = Instant::now();
        assert_eq!(label.frame(now), LabelFrame::HIDDEN);
        assert_eq!(label.frame(now).alpha, 0.0);
        assert!(!label.is_animating(now));
        assert_eq!(label.text(), "");
    }

    #[test]
    fn test_slide_then_fade() {
        let mut label = NotificationLabel::default();
        let now = Instant::now();
        label.show("Distance is 1.00 km", now);

        assert_eq!(label.text(), "Distance is 1.00 km");
        let start = label.frame(now);
        assert_eq!(start.alpha, 1.0);
        assert!((start.offset - 1.0).abs() < 1e-5);

        let sliding = label.frame(now + ms(1000));
        assert_eq!(sliding.alpha, 1.0);
        assert!(sliding.offset.abs() < 1.0);

        let fading = label.frame(now + ms(2500));
        assert_eq!(fading.offset, 0.0);
        assert!((fading.alpha - 0.5).abs() < 1e-3, "got {}", fading.alpha);

        assert!(label.is_animating(now + ms(2999)));
        assert_eq!(label.frame(now + ms(3000)).alpha, 0.0);
        assert!(!label.is_animating(now + ms(3000)));
    }

    #[test]
    fn test_show_while_sliding_restarts_from_current_position() {
        let mut label = NotificationLabel::default();
        let now = Instant::now();
        label.show("first", now);

        let later = now + ms(300);
        let current = label.frame(later).offset;
        label.show("second", later);

        assert_eq!(label.text(), "second");
        let restarted = label.frame(later);
        assert!((restarted.offset - current).abs() < 1e-5);
        assert_eq!(restarted.alpha, 1.0);
        // The restarted animation runs its full course from the second call.
        assert!(label.is_animating(later + ms(2900)));
        assert_eq!(label.frame(later + ms(3000)).alpha, 0.0);
    }

    #[test]
    fn test_show_during_fade_becomes_opaque_in_place() {
        let mut label = NotificationLabel::default();
        let now = Instant::now();
        label.show("first", now);
        let fading = now + ms(2500);
        label.show("second", fading);
        let frame = label.frame(fading);
        assert_eq!(frame.alpha, 1.0);
        assert!(frame.offset.abs() < 1e-5);
    }

    #[test]
    fn test_show_after_finish_starts_below() {
        let mut label = NotificationLabel::default();
        let now = Instant::now();
        label.show("first", now);
        let done = now + ms(5000);
        label.show("second", done);
        assert!((label.frame(done).offset - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_custom_timing() {
        let timing = NotificationTiming {
            slide: ms(100),
            fade: ms(100),
            ..Default::default()
        };
        let mut label = NotificationLabel::new(timing);
        let now = Instant::now();
        label.show("quick", now);
        assert_eq!(label.frame(now + ms(200)).alpha, 0.0);
        assert_eq!(label.timing().slide, ms(100));
    }
}
