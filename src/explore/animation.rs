//! Timing curves and the camera animation

use crate::explore::Coordinate;
use instant::{Duration, Instant};

/// `ln(1000)`: the spring envelope decays to 0.1% of its amplitude by the end of the animation
const SPRING_SETTLE_LN: f32 = 6.907_755;

/// Time elapsed from `start` to `now`, zero if `now` is earlier
#[inline]
pub(crate) fn elapsed_between(start: Instant, now: Instant) -> Duration {
    if now > start {
        now - start
    } else {
        Duration::ZERO
    }
}

/// Progress of an underdamped spring animation.
///
/// `damping` is the damping ratio (below 1.0 oscillates), `initial_velocity` is
/// expressed in animation distances per second. Progress starts at 0.0, may
/// overshoot 1.0 on the way, and is exactly 1.0 from `duration` on.
pub fn spring_progress(elapsed: f32, duration: f32, damping: f32, initial_velocity: f32) -> f32 {
    if duration <= 0.0 || elapsed >= duration {
        return 1.0;
    }
    let t = elapsed.max(0.0);
    let zeta = damping.clamp(0.01, 0.999);
    let omega = SPRING_SETTLE_LN / (zeta * duration);
    let omega_d = omega * (1.0 - zeta * zeta).sqrt();

    let envelope = (-zeta * omega * t).exp();
    let displacement = envelope
        * ((omega_d * t).cos() + ((zeta * omega - initial_velocity) / omega_d) * (omega_d * t).sin());

    1.0 - displacement
}

/// Cubic ease-in-out over `0.0..=1.0`
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Moves the map center from one coordinate to another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAnimation {
    pub from: Coordinate,
    pub to: Coordinate,
    pub started: Instant,
    pub duration: Duration,
}

impl CameraAnimation {
    pub fn new(from: Coordinate, to: Coordinate, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    /// Recenters without animating
    pub fn jump(to: Coordinate, now: Instant) -> Self {
        Self::new(to, to, now, Duration::ZERO)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        elapsed_between(self.started, now) >= self.duration
    }

    /// Map center at `now`. Longitude takes the short way across the antimeridian.
    pub fn sample(&self, now: Instant) -> Coordinate {
        if self.is_finished(now) {
            return self.to;
        }
        let linear =
            elapsed_between(self.started, now).as_secs_f64() / self.duration.as_secs_f64();
        let p = ease_in_out(linear as f32) as f64;

        let d_lat = self.to.latitude - self.from.latitude;
        let d_lon = (self.to.longitude - self.from.longitude + 540.0).rem_euclid(360.0) - 180.0;

        let mut longitude = self.from.longitude + d_lon * p;
        if longitude > 180.0 {
            longitude -= 360.0;
        } else if longitude < -180.0 {
            longitude += 360.0;
        }

        Coordinate::new(self.from.latitude + d_lat * p, longitude)
    }
}
