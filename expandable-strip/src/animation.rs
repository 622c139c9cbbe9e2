//! Easing and timed interpolation for the expand/collapse transition.
use std::time::{Duration, Instant};

use crate::px::Px;

/// Accelerate-decelerate mapping.
/// Input: linear progress in [0.0, 1.0].
/// Output: eased progress in [0.0, 1.0].
pub(crate) fn easing(progress: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    ((t + 1.0) * std::f32::consts::PI).cos() / 2.0 + 0.5
}

/// A fixed-duration timeline started at a known instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tween {
    start: Instant,
    duration: Duration,
}

impl Tween {
    /// Starts a timeline of `duration` at `start`.
    pub fn new(start: Instant, duration: Duration) -> Self {
        Self { start, duration }
    }

    /// Linear progress at `now`, clamped to [0.0, 1.0].
    pub fn raw_progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Eased progress at `now`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.is_finished(now) {
            // Exact end value regardless of float error in the easing curve.
            return 1.0;
        }
        easing(self.raw_progress(now))
    }

    /// Whether the timeline has run its full duration at `now`.
    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }
}

/// Integer interpolation that truncates towards zero like an integer
/// animator does.
pub(crate) fn lerp_px_truncated(from: Px, to: Px, progress: f32) -> Px {
    Px::truncate_from_f32(from.to_f32() + progress * (to - from).to_f32())
}

pub(crate) fn lerp_px_rounded(from: Px, to: Px, progress: f32) -> Px {
    Px::round_from_f32(from.to_f32() + progress * (to - from).to_f32())
}

pub(crate) fn lerp_f32(from: f32, to: f32, progress: f32) -> f32 {
    from + progress * (to - from)
}
