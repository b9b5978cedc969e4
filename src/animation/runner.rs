//! The clock that drives one step's animation to completion.

use web_time::{Duration, Instant};

use super::easing::Easing;
use crate::geometry::FlipGeometry;

/// A sampled animation frame for hosts that draw per-frame instead of
/// handing the whole transition to a declarative renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipFrame {
    /// Eased progress in [0, 1].
    pub progress: f32,
    /// Rotation angle in degrees, 0 at start, the geometry's endpoint
    /// (±180) at completion.
    pub angle_deg: f32,
    /// Whether the rotation has passed the midpoint: the incoming face
    /// becomes visible and the background mask covers the outgoing
    /// face's stale half.
    pub past_midpoint: bool,
}

/// Drives one step's animation clock from start to transition-end.
///
/// Completion is observed, not pushed: the transition-end occurrence is
/// the first [`is_complete`](Self::is_complete) query at or past the end
/// time. A zero duration is an animation that completes on its first
/// observation, never "no animation" - callers relying on completion
/// ordering see the same sequence either way.
pub struct FlipAnimation {
    /// When the animation started.
    start_time: Instant,
    /// Total duration of the step.
    duration: Duration,
    /// Rotation endpoint in degrees, taken from the geometry.
    rotation_end_deg: f32,
    /// Easing applied to raw progress.
    easing: Easing,
}

impl FlipAnimation {
    /// Start the clock now for the given geometry.
    #[must_use]
    pub fn new(geometry: &FlipGeometry, easing: Easing) -> Self {
        Self {
            start_time: Instant::now(),
            duration: geometry.duration,
            rotation_end_deg: geometry.rotation_end_deg,
            easing,
        }
    }

    /// Create with an explicit start time (for testing).
    #[cfg(test)]
    pub fn with_start_time(
        start_time: Instant,
        geometry: &FlipGeometry,
        easing: Easing,
    ) -> Self {
        Self {
            start_time,
            duration: geometry.duration,
            rotation_end_deg: geometry.rotation_end_deg,
            easing,
        }
    }

    /// Total step duration.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Normalized raw progress (0.0 to 1.0). Zero-duration animations
    /// are complete from the first observation on.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start_time);

        if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    /// Whether the transition-end point has been reached.
    #[must_use]
    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Sample the visual state at `now`.
    #[must_use]
    pub fn frame(&self, now: Instant) -> FlipFrame {
        let eased = self.easing.evaluate(self.progress(now));
        FlipFrame {
            progress: eased,
            angle_deg: eased * self.rotation_end_deg,
            past_midpoint: eased >= 0.5,
        }
    }
}

impl std::fmt::Debug for FlipAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlipAnimation")
            .field("duration", &self.duration)
            .field("rotation_end_deg", &self.rotation_end_deg)
            .finish_non_exhaustive()
    }
}
