//! Compass rose rotation for presentation
//!
//! The rose turns opposite to the heading so north stays put on screen. The
//! target rotation is unwrapped (it may leave `[0, 360)`) so a heading that
//! crosses north turns the rose a few degrees instead of a full circle.

use crate::math::signed_delta;

/// Next unwrapped rotation after a new stable heading
///
/// # Example
/// ```
/// use azimuth_guide::next_rotation;
///
/// // Heading crossing north from 359° to 1° turns the rose by -2°
/// assert_eq!(next_rotation(-359.0, 1.0), -361.0);
/// ```
pub fn next_rotation(previous_rotation: f64, heading: f64) -> f64 {
    previous_rotation + signed_delta(previous_rotation, -heading)
}

/// Ease-out tween between two rotations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationEasing {
    from: f64,
    to: f64,
    start_ms: u64,
    duration_ms: u32,
}

impl RotationEasing {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            start_ms: 0,
            duration_ms,
        }
    }

    /// Start easing toward the rotation for `heading` from wherever the
    /// rose is at `now_ms`
    pub fn retarget(&mut self, heading: f64, now_ms: u64) -> f64 {
        self.from = self.value_at(now_ms);
        self.to = next_rotation(self.to, heading);
        self.start_ms = now_ms;
        self.to
    }

    /// Rotation shown at `now_ms`
    pub fn value_at(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f64;
        let t = (elapsed / self.duration_ms as f64).clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }

    /// Rotation the tween is heading for
    pub fn target(&self) -> f64 {
        self.to
    }
}
