//! Angle arithmetic on the compass circle

/// Mathematical constants
pub const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
pub const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Folded distances are snapped to steps of `1 / DISTANCE_STEPS_PER_DEGREE`
pub const DISTANCE_STEPS_PER_DEGREE: f64 = 1e9;

/// Wrap a finite angle into `[0, 360)`
///
/// Non-finite input has no bearing and comes back as NaN; callers reject it
/// before it gets here.
///
/// # Example
/// ```
/// use azimuth_guide::normalize_degrees;
///
/// assert_eq!(normalize_degrees(-90.0), 270.0);
/// assert_eq!(normalize_degrees(720.0), 0.0);
/// ```
pub fn normalize_degrees(angle: f64) -> f64 {
    ((angle % 360.0) + 360.0) % 360.0
}

/// Minimal distance between two bearings, in `[0, 180]`
///
/// The result is snapped to a nanodegree grid, so bearings mirrored
/// around a reference (`r - d` and `r + d`) land on the same distance even
/// when wrapping leaves rounding residue on one side.
///
/// # Example
/// ```
/// use azimuth_guide::circular_distance;
///
/// assert_eq!(circular_distance(10.0, 200.0), 170.0);
/// assert_eq!(circular_distance(350.0, 10.0), 20.0);
/// ```
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let mut distance = (normalize_degrees(a) - normalize_degrees(b)).abs();
    if distance > 180.0 {
        distance = (distance - 360.0).abs();
    }
    (distance * DISTANCE_STEPS_PER_DEGREE).round() / DISTANCE_STEPS_PER_DEGREE
}

/// Shortest signed turn from `from` to `to`, in `(-180, 180]`
pub fn signed_delta(from: f64, to: f64) -> f64 {
    let delta = normalize_degrees(to - from);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Round a bearing to whole degrees for display, folding 360 back to 0
pub fn display_degrees(angle: f64) -> u16 {
    (normalize_degrees(angle).round() as u16) % 360
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_range() {
        for angle in [-720.5, -360.0, -0.0, 0.0, 45.0, 359.999, 360.0, 1234.5, -1e-17] {
            let n = normalize_degrees(angle);
            assert!((0.0..360.0).contains(&n), "{angle} normalized to {n}");
            assert_eq!(normalize_degrees(n), n, "not idempotent for {angle}");
        }
    }

    #[test]
    fn test_circular_distance_fold() {
        assert_eq!(circular_distance(10.0, 200.0), 170.0);
        assert_eq!(circular_distance(200.0, 10.0), 170.0);
        assert_eq!(circular_distance(0.0, 180.0), 180.0);
        assert_eq!(circular_distance(359.0, 1.0), 2.0);
        assert_eq!(circular_distance(-10.0, 10.0), 20.0);
    }

    #[test]
    fn test_normalize_non_finite() {
        assert!(normalize_degrees(f64::INFINITY).is_nan());
        assert!(normalize_degrees(f64::NEG_INFINITY).is_nan());
        assert!(normalize_degrees(f64::NAN).is_nan());
    }

    #[test]
    fn test_circular_distance_mirrored_on_cut() {
        // 0.2 - 10 wraps to 350.2, whose difference from 0.2 is not exactly 350
        assert_eq!(circular_distance(0.2, normalize_degrees(0.2 - 10.0)), 10.0);
        assert_eq!(circular_distance(0.2, 10.2), 10.0);
        assert_eq!(circular_distance(359.7, normalize_degrees(359.7 + 30.0)), 30.0);
        assert_eq!(circular_distance(359.7, 329.7), 30.0);
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(signed_delta(350.0, 10.0), 20.0);
        assert_eq!(signed_delta(10.0, 350.0), -20.0);
        assert_eq!(signed_delta(0.0, 180.0), 180.0);
    }

    #[test]
    fn test_display_degrees() {
        assert_eq!(display_degrees(359.6), 0);
        assert_eq!(display_degrees(359.4), 359);
        assert_eq!(display_degrees(10.5), 11);
    }

    #[test]
    fn test_conversion_constants() {
        assert!((90.0 * DEG_TO_RAD - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((core::f64::consts::PI * RAD_TO_DEG - 180.0).abs() < 1e-12);
    }
}
