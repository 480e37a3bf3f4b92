//! Planar compass heading from a magnetometer vector

use crate::math::{RAD_TO_DEG, normalize_degrees};
use crate::types::HeadingSample;

/// Calculate the planar magnetic heading of a sample
///
/// The device is assumed to be held flat; no tilt compensation is applied
/// and the z axis does not take part. The angle is `atan2(x, y)` in degrees,
/// wrapped into `[0, 360)`.
///
/// # Arguments
/// * `sample` - Magnetometer reading
///
/// # Returns
/// Heading in degrees (range: 0° to 360°, 0° = magnetic north), or `None`
/// when any axis is missing or not finite
///
/// # Example
/// ```
/// use azimuth_guide::{HeadingSample, compass::raw_heading};
///
/// let east = HeadingSample::new(1.0, 0.0, -30.0, 0);
/// assert!((raw_heading(&east).unwrap() - 90.0).abs() < 1e-9);
/// ```
pub fn raw_heading(sample: &HeadingSample) -> Option<f64> {
    if !sample.is_well_formed() {
        return None;
    }

    let field = &sample.magnetic;
    let heading_rad = field.x.atan2(field.y);

    Some(normalize_degrees(heading_rad * RAD_TO_DEG))
}
