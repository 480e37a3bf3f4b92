//! Core types shared across the guidance pipeline

use crate::math::normalize_degrees;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Target used when the upstream result does not carry a usable azimuth
pub const DEFAULT_TARGET_AZIMUTH: f64 = 180.0;

/// Number of raw headings averaged by the smoothing buffer
pub const SMOOTHING_WINDOW: usize = 5;

/// A single magnetometer reading
///
/// Produced by a [`SensorSource`](crate::sensor::SensorSource) and consumed
/// immediately by the [`HeadingEstimator`](crate::estimator::HeadingEstimator).
/// Missing axes are carried as `NaN` so the estimator can reject the sample
/// as a whole.
///
/// # Example
/// ```
/// use azimuth_guide::HeadingSample;
///
/// let sample = HeadingSample::from_axes(Some(12.0), None, Some(-40.0), 250);
/// assert!(!sample.is_well_formed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSample {
    /// Magnetic field vector in µT, device frame
    pub magnetic: Vector3<f64>,
    /// Monotonic timestamp in milliseconds
    pub timestamp_ms: u64,
}

impl HeadingSample {
    pub fn new(x: f64, y: f64, z: f64, timestamp_ms: u64) -> Self {
        Self {
            magnetic: Vector3::new(x, y, z),
            timestamp_ms,
        }
    }

    /// Build a sample from nullable platform axes
    pub fn from_axes(x: Option<f64>, y: Option<f64>, z: Option<f64>, timestamp_ms: u64) -> Self {
        Self::new(
            x.unwrap_or(f64::NAN),
            y.unwrap_or(f64::NAN),
            z.unwrap_or(f64::NAN),
            timestamp_ms,
        )
    }

    /// True when every axis is a finite number
    pub fn is_well_formed(&self) -> bool {
        self.magnetic.iter().all(|axis| axis.is_finite())
    }
}

/// Fixed target azimuth for one guidance session
///
/// Always held normalized to `[0, 360)`.
///
/// # Example
/// ```
/// use azimuth_guide::TargetAzimuth;
///
/// assert_eq!(TargetAzimuth::parse(Some("-90")).degrees(), 270.0);
/// assert_eq!(TargetAzimuth::parse(Some("south")).degrees(), 180.0);
/// assert_eq!(TargetAzimuth::parse(None).degrees(), 180.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetAzimuth(f64);

impl TargetAzimuth {
    /// Create a target from degrees; non-finite input falls back to the default
    pub fn new(degrees: f64) -> Self {
        if degrees.is_finite() {
            Self(normalize_degrees(degrees))
        } else {
            Self(DEFAULT_TARGET_AZIMUTH)
        }
    }

    /// Parse the azimuth handed over by the yield computation screen
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim).and_then(|v| v.parse::<f64>().ok()) {
            Some(degrees) => Self::new(degrees),
            None => {
                log::debug!("No usable target azimuth, using {DEFAULT_TARGET_AZIMUTH}°");
                Self::default()
            }
        }
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }
}

impl Default for TargetAzimuth {
    fn default() -> Self {
        Self(DEFAULT_TARGET_AZIMUTH)
    }
}

/// Alignment band of the current heading relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignmentState {
    /// Inside the tight alignment cut
    Aligned,
    /// Close, keep turning
    Near,
    /// Far from the target
    Misaligned,
}

/// Permission lifecycle state
///
/// - **Unknown**: nothing asked yet
/// - **Pending**: a platform prompt is in flight
/// - **Granted**: terminal for the session
/// - **Denied**: recoverable through settings and retry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Unknown,
    Pending,
    Granted,
    Denied,
}

/// Operating system the session runs on
///
/// Selects permission and sensor adapters at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Web,
}

/// Guidance engine settings
///
/// # Example
/// ```
/// use azimuth_guide::GuidanceSettings;
///
/// let settings = GuidanceSettings {
///     sample_interval_ms: 150,
///     deadband_degrees: 3.0,
///     ..Default::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceSettings {
    /// Magnetometer update interval in milliseconds (100 to 200)
    pub sample_interval_ms: u32,
    /// Minimum circular change before the stable heading moves
    pub deadband_degrees: f64,
    /// Distances strictly below this are `Aligned`
    pub aligned_below_degrees: f64,
    /// Distances strictly below this (and not aligned) are `Near`
    pub near_below_degrees: f64,
    /// Cut line of the coarse aligned/not-aligned text label
    pub label_aligned_below_degrees: f64,
    /// Haptic pulse length on alignment entry
    pub haptic_pulse_ms: u32,
    /// Duration of the compass rose easing toward a new heading
    pub rotation_duration_ms: u32,
}

impl Default for GuidanceSettings {
    fn default() -> Self {
        Self {
            sample_interval_ms: 100,
            deadband_degrees: 2.0,
            aligned_below_degrees: 10.0,
            near_below_degrees: 30.0,
            label_aligned_below_degrees: 15.0,
            haptic_pulse_ms: 50,
            rotation_duration_ms: 200,
        }
    }
}
