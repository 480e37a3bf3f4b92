//! Stable heading estimation from raw magnetometer samples

use crate::compass::raw_heading;
use crate::math::circular_distance;
use crate::smoothing::SmoothingBuffer;
use crate::types::{HeadingSample, SMOOTHING_WINDOW};

/// Default deadband in degrees
const DEFAULT_DEADBAND: f64 = 2.0;

/// Heading estimator
///
/// Converts each sample into a raw heading, smooths the last
/// [`SMOOTHING_WINDOW`] headings with a seam-aware mean and only publishes
/// a new stable heading when it moved more than the deadband.
///
/// # Example
/// ```
/// use azimuth_guide::{HeadingEstimator, HeadingSample};
///
/// let mut estimator = HeadingEstimator::new();
///
/// // First well-formed sample always stabilizes
/// let first = estimator.ingest(&HeadingSample::new(0.0, 1.0, 0.0, 0));
/// assert_eq!(first, Some(0.0));
///
/// // Sub-deadband wobble is suppressed
/// let wobble = estimator.ingest(&HeadingSample::new(0.01, 1.0, 0.0, 100));
/// assert_eq!(wobble, None);
/// ```
#[derive(Debug, Clone)]
pub struct HeadingEstimator {
    buffer: SmoothingBuffer<SMOOTHING_WINDOW>,
    deadband: f64,
    stable: Option<f64>,
}

impl HeadingEstimator {
    /// Create an estimator with the default 2° deadband
    pub fn new() -> Self {
        Self::with_deadband(DEFAULT_DEADBAND)
    }

    pub fn with_deadband(deadband: f64) -> Self {
        Self {
            buffer: SmoothingBuffer::new(),
            deadband: deadband.max(0.0),
            stable: None,
        }
    }

    /// Feed one sample through the pipeline
    ///
    /// # Returns
    /// The new stable heading when it changed by more than the deadband,
    /// `None` otherwise. Malformed samples return `None` and leave the
    /// buffer untouched.
    pub fn ingest(&mut self, sample: &HeadingSample) -> Option<f64> {
        let Some(raw) = raw_heading(sample) else {
            log::debug!("Dropping malformed sample at {} ms", sample.timestamp_ms);
            return None;
        };

        self.buffer.push(raw);
        let smoothed = self.buffer.circular_mean()?;

        match self.stable {
            Some(previous) if circular_distance(previous, smoothed) <= self.deadband => None,
            _ => {
                self.stable = Some(smoothed);
                Some(smoothed)
            }
        }
    }

    /// Last published stable heading
    pub fn stable_heading(&self) -> Option<f64> {
        self.stable
    }

    pub fn buffered(&self) -> &SmoothingBuffer<SMOOTHING_WINDOW> {
        &self.buffer
    }

    pub fn deadband(&self) -> f64 {
        self.deadband
    }

    /// Forget all history
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.stable = None;
    }
}

impl Default for HeadingEstimator {
    fn default() -> Self {
        Self::new()
    }
}
