//! Alignment classification against the target azimuth

use crate::math::circular_distance;
use crate::types::{AlignmentState, GuidanceSettings, TargetAzimuth};

/// Coarse text label shown under the compass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentLabel {
    Aligned,
    NotAligned,
}

/// Outcome of classifying one stable heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentReading {
    /// Minimal circular distance to the target, in `[0, 180]`
    pub distance: f64,
    /// Band the distance falls into
    pub state: AlignmentState,
    /// Secondary aligned/not-aligned label from the coarse cut
    pub label: AlignmentLabel,
    /// True only on the sample that entered `Aligned`
    pub just_entered: bool,
}

/// Band thresholds in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentBands {
    pub aligned_below: f64,
    pub near_below: f64,
    pub label_aligned_below: f64,
}

impl AlignmentBands {
    /// Map a distance onto a band; lower cuts are exclusive
    pub fn state_for(&self, distance: f64) -> AlignmentState {
        if distance < self.aligned_below {
            AlignmentState::Aligned
        } else if distance < self.near_below {
            AlignmentState::Near
        } else {
            AlignmentState::Misaligned
        }
    }

    pub fn label_for(&self, distance: f64) -> AlignmentLabel {
        if distance < self.label_aligned_below {
            AlignmentLabel::Aligned
        } else {
            AlignmentLabel::NotAligned
        }
    }
}

impl Default for AlignmentBands {
    fn default() -> Self {
        Self::from(&GuidanceSettings::default())
    }
}

impl From<&GuidanceSettings> for AlignmentBands {
    fn from(settings: &GuidanceSettings) -> Self {
        Self {
            aligned_below: settings.aligned_below_degrees,
            near_below: settings.near_below_degrees,
            label_aligned_below: settings.label_aligned_below_degrees,
        }
    }
}

/// Edge-triggered alignment classifier
///
/// Remembers only the last emitted band, so it can report the single
/// sample on which the heading entered `Aligned`.
///
/// # Example
/// ```
/// use azimuth_guide::{AlignmentClassifier, AlignmentState, TargetAzimuth};
///
/// let mut classifier = AlignmentClassifier::new();
/// let target = TargetAzimuth::new(180.0);
///
/// let reading = classifier.classify(170.0, target);
/// assert_eq!(reading.distance, 10.0);
/// assert_eq!(reading.state, AlignmentState::Near);
/// assert!(!reading.just_entered);
/// ```
#[derive(Debug, Clone)]
pub struct AlignmentClassifier {
    bands: AlignmentBands,
    last_state: Option<AlignmentState>,
}

impl AlignmentClassifier {
    pub fn new() -> Self {
        Self::with_bands(AlignmentBands::default())
    }

    pub fn with_bands(bands: AlignmentBands) -> Self {
        Self {
            bands,
            last_state: None,
        }
    }

    /// Classify a stable heading against the session target
    pub fn classify(&mut self, heading: f64, target: TargetAzimuth) -> AlignmentReading {
        let distance = circular_distance(target.degrees(), heading);
        let state = self.bands.state_for(distance);
        let just_entered =
            state == AlignmentState::Aligned && self.last_state != Some(AlignmentState::Aligned);
        self.last_state = Some(state);

        AlignmentReading {
            distance,
            state,
            label: self.bands.label_for(distance),
            just_entered,
        }
    }

    /// Band emitted by the previous classification
    pub fn last_state(&self) -> Option<AlignmentState> {
        self.last_state
    }

    pub fn bands(&self) -> &AlignmentBands {
        &self.bands
    }

    pub fn reset(&mut self) {
        self.last_state = None;
    }
}

impl Default for AlignmentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
