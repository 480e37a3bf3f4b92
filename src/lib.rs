//! Azimuth Guide - heading alignment guidance for orienting a device or a
//! solar panel toward a target azimuth
//!
//! The engine ingests raw, noisy magnetometer samples, turns them into a
//! stable compass heading, compares it with a fixed target azimuth and
//! drives user feedback: an alignment band, a compass rose rotation and a
//! haptic pulse on alignment entry. Permission handling and sensor access
//! sit behind per-platform capabilities selected once per session.
//!
//! # Pipeline
//!
//! ```text
//! SensorSource ──▶ HeadingEstimator ──▶ AlignmentClassifier ──▶ GuidanceController ──▶ frames
//!                  (atan2, ring mean,    (circular distance,     (lifecycle, haptics,
//!                   2° deadband)          bands, edge trigger)    rotation easing)
//!        ▲
//!        └── started only once PermissionManager reports Granted
//! ```
//!
//! # Features
//!
//! - Seam-aware smoothing over the last five headings
//! - Deadband so sensor noise never reaches the display
//! - Aligned / Near / Misaligned bands with edge-triggered entry
//! - Android, iOS and Web permission adapters
//! - Scoped sensor release: no callback reaches a stopped session
//!
//! # Quick Start
//!
//! ```rust
//! use azimuth_guide::{AlignmentClassifier, AlignmentState, HeadingEstimator, HeadingSample, TargetAzimuth};
//!
//! let mut estimator = HeadingEstimator::new();
//! let mut classifier = AlignmentClassifier::new();
//! let target = TargetAzimuth::new(180.0);
//!
//! // Magnetometer reading in µT
//! let sample = HeadingSample::new(0.0, -32.0, -18.0, 0);
//!
//! if let Some(heading) = estimator.ingest(&sample) {
//!     let reading = classifier.classify(heading, target);
//!     assert_eq!(reading.state, AlignmentState::Aligned);
//!     assert!(reading.just_entered);
//! }
//! ```
//!
//! Magnetic declination is not corrected; headings are magnetic.

pub mod alignment;
pub mod compass;
mod config;
pub mod controller;
pub mod error;
pub mod estimator;
pub mod haptics;
mod math;
pub mod mock;
pub mod permission;
pub mod rotation;
pub mod sensor;
pub mod smoothing;
mod types;

// Re-export all public types and functions
pub use alignment::{AlignmentBands, AlignmentClassifier, AlignmentLabel, AlignmentReading};
pub use compass::raw_heading;
pub use config::SAMPLE_INTERVAL_RANGE_MS;
pub use controller::{
    FRAME_STREAM_CAPACITY, GuidanceController, GuidanceFrame, GuidanceStatus, SENSOR_QUEUE_CAPACITY,
};
pub use error::{GuidanceError, Result};
pub use estimator::HeadingEstimator;
pub use haptics::{HapticFeedback, NoHaptics};
pub use math::{
    DEG_TO_RAD, DISTANCE_STEPS_PER_DEGREE, RAD_TO_DEG, circular_distance, display_degrees,
    normalize_degrees, signed_delta,
};
pub use permission::{
    AndroidPermissions, IosPermissions, PermissionApi, PermissionKind, PermissionLifecycle,
    PermissionManager, PermissionProvider, PermissionResponse, WebPermissions, provider_for,
};
pub use rotation::{RotationEasing, next_rotation};
pub use sensor::{SensorCallback, SensorEvent, SensorSource, SubscriptionHandle, UnsupportedSensor};
pub use smoothing::SmoothingBuffer;
pub use types::*;
