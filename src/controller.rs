//! Guidance session controller
//!
//! Owns one guidance session: asks for permission, subscribes to the
//! magnetometer once access is granted, routes each event through the
//! [`HeadingEstimator`] and [`AlignmentClassifier`], and publishes
//! [`GuidanceFrame`]s to the presentation layer.
//!
//! The sensor callback only forwards events into a channel. The host drains
//! it with [`GuidanceController::process_pending`] from its event loop, so
//! the pipeline has a single writer. Stopping (or dropping) the controller
//! unsubscribes synchronously and drops the receiving end, so no event can
//! reach a retired session.
//!
//! Both the sensor queue and every frame stream are bounded. When the host
//! falls behind, newer items are dropped until it drains again.
//!
//! # Example
//! ```
//! use azimuth_guide::mock::{MockPermissionApi, MockSensor, RecordingHaptics};
//! use azimuth_guide::{
//!     GuidanceController, GuidanceSettings, GuidanceStatus, HeadingSample, Platform,
//!     TargetAzimuth, provider_for,
//! };
//!
//! let sensor = MockSensor::new();
//! let mut controller = GuidanceController::new(
//!     GuidanceSettings::default(),
//!     TargetAzimuth::parse(Some("180")),
//!     sensor.clone(),
//!     provider_for(Platform::Android, MockPermissionApi::granting()),
//!     RecordingHaptics::new(),
//! )?;
//!
//! assert_eq!(controller.start(), GuidanceStatus::Active);
//!
//! sensor.emit_reading(0.0, -30.0, -20.0, 0); // pointing south
//! let frames = controller.process_pending();
//! assert_eq!(frames[0].heading_degrees, 180);
//!
//! controller.stop();
//! assert!(!sensor.emit_reading(0.0, 30.0, -20.0, 100));
//! # Ok::<(), azimuth_guide::GuidanceError>(())
//! ```

use crate::alignment::{AlignmentBands, AlignmentClassifier, AlignmentLabel};
use crate::error::Result;
use crate::estimator::HeadingEstimator;
use crate::haptics::HapticFeedback;
use crate::math::display_degrees;
use crate::permission::{PermissionManager, PermissionProvider};
use crate::rotation::RotationEasing;
use crate::sensor::{SensorEvent, SensorSource, SubscriptionHandle};
use crate::types::{
    AlignmentState, GuidanceSettings, HeadingSample, PermissionState, Platform, TargetAzimuth,
};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

/// Sensor events held between two `process_pending` calls
pub const SENSOR_QUEUE_CAPACITY: usize = 256;

/// Frames held per unread `frames()` receiver
pub const FRAME_STREAM_CAPACITY: usize = 64;

/// Lifecycle signal shown by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidanceStatus {
    /// Not started yet
    Idle,
    /// Waiting for the permission prompt
    Loading,
    /// Subscribed and delivering frames
    Active,
    /// Access refused; retry is possible
    PermissionDenied,
    /// No compass, or the platform failed; no more samples are processed
    SensorUnavailable,
    /// Session ended
    Stopped,
}

/// One update for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceFrame {
    /// Stable heading rounded to whole degrees, `0..360`
    pub heading_degrees: u16,
    /// Distance to the target rounded to whole degrees, `0..=180`
    pub distance_degrees: u16,
    pub alignment: AlignmentState,
    pub label: AlignmentLabel,
    /// Unwrapped rotation the compass rose eases toward
    pub rotation_angle: f64,
    /// Set on the frame that entered `Aligned`
    pub just_aligned: bool,
    /// Unrounded stable heading
    pub heading: f64,
    /// Unrounded distance
    pub distance: f64,
    /// Timestamp of the sample that produced the frame
    pub timestamp_ms: u64,
}

/// Guidance session controller
pub struct GuidanceController<S: SensorSource, P: PermissionProvider, H: HapticFeedback> {
    settings: GuidanceSettings,
    target: TargetAzimuth,
    sensor: S,
    permissions: PermissionManager<P>,
    haptics: H,
    estimator: HeadingEstimator,
    classifier: AlignmentClassifier,
    easing: RotationEasing,
    status: GuidanceStatus,
    subscription: Option<SubscriptionHandle>,
    events: Option<Receiver<SensorEvent>>,
    listeners: Vec<Sender<GuidanceFrame>>,
    latest: Option<GuidanceFrame>,
}

impl<S: SensorSource, P: PermissionProvider, H: HapticFeedback> GuidanceController<S, P, H> {
    /// Create a controller for one session
    ///
    /// Fails only when `settings` do not validate.
    pub fn new(
        settings: GuidanceSettings,
        target: TargetAzimuth,
        sensor: S,
        provider: P,
        haptics: H,
    ) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            settings,
            target,
            sensor,
            permissions: PermissionManager::new(provider),
            haptics,
            estimator: HeadingEstimator::with_deadband(settings.deadband_degrees),
            classifier: AlignmentClassifier::with_bands(AlignmentBands::from(&settings)),
            easing: RotationEasing::new(settings.rotation_duration_ms),
            status: GuidanceStatus::Idle,
            subscription: None,
            events: None,
            listeners: Vec::new(),
            latest: None,
        })
    }

    /// Begin the session: request permission, then subscribe
    pub fn start(&mut self) -> GuidanceStatus {
        if self.status != GuidanceStatus::Idle {
            log::debug!("Guidance session already started ({:?})", self.status);
            return self.status;
        }

        log::info!(
            "Starting guidance toward {:.1}° on {:?}",
            self.target.degrees(),
            self.permissions.platform()
        );
        self.status = GuidanceStatus::Loading;
        let outcome = self.permissions.request();
        self.apply_permission(outcome)
    }

    /// Deliver the answer of a permission prompt that was still open
    pub fn on_permission_result(&mut self, granted: bool) -> GuidanceStatus {
        if self.status != GuidanceStatus::Loading {
            log::warn!(
                "Ignoring permission result in {:?} state (granted: {})",
                self.status,
                granted
            );
            return self.status;
        }
        let outcome = self.permissions.complete(granted);
        self.apply_permission(outcome)
    }

    /// Ask again after the user was sent to settings
    pub fn retry_permission(&mut self) -> GuidanceStatus {
        if self.status != GuidanceStatus::PermissionDenied {
            return self.status;
        }
        self.status = GuidanceStatus::Loading;
        let outcome = self.permissions.retry();
        self.apply_permission(outcome)
    }

    /// Open the platform settings so the user can grant access
    ///
    /// Failure is returned for display but leaves the session untouched.
    pub fn open_settings(&mut self) -> Result<()> {
        self.permissions.open_settings()
    }

    fn apply_permission(&mut self, outcome: Result<PermissionState>) -> GuidanceStatus {
        match outcome {
            Ok(PermissionState::Granted) => self.start_sensor(),
            Ok(PermissionState::Denied) => {
                log::info!("Sensor permission denied");
                self.status = GuidanceStatus::PermissionDenied;
            }
            Ok(PermissionState::Pending | PermissionState::Unknown) => {
                self.status = GuidanceStatus::Loading;
            }
            Err(e) => {
                log::warn!("Permission request failed: {}", e);
                self.status = GuidanceStatus::SensorUnavailable;
            }
        }
        self.status
    }

    fn start_sensor(&mut self) {
        if !self.permissions.may_start_sensor() {
            return;
        }
        if !self.sensor.is_available() {
            self.fail_sensor("no magnetometer on this device");
            return;
        }
        if let Err(e) = self.sensor.set_update_interval(self.settings.sample_interval_ms) {
            self.fail_sensor(&e.to_string());
            return;
        }

        let (tx, rx) = bounded(SENSOR_QUEUE_CAPACITY);
        let callback = Box::new(move |event: SensorEvent| match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::trace!("Sensor queue full, dropping event"),
            // Receiver gone means the session ended
            Err(TrySendError::Disconnected(_)) => {}
        });

        match self.sensor.subscribe(callback) {
            Ok(handle) => {
                log::info!(
                    "Magnetometer subscribed ({:?}, every {} ms)",
                    handle,
                    self.settings.sample_interval_ms
                );
                self.subscription = Some(handle);
                self.events = Some(rx);
                self.status = GuidanceStatus::Active;
            }
            Err(e) => self.fail_sensor(&e.to_string()),
        }
    }

    fn fail_sensor(&mut self, reason: &str) {
        log::warn!("Sensor unavailable: {}", reason);
        self.release();
        self.status = GuidanceStatus::SensorUnavailable;
    }

    /// Drain queued sensor events and return the frames they produced
    pub fn process_pending(&mut self) -> Vec<GuidanceFrame> {
        let pending: Vec<SensorEvent> = match &self.events {
            Some(events) => events.try_iter().collect(),
            None => return Vec::new(),
        };

        let mut frames = Vec::new();
        for event in pending {
            if self.status != GuidanceStatus::Active {
                break;
            }
            if let Some(frame) = self.handle_event(event) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Process one event directly, bypassing the queue
    pub fn handle_event(&mut self, event: SensorEvent) -> Option<GuidanceFrame> {
        if self.status != GuidanceStatus::Active {
            return None;
        }
        match event {
            SensorEvent::Reading(sample) => self.process_sample(&sample),
            SensorEvent::Unavailable => {
                self.fail_sensor("subscription reported failure");
                None
            }
        }
    }

    fn process_sample(&mut self, sample: &HeadingSample) -> Option<GuidanceFrame> {
        let heading = self.estimator.ingest(sample)?;
        let reading = self.classifier.classify(heading, self.target);
        let rotation_angle = self.easing.retarget(heading, sample.timestamp_ms);

        log::debug!(
            "Stable heading {:.1}°, {:.1}° from target ({:?})",
            heading,
            reading.distance,
            reading.state
        );
        if reading.just_entered {
            log::info!("Aligned with target {:.1}°", self.target.degrees());
            self.haptics.pulse(self.settings.haptic_pulse_ms);
        }

        let frame = GuidanceFrame {
            heading_degrees: display_degrees(heading),
            distance_degrees: reading.distance.round() as u16,
            alignment: reading.state,
            label: reading.label,
            rotation_angle,
            just_aligned: reading.just_entered,
            heading,
            distance: reading.distance,
            timestamp_ms: sample.timestamp_ms,
        };
        self.publish(frame);
        Some(frame)
    }

    fn publish(&mut self, frame: GuidanceFrame) {
        self.latest = Some(frame);
        self.listeners.retain(|listener| match listener.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::trace!("Frame stream full, skipping frame");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// End the session and release the sensor
    pub fn stop(&mut self) {
        if self.status == GuidanceStatus::Stopped {
            return;
        }
        self.release();
        self.status = GuidanceStatus::Stopped;
        log::info!("Guidance session stopped");
    }

    fn release(&mut self) {
        if let Some(handle) = self.subscription.take() {
            self.sensor.unsubscribe(handle);
            log::debug!("Magnetometer unsubscribed ({:?})", handle);
        }
        self.events = None;
    }

    /// Stream of frames for a presentation layer
    ///
    /// Holds up to [`FRAME_STREAM_CAPACITY`] unread frames. Dropping the
    /// receiver unregisters it.
    pub fn frames(&mut self) -> Receiver<GuidanceFrame> {
        let (tx, rx) = bounded(FRAME_STREAM_CAPACITY);
        self.listeners.push(tx);
        rx
    }

    /// Compass rose rotation to draw at `now_ms`
    pub fn rotation_at(&self, now_ms: u64) -> f64 {
        self.easing.value_at(now_ms)
    }

    pub fn status(&self) -> GuidanceStatus {
        self.status
    }

    pub fn latest(&self) -> Option<GuidanceFrame> {
        self.latest
    }

    pub fn stable_heading(&self) -> Option<f64> {
        self.estimator.stable_heading()
    }

    pub fn target(&self) -> TargetAzimuth {
        self.target
    }

    pub fn permission_state(&self) -> PermissionState {
        self.permissions.state()
    }

    pub fn platform(&self) -> Platform {
        self.permissions.platform()
    }

    pub fn settings(&self) -> &GuidanceSettings {
        &self.settings
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }
}

impl<S: SensorSource, P: PermissionProvider, H: HapticFeedback> Drop
    for GuidanceController<S, P, H>
{
    fn drop(&mut self) {
        self.release();
    }
}
