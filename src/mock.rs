//! Test doubles for the platform collaborators
//!
//! Each double is a cheap handle over shared state, so a test can keep one
//! clone to drive or inspect while the controller owns another.

use crate::error::{GuidanceError, Result};
use crate::haptics::HapticFeedback;
use crate::permission::{PermissionApi, PermissionKind, PermissionResponse};
use crate::sensor::{SensorCallback, SensorEvent, SensorSource, SubscriptionHandle};
use crate::types::HeadingSample;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Field strength used by [`MockSensor::emit_heading`], in µT
const MOCK_FIELD_STRENGTH: f64 = 30.0;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Scriptable magnetometer
#[derive(Clone)]
pub struct MockSensor {
    inner: Arc<Mutex<MockSensorInner>>,
}

struct MockSensorInner {
    available: bool,
    fail_subscribe: bool,
    update_interval: Option<u32>,
    next_handle: u64,
    subscribe_count: usize,
    callbacks: BTreeMap<u64, SensorCallback>,
}

impl MockSensor {
    /// A device with a working magnetometer
    pub fn new() -> Self {
        Self::with_availability(true)
    }

    /// A device without a magnetometer
    pub fn unavailable() -> Self {
        Self::with_availability(false)
    }

    fn with_availability(available: bool) -> Self {
        MockSensor {
            inner: Arc::new(Mutex::new(MockSensorInner {
                available,
                fail_subscribe: false,
                update_interval: None,
                next_handle: 1,
                subscribe_count: 0,
                callbacks: BTreeMap::new(),
            })),
        }
    }

    /// Make the next subscriptions fail
    pub fn fail_subscribe(&self, fail: bool) {
        lock(&self.inner).fail_subscribe = fail;
    }

    /// Deliver an event to every live subscription
    ///
    /// Returns false when nobody is subscribed.
    pub fn emit(&self, event: SensorEvent) -> bool {
        let mut inner = lock(&self.inner);
        for callback in inner.callbacks.values_mut() {
            callback(event);
        }
        !inner.callbacks.is_empty()
    }

    pub fn emit_reading(&self, x: f64, y: f64, z: f64, timestamp_ms: u64) -> bool {
        self.emit(SensorEvent::Reading(HeadingSample::new(x, y, z, timestamp_ms)))
    }

    /// Deliver a reading whose planar heading is `degrees`
    pub fn emit_heading(&self, degrees: f64, timestamp_ms: u64) -> bool {
        let rad = degrees.to_radians();
        self.emit_reading(
            rad.sin() * MOCK_FIELD_STRENGTH,
            rad.cos() * MOCK_FIELD_STRENGTH,
            -20.0,
            timestamp_ms,
        )
    }

    pub fn update_interval(&self) -> Option<u32> {
        lock(&self.inner).update_interval
    }

    /// Number of `subscribe` calls so far
    pub fn subscribe_count(&self) -> usize {
        lock(&self.inner).subscribe_count
    }

    pub fn active_subscriptions(&self) -> usize {
        lock(&self.inner).callbacks.len()
    }
}

impl Default for MockSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for MockSensor {
    fn is_available(&self) -> bool {
        lock(&self.inner).available
    }

    fn set_update_interval(&mut self, interval_ms: u32) -> Result<()> {
        lock(&self.inner).update_interval = Some(interval_ms);
        Ok(())
    }

    fn subscribe(&mut self, callback: SensorCallback) -> Result<SubscriptionHandle> {
        let mut inner = lock(&self.inner);
        inner.subscribe_count += 1;
        if inner.fail_subscribe {
            return Err(GuidanceError::Platform("subscribe failed".to_string()));
        }
        let id = inner.next_handle;
        inner.next_handle += 1;
        inner.callbacks.insert(id, callback);
        Ok(SubscriptionHandle(id))
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        lock(&self.inner).callbacks.remove(&handle.0);
    }
}

/// Scriptable platform permission API
#[derive(Clone)]
pub struct MockPermissionApi {
    inner: Arc<Mutex<MockPermissionInner>>,
}

struct MockPermissionInner {
    response: PermissionResponse,
    fail_requests: bool,
    fail_settings: bool,
    requested: Vec<PermissionKind>,
    status_reads: usize,
    settings_opened: usize,
}

impl MockPermissionApi {
    pub fn granting() -> Self {
        Self::answering(PermissionResponse::Granted)
    }

    pub fn denying() -> Self {
        Self::answering(PermissionResponse::Denied)
    }

    fn answering(response: PermissionResponse) -> Self {
        MockPermissionApi {
            inner: Arc::new(Mutex::new(MockPermissionInner {
                response,
                fail_requests: false,
                fail_settings: false,
                requested: Vec::new(),
                status_reads: 0,
                settings_opened: 0,
            })),
        }
    }

    /// Change the answer for every permission kind
    pub fn set_response(&self, response: PermissionResponse) {
        lock(&self.inner).response = response;
    }

    pub fn fail_requests(&self, fail: bool) {
        lock(&self.inner).fail_requests = fail;
    }

    pub fn fail_settings(&self, fail: bool) {
        lock(&self.inner).fail_settings = fail;
    }

    /// Prompts shown so far, in order
    pub fn requested(&self) -> Vec<PermissionKind> {
        lock(&self.inner).requested.clone()
    }

    pub fn status_reads(&self) -> usize {
        lock(&self.inner).status_reads
    }

    pub fn settings_opened(&self) -> usize {
        lock(&self.inner).settings_opened
    }
}

impl PermissionApi for MockPermissionApi {
    fn request(&mut self, kind: PermissionKind) -> Result<PermissionResponse> {
        let mut inner = lock(&self.inner);
        if inner.fail_requests {
            return Err(GuidanceError::Platform("permission API threw".to_string()));
        }
        inner.requested.push(kind);
        Ok(inner.response)
    }

    fn status(&mut self, _kind: PermissionKind) -> Result<PermissionResponse> {
        let mut inner = lock(&self.inner);
        if inner.fail_requests {
            return Err(GuidanceError::Platform("permission API threw".to_string()));
        }
        inner.status_reads += 1;
        Ok(inner.response)
    }

    fn open_settings(&mut self) -> Result<()> {
        let mut inner = lock(&self.inner);
        if inner.fail_settings {
            return Err(GuidanceError::Platform("settings intent rejected".to_string()));
        }
        inner.settings_opened += 1;
        Ok(())
    }
}

/// Haptics that records every pulse
#[derive(Clone, Default)]
pub struct RecordingHaptics {
    pulses: Arc<Mutex<Vec<u32>>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations of all pulses so far
    pub fn pulses(&self) -> Vec<u32> {
        lock(&self.pulses).clone()
    }
}

impl HapticFeedback for RecordingHaptics {
    fn pulse(&mut self, duration_ms: u32) {
        lock(&self.pulses).push(duration_ms);
    }
}
