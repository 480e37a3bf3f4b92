//! Magnetometer source abstraction

use crate::error::{GuidanceError, Result};
use crate::types::HeadingSample;

/// What a magnetometer subscription delivers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    /// A new reading, possibly with missing axes
    Reading(HeadingSample),
    /// The platform reported that the sensor stopped delivering
    Unavailable,
}

/// Callback invoked by the platform for each event
pub type SensorCallback = Box<dyn FnMut(SensorEvent) + Send>;

/// Opaque token identifying an active subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub u64);

/// Magnetometer capability
///
/// Implementations wrap the platform sensor API. After `unsubscribe`
/// returns, the callback registered under that handle must never run again.
pub trait SensorSource {
    /// Whether the device has a usable magnetometer
    fn is_available(&self) -> bool;

    /// Set the delivery interval in milliseconds
    fn set_update_interval(&mut self, interval_ms: u32) -> Result<()>;

    /// Start delivering events to `callback`
    fn subscribe(&mut self, callback: SensorCallback) -> Result<SubscriptionHandle>;

    /// Stop delivering events for `handle`
    fn unsubscribe(&mut self, handle: SubscriptionHandle);
}

impl<S: SensorSource + ?Sized> SensorSource for Box<S> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn set_update_interval(&mut self, interval_ms: u32) -> Result<()> {
        (**self).set_update_interval(interval_ms)
    }

    fn subscribe(&mut self, callback: SensorCallback) -> Result<SubscriptionHandle> {
        (**self).subscribe(callback)
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        (**self).unsubscribe(handle)
    }
}

/// Sensor for platforms without a reachable magnetometer (web)
#[derive(Debug, Default)]
pub struct UnsupportedSensor;

impl SensorSource for UnsupportedSensor {
    fn is_available(&self) -> bool {
        false
    }

    fn set_update_interval(&mut self, _interval_ms: u32) -> Result<()> {
        Ok(())
    }

    fn subscribe(&mut self, _callback: SensorCallback) -> Result<SubscriptionHandle> {
        Err(GuidanceError::SensorUnavailable(
            "compass is not available on this platform".to_string(),
        ))
    }

    fn unsubscribe(&mut self, _handle: SubscriptionHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_sensor() {
        let mut sensor = UnsupportedSensor;
        assert!(!sensor.is_available());
        assert!(sensor.set_update_interval(100).is_ok());
        let result = sensor.subscribe(Box::new(|_| {}));
        assert!(matches!(result, Err(GuidanceError::SensorUnavailable(_))));
    }

    #[test]
    fn test_boxed_source_forwards() {
        let mut sensor: Box<dyn SensorSource> = Box::new(UnsupportedSensor);
        assert!(!sensor.is_available());
        assert!(sensor.subscribe(Box::new(|_| {})).is_err());
    }
}
