//! Haptic feedback capability

/// Fire-and-forget vibration motor
pub trait HapticFeedback {
    fn pulse(&mut self, duration_ms: u32);
}

impl<H: HapticFeedback + ?Sized> HapticFeedback for Box<H> {
    fn pulse(&mut self, duration_ms: u32) {
        (**self).pulse(duration_ms)
    }
}

/// Haptics for devices without a vibration motor
#[derive(Debug, Default)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn pulse(&mut self, _duration_ms: u32) {}
}
