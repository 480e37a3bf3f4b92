//! Loading and validation of [`GuidanceSettings`]
//!
//! Settings may be embedded by the host app as a TOML document; every key
//! is optional and falls back to the defaults.
//!
//! ```toml
//! sample_interval_ms = 150
//! deadband_degrees = 2.5
//! aligned_below_degrees = 10.0
//! near_below_degrees = 30.0
//! ```

use crate::error::{GuidanceError, Result};
use crate::types::GuidanceSettings;
use std::fs;
use std::path::Path;

/// Accepted magnetometer update intervals
pub const SAMPLE_INTERVAL_RANGE_MS: std::ops::RangeInclusive<u32> = 100..=200;

impl GuidanceSettings {
    /// Parse settings from a TOML string and validate them
    ///
    /// # Example
    /// ```
    /// use azimuth_guide::GuidanceSettings;
    ///
    /// let settings = GuidanceSettings::from_toml_str("sample_interval_ms = 200")?;
    /// assert_eq!(settings.sample_interval_ms, 200);
    /// assert_eq!(settings.deadband_degrees, 2.0);
    /// # Ok::<(), azimuth_guide::GuidanceError>(())
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: GuidanceSettings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check ranges and band ordering
    pub fn validate(&self) -> Result<()> {
        if !SAMPLE_INTERVAL_RANGE_MS.contains(&self.sample_interval_ms) {
            return Err(GuidanceError::InvalidConfig(format!(
                "sample_interval_ms must be within {}..={}, got {}",
                SAMPLE_INTERVAL_RANGE_MS.start(),
                SAMPLE_INTERVAL_RANGE_MS.end(),
                self.sample_interval_ms
            )));
        }
        if !self.deadband_degrees.is_finite() || self.deadband_degrees < 0.0 {
            return Err(GuidanceError::InvalidConfig(format!(
                "deadband_degrees must be a non-negative number, got {}",
                self.deadband_degrees
            )));
        }
        let bands_ordered = self.aligned_below_degrees > 0.0
            && self.aligned_below_degrees <= self.near_below_degrees
            && self.near_below_degrees <= 180.0;
        if !bands_ordered {
            return Err(GuidanceError::InvalidConfig(format!(
                "expected 0 < aligned_below ({}) <= near_below ({}) <= 180",
                self.aligned_below_degrees, self.near_below_degrees
            )));
        }
        if !(self.label_aligned_below_degrees > 0.0 && self.label_aligned_below_degrees <= 180.0) {
            return Err(GuidanceError::InvalidConfig(format!(
                "label_aligned_below_degrees must be within (0, 180], got {}",
                self.label_aligned_below_degrees
            )));
        }
        Ok(())
    }
}
