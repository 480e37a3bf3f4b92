//! Error types for the guidance engine

use crate::types::PermissionState;

/// Result type alias
pub type Result<T> = std::result::Result<T, GuidanceError>;

/// Guidance engine error types
#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    /// Magnetometer missing or subscription failed
    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),

    /// The platform refused sensor/location access
    #[error("Permission denied")]
    PermissionDenied,

    /// The platform settings surface could not be opened
    #[error("Settings unavailable: {0}")]
    SettingsUnavailable(String),

    /// Permission state machine refused an action
    #[error("Invalid permission transition: cannot {action} from {from:?}")]
    InvalidTransition {
        /// State the lifecycle was in
        from: PermissionState,
        /// Attempted action
        action: &'static str,
    },

    /// Settings failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected failure reported by a platform collaborator
    #[error("Platform error: {0}")]
    Platform(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Config serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
