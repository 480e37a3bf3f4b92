//! Permission lifecycle for sensor access
//!
//! The state machine is:
//!
//! ```text
//! Unknown --request--> Pending --grant--> Granted (terminal)
//!                         │
//!                         └--deny--> Denied --settings + retry--> Pending
//! ```
//!
//! Platform differences live behind [`PermissionProvider`], with one adapter
//! per operating system selected once by [`provider_for`].

use crate::error::{GuidanceError, Result};
use crate::types::{PermissionState, Platform};

/// Platform permission required to read the compass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionKind {
    Location,
    Sensors,
}

/// Answer of the platform permission API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionResponse {
    Granted,
    Denied,
    /// The system prompt is still on screen
    Prompting,
}

/// Raw platform permission API, supplied by the host application
pub trait PermissionApi {
    /// Ask the user for a permission, showing the system prompt if allowed
    fn request(&mut self, kind: PermissionKind) -> Result<PermissionResponse>;

    /// Read the current status without prompting
    fn status(&mut self, kind: PermissionKind) -> Result<PermissionResponse>;

    /// Open the app's page in the platform settings
    fn open_settings(&mut self) -> Result<()>;
}

/// Permission capability, one implementation per operating system
pub trait PermissionProvider {
    fn platform(&self) -> Platform;

    /// Request everything the compass needs
    ///
    /// Returns `Granted`, `Denied`, or `Pending` while a prompt is still open.
    fn request_permission(&mut self) -> Result<PermissionState>;

    /// Open the platform settings surface
    fn open_settings(&mut self) -> Result<()>;
}

impl<P: PermissionProvider + ?Sized> PermissionProvider for Box<P> {
    fn platform(&self) -> Platform {
        (**self).platform()
    }

    fn request_permission(&mut self) -> Result<PermissionState> {
        (**self).request_permission()
    }

    fn open_settings(&mut self) -> Result<()> {
        (**self).open_settings()
    }
}

const REQUIRED: [PermissionKind; 2] = [PermissionKind::Location, PermissionKind::Sensors];

/// Fold per-permission answers; any denial wins over an open prompt
fn combine(responses: &[PermissionResponse]) -> PermissionState {
    if responses.contains(&PermissionResponse::Denied) {
        PermissionState::Denied
    } else if responses.contains(&PermissionResponse::Prompting) {
        PermissionState::Pending
    } else {
        PermissionState::Granted
    }
}

fn settings_error(error: GuidanceError) -> GuidanceError {
    match error {
        GuidanceError::SettingsUnavailable(_) => error,
        other => GuidanceError::SettingsUnavailable(other.to_string()),
    }
}

/// Android adapter
///
/// Android shows the runtime prompt again after a plain denial, so every
/// request goes through the prompt.
pub struct AndroidPermissions<A> {
    api: A,
}

impl<A: PermissionApi> AndroidPermissions<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

impl<A: PermissionApi> PermissionProvider for AndroidPermissions<A> {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn request_permission(&mut self) -> Result<PermissionState> {
        let mut responses = [PermissionResponse::Denied; REQUIRED.len()];
        for (response, kind) in responses.iter_mut().zip(REQUIRED) {
            *response = self.api.request(kind)?;
            if *response == PermissionResponse::Denied {
                break;
            }
        }
        Ok(combine(&responses))
    }

    fn open_settings(&mut self) -> Result<()> {
        self.api.open_settings().map_err(settings_error)
    }
}

/// iOS adapter
///
/// iOS prompts only once per install. After a denial the only way back is
/// the Settings app, so later requests re-read the status instead.
pub struct IosPermissions<A> {
    api: A,
    prompted: bool,
}

impl<A: PermissionApi> IosPermissions<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            prompted: false,
        }
    }
}

impl<A: PermissionApi> PermissionProvider for IosPermissions<A> {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn request_permission(&mut self) -> Result<PermissionState> {
        let mut responses = Vec::with_capacity(REQUIRED.len());
        for kind in REQUIRED {
            let response = if self.prompted {
                self.api.status(kind)?
            } else {
                self.api.request(kind)?
            };
            responses.push(response);
        }
        self.prompted = true;
        Ok(combine(&responses))
    }

    fn open_settings(&mut self) -> Result<()> {
        self.api.open_settings().map_err(settings_error)
    }
}

/// Web adapter
///
/// Browsers expose no compass permission here and no settings page; the
/// paired sensor reports unavailability instead.
#[derive(Debug, Default)]
pub struct WebPermissions;

impl PermissionProvider for WebPermissions {
    fn platform(&self) -> Platform {
        Platform::Web
    }

    fn request_permission(&mut self) -> Result<PermissionState> {
        Ok(PermissionState::Granted)
    }

    fn open_settings(&mut self) -> Result<()> {
        Err(GuidanceError::SettingsUnavailable(
            "no settings surface on web".to_string(),
        ))
    }
}

/// Select the permission adapter for a platform
pub fn provider_for<A>(platform: Platform, api: A) -> Box<dyn PermissionProvider>
where
    A: PermissionApi + 'static,
{
    match platform {
        Platform::Android => Box::new(AndroidPermissions::new(api)),
        Platform::Ios => Box::new(IosPermissions::new(api)),
        Platform::Web => Box::new(WebPermissions),
    }
}

/// Pure permission state machine
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionLifecycle {
    state: PermissionState,
}

impl PermissionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    /// `Unknown` or `Denied` to `Pending`
    pub fn begin_request(&mut self) -> Result<()> {
        match self.state {
            PermissionState::Unknown | PermissionState::Denied => {
                self.state = PermissionState::Pending;
                Ok(())
            }
            from => Err(GuidanceError::InvalidTransition {
                from,
                action: "request",
            }),
        }
    }

    /// Apply the platform's answer to an in-flight request
    ///
    /// A `Pending` outcome keeps the request in flight.
    pub fn resolve(&mut self, outcome: PermissionState) -> Result<PermissionState> {
        if self.state != PermissionState::Pending {
            return Err(GuidanceError::InvalidTransition {
                from: self.state,
                action: "resolve",
            });
        }
        match outcome {
            PermissionState::Granted | PermissionState::Denied | PermissionState::Pending => {
                self.state = outcome;
                Ok(outcome)
            }
            PermissionState::Unknown => Err(GuidanceError::InvalidTransition {
                from: self.state,
                action: "resolve to unknown",
            }),
        }
    }

    /// The sensor may only run once access is granted
    pub fn may_start_sensor(&self) -> bool {
        self.state == PermissionState::Granted
    }
}

/// Drives a [`PermissionProvider`] through the [`PermissionLifecycle`]
pub struct PermissionManager<P> {
    provider: P,
    lifecycle: PermissionLifecycle,
}

impl<P: PermissionProvider> PermissionManager<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            lifecycle: PermissionLifecycle::new(),
        }
    }

    pub fn state(&self) -> PermissionState {
        self.lifecycle.state()
    }

    pub fn may_start_sensor(&self) -> bool {
        self.lifecycle.may_start_sensor()
    }

    pub fn platform(&self) -> Platform {
        self.provider.platform()
    }

    /// Ask the platform for access
    ///
    /// Already granted access is returned without prompting again. A
    /// provider failure leaves the lifecycle in `Denied` so the user can
    /// retry.
    pub fn request(&mut self) -> Result<PermissionState> {
        if self.lifecycle.state() == PermissionState::Granted {
            return Ok(PermissionState::Granted);
        }
        self.lifecycle.begin_request()?;

        match self.provider.request_permission() {
            Ok(outcome) => {
                let state = self.lifecycle.resolve(outcome)?;
                log::info!("{:?} permission request: {:?}", self.provider.platform(), state);
                Ok(state)
            }
            Err(e) => {
                self.lifecycle.resolve(PermissionState::Denied)?;
                Err(e)
            }
        }
    }

    /// Deliver the answer of a prompt that was still open
    pub fn complete(&mut self, granted: bool) -> Result<PermissionState> {
        let outcome = if granted {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };
        let state = self.lifecycle.resolve(outcome)?;
        log::info!("Permission prompt resolved: {:?}", state);
        Ok(state)
    }

    /// Re-enter `Pending` after a denial
    pub fn retry(&mut self) -> Result<PermissionState> {
        if self.lifecycle.state() != PermissionState::Denied {
            return Err(GuidanceError::InvalidTransition {
                from: self.lifecycle.state(),
                action: "retry",
            });
        }
        self.request()
    }

    /// Open platform settings; failure is reported but never fatal
    pub fn open_settings(&mut self) -> Result<()> {
        self.provider.open_settings().inspect_err(|e| {
            log::warn!("Could not open platform settings: {}", e);
        })
    }
}
