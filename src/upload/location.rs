use std::time::Duration;

use async_trait::async_trait;

use crate::{
    config,
    error::LocationError,
    models::UserLocation,
    notice::{Notifier, Severity},
};

/// Options handed to the geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl PositionOptions {
    pub fn from_config(geolocation: &config::Geolocation) -> Self {
        Self {
            high_accuracy: geolocation.high_accuracy,
            timeout: Duration::from_secs(geolocation.timeout_secs),
            maximum_age: Duration::from_secs(geolocation.maximum_age_secs),
        }
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::from_config(&config::Geolocation::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
    /// Accuracy radius in meters, when the platform reports one
    pub accuracy: Option<f64>,
}

#[async_trait]
pub trait LocationProvider {
    fn name(&self) -> &'static str;

    fn supported(&self) -> bool {
        true
    }

    async fn current_position(&self, options: &PositionOptions) -> Result<Position, LocationError>;
}

/// Provider answering with a position that is already known, e.g. from
/// pre-filled form fields, or with a fixed platform error code.
#[derive(Debug, Clone, Default)]
pub struct PrefilledLocation {
    location: Option<UserLocation>,
    error_code: Option<u16>,
}

impl PrefilledLocation {
    pub fn new(location: Option<UserLocation>) -> Self {
        Self {
            location,
            error_code: None,
        }
    }

    pub fn failing(code: u16) -> Self {
        Self {
            location: None,
            error_code: Some(code),
        }
    }
}

#[async_trait]
impl LocationProvider for PrefilledLocation {
    fn name(&self) -> &'static str {
        "prefilled"
    }

    async fn current_position(&self, _options: &PositionOptions) -> Result<Position, LocationError> {
        if let Some(code) = self.error_code {
            return Err(LocationError::from_code(code));
        }

        self.location
            .map(|location| Position {
                lat: location.lat,
                lng: location.lng,
                accuracy: None,
            })
            .ok_or(LocationError::PositionUnavailable)
    }
}

/// The `userLat` / `userLon` form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateFields {
    pub lat: String,
    pub lon: String,
}

impl CoordinateFields {
    pub fn set(&mut self, lat: f64, lon: f64) {
        self.lat = format!("{:.6}", lat);
        self.lon = format!("{:.6}", lon);
    }
}

/// The button that started the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerControl {
    pub label: String,
    pub enabled: bool,
}

impl TriggerControl {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: true,
        }
    }
}

/// Puts the control into its busy state and restores it when dropped, so
/// every exit path re-enables the button.
struct BusyGuard<'a> {
    control: &'a mut TriggerControl,
    label: String,
    enabled: bool,
}

impl<'a> BusyGuard<'a> {
    fn new(control: &'a mut TriggerControl) -> Self {
        let label = std::mem::replace(&mut control.label, t!("location.busy").to_string());
        let enabled = std::mem::replace(&mut control.enabled, false);
        Self {
            control,
            label,
            enabled,
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.control.label = std::mem::take(&mut self.label);
        self.control.enabled = self.enabled;
    }
}

/// Asks `provider` for the current position and fills `fields` with it.
///
/// The outcome is always reported through `notices`; failures are also
/// returned so callers can react to them.
pub async fn request_location<P>(
    provider: &P,
    options: &PositionOptions,
    fields: &mut CoordinateFields,
    control: &mut TriggerControl,
    notices: &Notifier,
) -> Result<UserLocation, LocationError>
where
    P: LocationProvider + Sync + ?Sized,
{
    if !provider.supported() {
        log::warn!("Location provider {} is not supported", provider.name());
        notices.alert(&LocationError::Unsupported.user_message(), Severity::Warning);
        return Err(LocationError::Unsupported);
    }

    let _busy = BusyGuard::new(control);
    log::info!("Requesting location from {}", provider.name());

    let result = match tokio::time::timeout(options.timeout, provider.current_position(options)).await
    {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout),
    };

    match result {
        Ok(position) => {
            fields.set(position.lat, position.lng);
            notices.alert(
                t!("location.acquired", lat = fields.lat, lon = fields.lon).as_ref(),
                Severity::Success,
            );
            log::info!("Location acquired: {}, {}", fields.lat, fields.lon);

            Ok(UserLocation::new(position.lat, position.lng))
        }
        Err(err) => {
            log::error!("Failed to get location from {}: {}", provider.name(), err);
            notices.alert(&err.user_message(), Severity::Danger);
            Err(err)
        }
    }
}
