use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RenderError;

/// A geocoded candidate produced by the server side inference.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SearchResult {
    /// Display name of the matched place
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Model certainty in [0, 1]
    pub confidence: f64,

    /// Distance from the user in km, 0 when unknown
    #[serde(default, deserialize_with = "zero_if_null")]
    pub distance: f64,
    /// Bearing from the user in degrees, 0 when unknown
    #[serde(default, deserialize_with = "zero_if_null")]
    pub bearing: f64,
}

fn coordinates_error(lat: f64, lng: f64) -> Option<&'static str> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        Some("latitude out of range")
    } else if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        Some("longitude out of range")
    } else {
        None
    }
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl SearchResult {
    pub fn has_distance(&self) -> bool {
        self.distance > 0.0
    }

    pub fn has_bearing(&self) -> bool {
        self.bearing > 0.0
    }

    fn check(&self, rank: usize) -> Result<(), RenderError> {
        let malformed = |what: &str| {
            Err(RenderError::MalformedPayload(format!(
                "result #{} ({}): {}",
                rank, self.name, what
            )))
        };

        if let Some(what) = coordinates_error(self.lat, self.lng) {
            return malformed(what);
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return malformed("confidence outside [0, 1]");
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return malformed("negative distance");
        }
        if !(0.0..360.0).contains(&self.bearing) {
            return malformed("bearing outside [0, 360)");
        }

        Ok(())
    }
}

/// Results injected into the results page; order defines the rank.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MapPayload {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

impl MapPayload {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self { results }
    }

    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks every result against the payload invariants.
    pub fn validate(&self) -> Result<(), RenderError> {
        self.results
            .iter()
            .enumerate()
            .try_for_each(|(index, result)| result.check(index + 1))
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UserLocation {
    pub lat: f64,
    pub lng: f64,
}

impl UserLocation {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Reads a location from the two pre-filled form fields. Blank,
    /// unparsable or out of range fields yield `None`.
    pub fn from_fields(lat: &str, lng: &str) -> Option<Self> {
        let lat = lat.trim().parse::<f64>().ok()?;
        let lng = lng.trim().parse::<f64>().ok()?;

        let location = Self { lat, lng };
        location.check().ok().map(|()| location)
    }

    /// Rejects non-finite or out of range coordinates.
    pub fn check(&self) -> Result<(), RenderError> {
        match coordinates_error(self.lat, self.lng) {
            Some(what) => Err(RenderError::MalformedPayload(format!(
                "user location ({}, {}): {}",
                self.lat, self.lng, what
            ))),
            None => Ok(()),
        }
    }
}
