//! Pure display helpers shared by the upload page, the map popups and the
//! server rendered templates.

use serde::Serialize;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Hemisphere aware coordinate, e.g. `48.8566°N, 2.3522°E`.
pub fn format_coordinate(lat: f64, lon: f64) -> String {
    let lat_dir = if lat >= 0.0 { 'N' } else { 'S' };
    let lon_dir = if lon >= 0.0 { 'E' } else { 'W' };

    format!(
        "{:.4}°{}, {:.4}°{}",
        lat.abs(),
        lat_dir,
        lon.abs(),
        lon_dir
    )
}

pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", (km * 1000.0).round())
    } else if km < 100.0 {
        format!("{:.1} km", km)
    } else {
        format!("{:.0} km", km.round())
    }
}

/// Bearing with the nearest of the 16 compass points, e.g. `90.0° (E)`.
pub fn format_bearing(degrees: f64) -> String {
    format!("{:.1}° ({})", degrees, compass_point(degrees))
}

pub fn compass_point(degrees: f64) -> &'static str {
    let index = (degrees.rem_euclid(360.0) / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

/// General three tier confidence scale used for badges and tables.
///
/// Not the same scale as the map markers, see [`crate::map::MarkerTier`].
#[derive(strum_macros::Display, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceClass {
    High,
    Medium,
    Low,
}

impl ConfidenceClass {
    pub fn css_class(&self) -> String {
        format!("confidence-{}", self)
    }
}

pub fn confidence_class(confidence: f64) -> ConfidenceClass {
    if confidence >= 0.9 {
        ConfidenceClass::High
    } else if confidence >= 0.7 {
        ConfidenceClass::Medium
    } else {
        ConfidenceClass::Low
    }
}

/// Confidence as a percentage with one decimal, e.g. `93.5%`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}
