use serde::Serialize;

use crate::{
    format::format_confidence,
    map::view::LatLng,
    models::{SearchResult, UserLocation},
    utils::escape,
};

const USER_COLOR: &str = "#007bff";

/// Marker coloring scale. Uses 0.9 / 0.8 cut-offs, unlike the general
/// [`crate::format::ConfidenceClass`] (0.9 / 0.7).
#[derive(strum_macros::Display, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum MarkerTier {
    High,
    Medium,
    Low,
}

impl MarkerTier {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.9 {
            MarkerTier::High
        } else if confidence >= 0.8 {
            MarkerTier::Medium
        } else {
            MarkerTier::Low
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MarkerTier::High => "#28a745",
            MarkerTier::Medium => "#ffc107",
            MarkerTier::Low => "#dc3545",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    /// A search result with its 1-based rank
    Result { rank: usize, tier: MarkerTier },
    User,
}

/// A pin with its icon and popup, ready to hand to a surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: LatLng,
    pub kind: MarkerKind,
    /// CSS class of the icon wrapper
    pub class_name: &'static str,
    pub icon_html: String,
    /// Icon size in px, the anchor is its center
    pub icon_size: u16,
    pub popup_html: String,
}

impl Marker {
    pub fn for_result(result: &SearchResult, rank: usize) -> Self {
        let tier = MarkerTier::from_confidence(result.confidence);

        Self {
            position: LatLng::new(result.lat, result.lng),
            kind: MarkerKind::Result { rank, tier },
            class_name: "custom-div-icon",
            icon_html: format!(
                r#"<div style="background-color: {}; width: 30px; height: 30px; border-radius: 50%; border: 3px solid white; display: flex; align-items: center; justify-content: center; font-weight: bold; color: white; font-size: 14px; box-shadow: 0 2px 6px rgba(0,0,0,0.3);">{}</div>"#,
                tier.color(),
                rank
            ),
            icon_size: 30,
            popup_html: result_popup(result, rank, tier),
        }
    }

    pub fn for_user(location: &UserLocation) -> Self {
        Self {
            position: LatLng::new(location.lat, location.lng),
            kind: MarkerKind::User,
            class_name: "user-location-icon",
            icon_html: format!(
                r#"<div style="background-color: {color}; width: 20px; height: 20px; border-radius: 50%; border: 3px solid white; box-shadow: 0 2px 6px rgba(0,0,0,0.3); position: relative;"><div class="user-location-pulse" style="position: absolute; top: -8px; left: -8px; width: 36px; height: 36px; border-radius: 50%; background-color: rgba(0, 123, 255, 0.2); animation: pulse 2s infinite;"></div></div>"#,
                color = USER_COLOR
            ),
            icon_size: 20,
            popup_html: format!(
                r#"<div class="map-popup"><h6 class="mb-2"><i class="fas fa-user-location text-primary"></i> {}</h6><p class="mb-0"><code>{:.6}, {:.6}</code></p></div>"#,
                t!("map.user_location"),
                location.lat,
                location.lng
            ),
        }
    }

    /// Text of the rank badge, `None` for the user marker.
    pub fn label(&self) -> Option<String> {
        match self.kind {
            MarkerKind::Result { rank, .. } => Some(rank.to_string()),
            MarkerKind::User => None,
        }
    }
}

fn result_popup(result: &SearchResult, rank: usize, tier: MarkerTier) -> String {
    let mut details = String::new();
    if result.has_distance() {
        details.push_str(&format!(
            "<br><strong>{}:</strong> {:.1} km",
            t!("map.distance"),
            result.distance
        ));
    }
    if result.has_bearing() {
        details.push_str(&format!(
            "<br><strong>{}:</strong> {:.1}°",
            t!("map.bearing"),
            result.bearing
        ));
    }

    format!(
        r#"<div class="map-popup"><h6 class="mb-2"><span class="badge bg-primary">#{rank}</span> {name}</h6><p class="mb-1"><strong>{confidence_label}:</strong> <span class="badge" style="background-color: {color}">{confidence}</span></p><p class="mb-1"><strong>{coordinates_label}:</strong><br><code>{lat:.4}, {lng:.4}</code>{details}</p></div>"#,
        rank = rank,
        name = escape(&result.name),
        confidence_label = t!("map.confidence"),
        color = tier.color(),
        confidence = format_confidence(result.confidence),
        coordinates_label = t!("map.coordinates"),
        lat = result.lat,
        lng = result.lng,
        details = details,
    )
}
