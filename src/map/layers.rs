use serde::{Deserialize, Serialize};

/// A tile source the map can switch between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Label shown in the layer switcher
    pub name: String,
    /// URL template with `{z}`, `{x}`, `{y}` and optionally `{s}`
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileLayer {
    pub fn street() -> Self {
        Self {
            name: "Street Map".to_string(),
            url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            max_zoom: 18,
        }
    }

    pub fn satellite() -> Self {
        Self {
            name: "Satellite".to_string(),
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
            attribution: "Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community".to_string(),
            max_zoom: 18,
        }
    }
}
