use serde_json::json;

use crate::{
    error::RenderError,
    map::{
        layers::TileLayer,
        marker::Marker,
        render::MapSurface,
        view::{LatLng, LatLngBounds},
    },
    utils::escape,
};

const LEAFLET_VERSION: &str = "1.9.4";

const MAP_STYLE: &str = r#"
    @keyframes pulse {
        0% { transform: scale(1); opacity: 1; }
        100% { transform: scale(1.5); opacity: 0; }
    }
    .custom-popup .leaflet-popup-content { margin: 8px 12px; }
    .custom-popup .leaflet-popup-content-wrapper { border-radius: 8px; }
"#;

/// Emits a standalone HTML page that draws the map with Leaflet.
#[derive(Debug, Clone, Default)]
pub struct LeafletSurface {
    container: Option<String>,
    script: Vec<String>,
    error_panel: Option<String>,
}

fn valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// JSON literal that is safe to place inside a `<script>` element.
fn js(value: serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn tile_layer_js(layer: &TileLayer) -> String {
    format!(
        "L.tileLayer({}, {})",
        js(json!(layer.url)),
        js(json!({"attribution": layer.attribution, "maxZoom": layer.max_zoom}))
    )
}

impl LeafletSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_mounted(&self) -> Result<(), RenderError> {
        match self.container {
            Some(_) => Ok(()),
            None => Err(RenderError::Surface("map is not mounted".to_string())),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_panel.is_some()
    }

    /// The complete document. After an error only the static panel is
    /// included, no script.
    pub fn to_html(&self, title: &str) -> String {
        let container = self.container.as_deref().unwrap_or("map");
        let (body, script) = match &self.error_panel {
            Some(panel) => (panel.clone(), String::new()),
            None => (
                String::new(),
                format!(
                    "<script>\n(function () {{\n{}\n}})();\n</script>",
                    self.script.join("\n")
                ),
            ),
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
<style>{style}
    #{container} {{ height: 600px; }}
</style>
</head>
<body>
<div class="container">
<div id="{container}">{body}</div>
</div>
{script}
</body>
</html>
"#,
            title = escape(title),
            version = LEAFLET_VERSION,
            style = MAP_STYLE,
            container = container,
            body = body,
            script = script,
        )
    }
}

impl MapSurface for LeafletSurface {
    fn mount(&mut self, container: &str, center: LatLng, zoom: u8) -> Result<(), RenderError> {
        if !valid_id(container) {
            return Err(RenderError::MissingContainer(container.to_string()));
        }

        self.container = Some(container.to_string());
        self.script.push("var markers = [];".to_string());
        self.script.push(format!(
            "var map = L.map({}).setView([{}, {}], {});",
            js(json!(container)),
            center.lat,
            center.lng,
            zoom
        ));
        Ok(())
    }

    fn add_tile_layer(&mut self, layer: &TileLayer) -> Result<(), RenderError> {
        self.ensure_mounted()?;
        self.script
            .push(format!("{}.addTo(map);", tile_layer_js(layer)));
        Ok(())
    }

    fn add_layer_control(&mut self, layers: &[TileLayer]) -> Result<(), RenderError> {
        self.ensure_mounted()?;
        let entries: Vec<String> = layers
            .iter()
            .map(|layer| format!("{}: {}", js(json!(layer.name)), tile_layer_js(layer)))
            .collect();

        self.script.push(format!(
            "L.control.layers({{{}}}).addTo(map);",
            entries.join(", ")
        ));
        Ok(())
    }

    fn add_marker(&mut self, marker: &Marker) -> Result<(), RenderError> {
        self.ensure_mounted()?;
        let half = marker.icon_size / 2;
        let icon = json!({
            "className": marker.class_name,
            "html": marker.icon_html,
            "iconSize": [marker.icon_size, marker.icon_size],
            "iconAnchor": [half, half],
        });

        self.script.push(format!(
            "markers.push(L.marker([{}, {}], {{icon: L.divIcon({})}}).addTo(map).bindPopup({}, {}));",
            marker.position.lat,
            marker.position.lng,
            js(icon),
            js(json!(marker.popup_html)),
            js(json!({"maxWidth": 300, "className": "custom-popup"}))
        ));
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) -> Result<(), RenderError> {
        self.ensure_mounted()?;
        self.script.push(format!(
            "map.fitBounds([[{}, {}], [{}, {}]]);",
            bounds.south_west.lat, bounds.south_west.lng, bounds.north_east.lat, bounds.north_east.lng
        ));
        Ok(())
    }

    fn show_error(&mut self, container: &str, panel_html: &str) {
        if valid_id(container) {
            self.container = Some(container.to_string());
        }
        self.script.clear();
        self.error_panel = Some(panel_html.to_string());
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::*;
    use crate::{
        config,
        map::render::{render_payload_json, render_results},
        models::{MapPayload, SearchResult, UserLocation},
    };

    #[test]
    fn test_renders_script() {
        let payload = MapPayload::new(vec![SearchResult {
            name: "Quote \" and </script>".to_string(),
            lat: 35.6762,
            lng: 139.6503,
            confidence: 0.91,
            distance: 9300.0,
            bearing: 33.0,
        }]);

        let mut surface = LeafletSurface::new();
        let state = render_results(
            &mut surface,
            &payload,
            Some(&UserLocation::new(48.85, 2.35)),
            &config::Map::default(),
        );
        assert!(state.is_ready());

        let html = surface.to_html("Results");
        assert!(html.contains(r#"var map = L.map("map").setView([35.6762, 139.6503], 3);"#));
        assert!(html.contains("L.control.layers({\"Street Map\": L.tileLayer("));
        assert_eq!(html.matches("markers.push(L.marker(").count(), 2);
        assert!(html.contains("map.fitBounds("));
        assert!(html.contains("@keyframes pulse"));
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains("<\\/div>"));

        let document = Html::parse_document(&html);
        let map_div = document.select(&Selector::parse("#map").unwrap()).next();
        assert!(map_div.is_some());
    }

    #[test]
    fn test_error_replaces_map() {
        let mut surface = LeafletSurface::new();
        let state = render_payload_json(&mut surface, "{not json", None, &config::Map::default());
        assert!(!state.is_ready());
        assert!(surface.is_error());

        let html = surface.to_html("Results");
        assert!(!html.contains("L.map("));

        let document = Html::parse_document(&html);
        let title = document
            .select(&Selector::parse("#map h5").unwrap())
            .next()
            .unwrap();
        assert_eq!(title.text().collect::<String>(), "Map Loading Error");
    }

    #[test]
    fn test_invalid_container() {
        let mut surface = LeafletSurface::new();
        let settings = config::Map {
            container: "map\"><script>".to_string(),
            ..Default::default()
        };
        let state = render_results(&mut surface, &MapPayload::default(), None, &settings);

        assert!(!state.is_ready());
        assert!(surface.to_html("x").contains(r#"<div id="map">"#));
    }

    #[test]
    fn test_requires_mount() {
        let mut surface = LeafletSurface::new();
        let bounds = LatLngBounds::from_points([LatLng::new(0.0, 0.0)]).unwrap();
        assert!(surface.fit_bounds(&bounds).is_err());
    }
}
