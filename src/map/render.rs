use crate::{
    config,
    error::RenderError,
    map::{
        layers::TileLayer,
        marker::Marker,
        view::{LatLng, LatLngBounds, MapViewState, ViewStatus},
    },
    models::{MapPayload, UserLocation},
};

/// The tile and marker rendering capability the results map draws onto.
pub trait MapSurface {
    /// Creates the map inside the element `container` at the initial view.
    fn mount(&mut self, container: &str, center: LatLng, zoom: u8) -> Result<(), RenderError>;

    fn add_tile_layer(&mut self, layer: &TileLayer) -> Result<(), RenderError>;

    /// Exposes a switcher between the given base layers.
    fn add_layer_control(&mut self, layers: &[TileLayer]) -> Result<(), RenderError>;

    fn add_marker(&mut self, marker: &Marker) -> Result<(), RenderError>;

    fn fit_bounds(&mut self, bounds: &LatLngBounds) -> Result<(), RenderError>;

    /// Replaces the whole map region with a static panel. Must not fail.
    fn show_error(&mut self, container: &str, panel_html: &str);
}

/// Static panel replacing the map when it cannot be drawn.
pub fn error_panel() -> String {
    format!(
        r#"<div class="d-flex align-items-center justify-content-center h-100 bg-light"><div class="text-center"><i class="fas fa-exclamation-triangle fa-3x text-warning mb-3"></i><h5>{}</h5><p class="text-muted">{}</p></div></div>"#,
        t!("map.error_title"),
        t!("map.error_body")
    )
}

fn draw<S>(
    surface: &mut S,
    payload: &MapPayload,
    user_location: Option<&UserLocation>,
    settings: &config::Map,
    state: &mut MapViewState,
) -> Result<(), RenderError>
where
    S: MapSurface + ?Sized,
{
    payload.validate()?;
    if let Some(location) = user_location {
        location.check()?;
    }

    if let Some(first) = payload.results.first() {
        state.center = LatLng::new(first.lat, first.lng);
    }
    surface.mount(&settings.container, state.center, state.zoom)?;

    surface.add_tile_layer(&settings.street)?;
    let layers = [settings.street.clone(), settings.satellite.clone()];
    surface.add_layer_control(&layers)?;
    state.layers = layers.into_iter().map(|layer| layer.name).collect();

    for (index, result) in payload.results.iter().enumerate() {
        let marker = Marker::for_result(result, index + 1);
        surface.add_marker(&marker)?;
        state.push_marker(marker);
    }

    if let Some(location) = user_location {
        let marker = Marker::for_user(location);
        surface.add_marker(&marker)?;
        state.push_marker(marker);
    }

    if let Some(bounds) = LatLngBounds::from_points(state.positions()) {
        let padded = bounds.pad(settings.fit_padding);
        surface.fit_bounds(&padded)?;
        state.bounds = Some(padded);
    }

    Ok(())
}

/// Draws the ranked results and the optional user position.
///
/// Never fails: on any error the map region is swapped for the error panel
/// and the failure is recorded in the returned state.
pub fn render_results<S>(
    surface: &mut S,
    payload: &MapPayload,
    user_location: Option<&UserLocation>,
    settings: &config::Map,
) -> MapViewState
where
    S: MapSurface + ?Sized,
{
    let mut state = MapViewState::new(settings);

    match draw(surface, payload, user_location, settings, &mut state) {
        Ok(()) => {
            log::info!(
                "Rendered {} results{}",
                state.markers().len(),
                if state.user_marker().is_some() {
                    " and user location"
                } else {
                    ""
                }
            );
        }
        Err(err) => {
            log::error!("Error initializing map: {}", err);
            surface.show_error(&settings.container, &error_panel());
            state.status = ViewStatus::Failed(err);
        }
    }

    state
}

/// Same as [`render_results`] for a payload that still has to be parsed.
pub fn render_payload_json<S>(
    surface: &mut S,
    json: &str,
    user_location: Option<&UserLocation>,
    settings: &config::Map,
) -> MapViewState
where
    S: MapSurface + ?Sized,
{
    match MapPayload::from_json(json) {
        Ok(payload) => render_results(surface, &payload, user_location, settings),
        Err(err) => {
            log::error!("Error parsing map payload: {}", err);
            surface.show_error(&settings.container, &error_panel());
            let mut state = MapViewState::new(settings);
            state.status = ViewStatus::Failed(err);
            state
        }
    }
}
