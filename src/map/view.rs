use serde::Serialize;

use crate::{
    config,
    error::RenderError,
    map::marker::{Marker, MarkerKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Smallest bounds containing every point, `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Grows the bounds by `ratio` of their height and width on each side.
    pub fn pad(&self, ratio: f64) -> Self {
        let height = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let width = (self.north_east.lng - self.south_west.lng).abs() * ratio;

        Self {
            south_west: LatLng::new(self.south_west.lat - height, self.south_west.lng - width),
            north_east: LatLng::new(self.north_east.lat + height, self.north_east.lng + width),
        }
    }

    pub fn contains(&self, point: LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus {
    Ready,
    /// The map region was replaced by the error panel
    Failed(RenderError),
}

/// Everything one rendered map consists of. Owned by the caller, so any
/// number of independent maps can exist side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewState {
    pub container: String,
    pub center: LatLng,
    pub zoom: u8,
    /// Names of the selectable base layers, active one first
    pub layers: Vec<String>,
    pub bounds: Option<LatLngBounds>,
    pub status: ViewStatus,
    markers: Vec<Marker>,
    user_marker: Option<Marker>,
}

impl MapViewState {
    /// The default world view before anything is placed.
    pub fn new(settings: &config::Map) -> Self {
        let [lat, lng] = settings.default_center;
        Self {
            container: settings.container.clone(),
            center: LatLng::new(lat, lng),
            zoom: settings.default_zoom,
            layers: vec![],
            bounds: None,
            status: ViewStatus::Ready,
            markers: vec![],
            user_marker: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ViewStatus::Ready
    }

    /// Result markers in rank order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn user_marker(&self) -> Option<&Marker> {
        self.user_marker.as_ref()
    }

    pub(crate) fn push_marker(&mut self, marker: Marker) {
        match marker.kind {
            MarkerKind::User => {
                if self.user_marker.replace(marker).is_some() {
                    log::debug!("Replaced previous user marker");
                }
            }
            MarkerKind::Result { .. } => self.markers.push(marker),
        }
    }

    /// Positions of all placed markers, the user marker last.
    pub fn positions(&self) -> impl Iterator<Item = LatLng> + '_ {
        self.markers
            .iter()
            .chain(self.user_marker.iter())
            .map(|marker| marker.position)
    }
}
