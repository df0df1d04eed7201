//! Results map: confidence colored markers for the ranked candidates and
//! the user position, drawn onto a [`MapSurface`].

pub mod layers;
pub mod leaflet;
pub mod marker;
pub mod render;
pub mod view;

pub use layers::TileLayer;
pub use leaflet::LeafletSurface;
pub use marker::{Marker, MarkerKind, MarkerTier};
pub use render::{MapSurface, error_panel, render_payload_json, render_results};
pub use view::{LatLng, LatLngBounds, MapViewState, ViewStatus};
