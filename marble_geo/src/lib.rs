#![doc = include_str!("../README.md")]
#![deny(clippy::unwrap_used, rustdoc::broken_intra_doc_links)]

mod angle;
mod bbox;
mod coordinates;
mod line_string;
mod position;
pub mod projection;
mod pyramid;
mod quaternion;
mod scene;
mod screen_polygons;
mod shared_scene;
mod tile_scheme;
mod tiles;
mod viewport;
mod zoom;

pub use angle::{
    Angle, DEG2RAD, Latitude, Longitude, NormalizedLatitude, NormalizedLongitude, RAD2DEG,
};
pub use bbox::LatLonAltBox;
pub use coordinates::{BearingKind, Coordinates, EARTH_RADIUS, Pole};
pub use glam::DQuat;
pub use line_string::{LineString, LinearRing, level_for_resolution};
pub use position::{Pixels, ScreenPolygon, ScreenPosition, ScreenRect, ScreenSize};
pub use projection::{MapProjection, MapRegion, Projection, ProjectionKind, UnknownProjection};
pub use pyramid::TileCoordsPyramid;
pub use quaternion::QuaternionExt;
pub use scene::{FeatureId, GeoGraphicsScene, GeometryKind, GraphicsItem, default_z_value};
pub use shared_scene::SharedScene;
pub use tile_scheme::{MERCATOR_MAX_LATITUDE, TileProjection, TileScheme};
pub use tiles::{ParseTileIdError, TileId, map_id_for};
pub use viewport::{MIN_RADIUS, ViewportParams};
pub use zoom::{
    InvalidZoom, MAX_TILE_LEVEL, TileLevel, ZOOM_STEP, Zoom, radius_from_zoom, zoom_from_radius,
};
