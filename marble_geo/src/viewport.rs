use std::cell::OnceCell;
use std::f64::consts::{FRAC_PI_2, PI};

use glam::DQuat;

use crate::bbox::LatLonAltBox;
use crate::coordinates::Coordinates;
use crate::line_string::{LineString, LinearRing};
use crate::position::{Pixels, ScreenPolygon, ScreenPosition, ScreenRect, ScreenSize};
use crate::projection::{MapProjection as _, Projection, ProjectionKind};
use crate::quaternion::QuaternionExt as _;
use crate::screen_polygons;
use crate::zoom::Zoom;

/// Smallest globe radius in pixels a viewport accepts.
pub const MIN_RADIUS: f64 = 1.0;

/// How the planet is looked at: the projection, its rotation, zoom and the size of the
/// viewport. Everything converting between geographic coordinates and pixels goes through
/// here.
#[derive(Debug, Clone)]
pub struct ViewportParams {
    projection: Projection,
    planet_axis: DQuat,
    heading: f64,

    // Derived from the planet axis, but kept exactly as given when centering directly.
    center_lon: f64,
    center_lat: f64,

    /// Globe radius in pixels. Never below one pixel.
    radius: f64,
    size: ScreenSize,
    focus_point: Option<Coordinates>,
    view_box: OnceCell<LatLonAltBox>,
}

impl Default for ViewportParams {
    fn default() -> Self {
        Self::new(ProjectionKind::Spherical, 0.0, 0.0, 2000.0, ScreenSize::new(100, 100))
    }
}

impl ViewportParams {
    /// View of `(lon, lat)` (radians) in the middle of the screen, with a globe `radius`
    /// pixels large.
    pub fn new(
        projection: ProjectionKind,
        lon: f64,
        lat: f64,
        radius: f64,
        size: ScreenSize,
    ) -> Self {
        let mut viewport = Self {
            projection: projection.projection(),
            planet_axis: DQuat::IDENTITY,
            heading: 0.0,
            center_lon: 0.0,
            center_lat: 0.0,
            radius: 2000.0,
            size,
            focus_point: None,
            view_box: OnceCell::new(),
        };
        viewport.set_radius(radius);
        viewport.center_on(lon, lat);
        viewport
    }

    pub fn projection(&self) -> ProjectionKind {
        self.projection.kind()
    }

    pub fn current_projection(&self) -> &Projection {
        &self.projection
    }

    /// Switch the projection. The view is centered again, as the new projection may not be
    /// able to show the current center.
    pub fn set_projection(&mut self, projection: ProjectionKind) {
        self.projection = projection.projection();
        self.center_on(self.center_lon, self.center_lat);
    }

    pub fn planet_axis(&self) -> DQuat {
        self.planet_axis
    }

    /// Rotate the planet, moving the view center along. The heading is kept as set.
    pub fn set_planet_axis(&mut self, axis: DQuat) {
        self.planet_axis = axis;
        let (lon, lat) = DQuat::from_spherical(0.0, 0.0).rotate_around_axis(axis).spherical();
        self.center_lon = lon;
        self.center_lat = lat;
        self.invalidate();
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Zoom in or out. Radii below [`MIN_RADIUS`] are ignored.
    pub fn set_radius(&mut self, radius: f64) {
        if radius >= MIN_RADIUS && radius.is_finite() {
            self.radius = radius;
            self.invalidate();
        } else {
            log::debug!("Ignoring globe radius {radius}.");
        }
    }

    pub fn zoom(&self) -> Zoom {
        Zoom::from_radius(self.radius)
    }

    pub fn set_zoom(&mut self, zoom: Zoom) {
        self.set_radius(zoom.radius());
    }

    /// Rough angle covered by a single pixel, in radians.
    pub fn angular_resolution(&self) -> f64 {
        0.25 * PI / self.radius.abs()
    }

    pub fn size(&self) -> ScreenSize {
        self.size
    }

    pub fn set_size(&mut self, size: ScreenSize) {
        self.size = size;
        self.invalidate();
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Rotation of the map around the view center, in radians.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn set_heading(&mut self, heading: f64) {
        self.heading = heading;
        self.center_on(self.center_lon, self.center_lat);
    }

    /// Longitude of the view center, in radians.
    pub fn center_longitude(&self) -> f64 {
        self.center_lon
    }

    /// Latitude of the view center, in radians.
    pub fn center_latitude(&self) -> f64 {
        self.center_lat
    }

    /// Move the view to `(lon, lat)`, in radians, keeping the heading.
    ///
    /// Projections which cannot look over the poles get the latitude clamped to the part of
    /// the planet they show. The others carry on over the pole to the far side.
    pub fn center_on(&mut self, lon: f64, lat: f64) {
        let lat = if self.projection.traversable_poles() {
            Coordinates::normalize_lon(lat)
        } else {
            lat.clamp(self.projection.min_lat(), self.projection.max_lat())
        };
        let lon = Coordinates::normalize_lon(lon);

        let axis = DQuat::from_pitch_yaw_roll(-lat, lon, 0.0)
            * DQuat::from_pitch_yaw_roll(0.0, 0.0, self.heading);
        self.set_planet_axis(axis);

        if lat.abs() <= FRAC_PI_2 {
            self.center_lon = lon;
            self.center_lat = lat;
        }
    }

    /// Point the view should treat as its center, e.g. for zooming, while an animation has
    /// not caught up yet. Falls back to the actual center.
    pub fn focus_point(&self) -> Coordinates {
        self.focus_point
            .unwrap_or_else(|| Coordinates::new(self.center_lon, self.center_lat, 0.0))
    }

    pub fn set_focus_point(&mut self, focus_point: Coordinates) {
        self.focus_point = Some(focus_point);
    }

    pub fn reset_focus_point(&mut self) {
        self.focus_point = None;
    }

    /// Geographic extent of the whole viewport.
    pub fn view_lat_lon_alt_box(&self) -> LatLonAltBox {
        *self
            .view_box
            .get_or_init(|| self.projection.lat_lon_alt_box(self.size.rect(), self))
    }

    /// Geographic extent of a part of the viewport.
    pub fn lat_lon_alt_box(&self, rect: ScreenRect) -> LatLonAltBox {
        self.projection.lat_lon_alt_box(rect, self)
    }

    pub fn map_covers_viewport(&self) -> bool {
        self.projection.map_covers_viewport(self)
    }

    /// Whether the box is more than `pixel` pixels large on screen, by a rough estimate.
    pub fn resolves_box(&self, bbox: &LatLonAltBox, pixel: f64) -> bool {
        bbox.width() + bbox.height() > pixel * self.angular_resolution()
    }

    /// Whether the two points are told apart on screen, by a rough estimate.
    pub fn resolves(&self, first: &Coordinates, second: &Coordinates) -> bool {
        let (lon1, lat1) = first.lon_lat();
        let (lon2, lat2) = second.lon_lat();
        (lon2 - lon1).abs() + (lat2 - lat1).abs() > self.angular_resolution()
    }

    pub fn geo_coordinates(&self, pixels: Pixels) -> Option<Coordinates> {
        self.projection.geo_coordinates(pixels, self)
    }

    pub fn screen_coordinates(&self, coordinates: &Coordinates) -> ScreenPosition {
        self.projection.screen_coordinates(coordinates, self)
    }

    /// Every position in the viewport where the point is shown.
    pub fn screen_positions(&self, coordinates: &Coordinates) -> Vec<Pixels> {
        self.projection.screen_positions(coordinates, self)
    }

    /// Screen outlines of the line string. It is split wherever it disappears behind the
    /// globe or jumps across the map edge.
    pub fn line_string_polygons(&self, line_string: &LineString) -> Vec<ScreenPolygon> {
        screen_polygons::line_string_polygons(self, line_string)
    }

    /// Like [`ViewportParams::line_string_polygons`], with every piece closed.
    pub fn linear_ring_polygons(&self, ring: &LinearRing) -> Vec<ScreenPolygon> {
        screen_polygons::linear_ring_polygons(self, ring)
    }

    fn invalidate(&mut self) {
        self.view_box.take();
    }
}
