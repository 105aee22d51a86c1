//! Shared math of the projections looking at the globe from a point above the view center.
//!
//! Points are first rotated into view space, where x points right, y up and z towards the
//! viewer. For a point on the unit sphere, z is the cosine of its angular distance from the
//! view center.

use glam::DQuat;

use crate::coordinates::Coordinates;
use crate::position::Pixels;
use crate::quaternion::QuaternionExt as _;
use crate::viewport::ViewportParams;

/// Unit vector of the point in view space, as a pure quaternion.
pub(super) fn view_vector(coordinates: &Coordinates, viewport: &ViewportParams) -> DQuat {
    coordinates
        .quaternion()
        .rotate_around_axis(viewport.planet_axis().planetary_inverse())
}

/// Geographic point of a view space unit vector.
pub(super) fn from_view_vector(vector: DQuat, viewport: &ViewportParams) -> Coordinates {
    let (lon, lat) = vector.rotate_around_axis(viewport.planet_axis()).spherical();
    Coordinates::new(lon, lat, 0.0)
}

/// Project with a radial scale depending on the cosine of the distance from the center, or
/// hide the point if `scale` returns `None`.
pub(super) fn screen_point(
    coordinates: &Coordinates,
    viewport: &ViewportParams,
    scale: impl Fn(f64) -> Option<f64>,
) -> Option<Pixels> {
    let v = view_vector(coordinates, viewport);
    let k = scale(v.z)? * viewport.radius();
    let center = viewport.size().center();
    Some(Pixels::new(center.x() + k * v.x, center.y() - k * v.y))
}

/// Inverse of [`screen_point`]. `distance` turns the distance from the screen center, in
/// globe radii, into the angular distance from the view center.
pub(super) fn geo_coordinates(
    pixels: Pixels,
    viewport: &ViewportParams,
    distance: impl Fn(f64) -> Option<f64>,
) -> Option<Coordinates> {
    let center = viewport.size().center();
    let x = (pixels.x() - center.x()) / viewport.radius();
    let y = -(pixels.y() - center.y()) / viewport.radius();
    let rho = x.hypot(y);

    if rho == 0.0 {
        return Some(from_view_vector(DQuat::from_xyzw(0.0, 0.0, 1.0, 0.0), viewport));
    }

    let (sin_c, cos_c) = distance(rho)?.sin_cos();
    Some(from_view_vector(
        DQuat::from_xyzw(sin_c * x / rho, sin_c * y / rho, cos_c, 0.0),
        viewport,
    ))
}
