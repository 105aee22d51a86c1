//! Shared parts of the projections which draw meridians as evenly spaced vertical lines. The
//! equator is four globe radii long, and the map repeats sideways with that period.

use std::f64::consts::PI;

use crate::coordinates::Coordinates;
use crate::viewport::ViewportParams;

/// Pixels per radian along the equator.
pub(super) fn rad_to_pixel(viewport: &ViewportParams) -> f64 {
    2.0 * viewport.radius() / PI
}

/// Column of the longitude in the copy of the map centered on the view, that is at most two
/// globe radii away from the screen center.
pub(super) fn screen_x(lon: f64, viewport: &ViewportParams) -> f64 {
    let delta = Coordinates::normalize_lon(lon - viewport.center_longitude());
    0.5 * viewport.width() as f64 + rad_to_pixel(viewport) * delta
}

/// Longitude shown in the given column, in any of the copies.
pub(super) fn longitude(x: f64, viewport: &ViewportParams) -> f64 {
    let delta = (x - 0.5 * viewport.width() as f64) / rad_to_pixel(viewport);
    Coordinates::normalize_lon(viewport.center_longitude() + delta)
}
