use super::{MapProjection, MapRegion, ProjectionKind, azimuthal};
use crate::coordinates::Coordinates;
use crate::position::Pixels;
use crate::viewport::ViewportParams;

/// Azimuthal projection from the planet's center, which shows every great circle as a
/// straight line. The near hemisphere covers the whole, unbounded plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GnomonicProjection;

impl MapProjection for GnomonicProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Gnomonic
    }

    fn traversable_poles(&self) -> bool {
        true
    }

    fn clipping_radius(&self) -> f64 {
        f64::INFINITY
    }

    fn screen_point(&self, coordinates: &Coordinates, viewport: &ViewportParams) -> Option<Pixels> {
        azimuthal::screen_point(coordinates, viewport, |cos_c| (cos_c > 0.0).then(|| 1.0 / cos_c))
    }

    fn geo_coordinates(&self, pixels: Pixels, viewport: &ViewportParams) -> Option<Coordinates> {
        azimuthal::geo_coordinates(pixels, viewport, |rho| Some(rho.atan()))
    }

    fn map_region(&self, _viewport: &ViewportParams) -> MapRegion {
        MapRegion::Everywhere
    }
}
