use super::{MapProjection, MapRegion, ProjectionKind, azimuthal};
use crate::coordinates::Coordinates;
use crate::position::Pixels;
use crate::viewport::ViewportParams;

/// Conformal azimuthal projection from the point opposite the view center. Only the near
/// hemisphere is shown, in a disk of twice the globe radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StereographicProjection;

impl MapProjection for StereographicProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Stereographic
    }

    fn traversable_poles(&self) -> bool {
        true
    }

    fn clipping_radius(&self) -> f64 {
        2.0
    }

    fn screen_point(&self, coordinates: &Coordinates, viewport: &ViewportParams) -> Option<Pixels> {
        azimuthal::screen_point(coordinates, viewport, |cos_c| {
            (cos_c > 0.0).then(|| 2.0 / (1.0 + cos_c))
        })
    }

    fn geo_coordinates(&self, pixels: Pixels, viewport: &ViewportParams) -> Option<Coordinates> {
        azimuthal::geo_coordinates(pixels, viewport, |rho| {
            (rho < 2.0).then(|| 2.0 * (0.5 * rho).atan())
        })
    }

    fn map_region(&self, viewport: &ViewportParams) -> MapRegion {
        MapRegion::Disk {
            center: viewport.size().center(),
            radius: viewport.radius() * self.clipping_radius(),
        }
    }
}
