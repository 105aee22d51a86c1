use glam::DQuat;

use super::{MapProjection, MapRegion, ProjectionKind, azimuthal};
use crate::coordinates::{Coordinates, EARTH_RADIUS};
use crate::position::Pixels;
use crate::viewport::ViewportParams;

/// Points below this altitude (meters) are hidden as soon as they are on the far hemisphere.
const LOW_ALTITUDE: f64 = 10_000.0;

/// Orthographic view of the globe, as seen from far away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SphericalProjection;

impl MapProjection for SphericalProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Spherical
    }

    fn traversable_poles(&self) -> bool {
        true
    }

    fn screen_point(&self, coordinates: &Coordinates, viewport: &ViewportParams) -> Option<Pixels> {
        let v = azimuthal::view_vector(coordinates, viewport);
        let radius = viewport.radius();
        let pixel_altitude = radius / EARTH_RADIUS * (coordinates.altitude() + EARTH_RADIUS);

        if coordinates.altitude() < LOW_ALTITUDE {
            if v.z < 0.0 {
                return None;
            }
        } else {
            // High points, e.g. satellites, are visible beside the globe even when behind it.
            let x = pixel_altitude * v.x;
            let y = pixel_altitude * v.y;
            if v.z < 0.0 && x * x + y * y < radius * radius {
                return None;
            }
        }

        let center = viewport.size().center();
        Some(Pixels::new(
            center.x() + pixel_altitude * v.x,
            center.y() - pixel_altitude * v.y,
        ))
    }

    fn geo_coordinates(&self, pixels: Pixels, viewport: &ViewportParams) -> Option<Coordinates> {
        let center = viewport.size().center();
        let x = (pixels.x() - center.x()) / viewport.radius();
        let y = -(pixels.y() - center.y()) / viewport.radius();

        let z_squared = 1.0 - x * x - y * y;
        if z_squared < 0.0 {
            return None;
        }

        Some(azimuthal::from_view_vector(
            DQuat::from_xyzw(x, y, z_squared.sqrt(), 0.0),
            viewport,
        ))
    }

    fn map_region(&self, viewport: &ViewportParams) -> MapRegion {
        MapRegion::Disk {
            center: viewport.size().center(),
            radius: viewport.radius() * self.clipping_radius(),
        }
    }
}
