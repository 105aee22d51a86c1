use std::f64::consts::FRAC_PI_2;

use super::{MapProjection, MapRegion, ProjectionKind, cylindrical};
use crate::coordinates::Coordinates;
use crate::position::Pixels;
use crate::viewport::ViewportParams;

/// Plate carrée: longitude and latitude map linearly to x and y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EquirectProjection;

impl EquirectProjection {
    /// Row of the north pole.
    fn top(viewport: &ViewportParams) -> f64 {
        0.5 * viewport.height() as f64 - viewport.radius()
            + viewport.center_latitude() * cylindrical::rad_to_pixel(viewport)
    }
}

impl MapProjection for EquirectProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Equirectangular
    }

    fn repeatable_x(&self) -> bool {
        true
    }

    fn traversable_poles(&self) -> bool {
        false
    }

    fn clipping_radius(&self) -> f64 {
        f64::INFINITY
    }

    fn screen_point(&self, coordinates: &Coordinates, viewport: &ViewportParams) -> Option<Pixels> {
        let (lon, lat) = coordinates.lon_lat();
        let y = 0.5 * viewport.height() as f64
            - cylindrical::rad_to_pixel(viewport) * (lat - viewport.center_latitude());
        Some(Pixels::new(cylindrical::screen_x(lon, viewport), y))
    }

    fn geo_coordinates(&self, pixels: Pixels, viewport: &ViewportParams) -> Option<Coordinates> {
        let top = Self::top(viewport);
        let bottom = top + 2.0 * viewport.radius();
        if pixels.y() < top || pixels.y() >= bottom {
            return None;
        }

        let lat = viewport.center_latitude()
            - (pixels.y() - 0.5 * viewport.height() as f64) / cylindrical::rad_to_pixel(viewport);
        Some(Coordinates::new(
            cylindrical::longitude(pixels.x(), viewport),
            lat.clamp(-FRAC_PI_2, FRAC_PI_2),
            0.0,
        ))
    }

    fn map_region(&self, viewport: &ViewportParams) -> MapRegion {
        let top = Self::top(viewport);
        MapRegion::Band {
            top,
            bottom: top + 2.0 * viewport.radius(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{ScreenPosition, ScreenSize};
    use approx::assert_relative_eq;

    fn viewport() -> ViewportParams {
        ViewportParams::new(
            ProjectionKind::Equirectangular,
            0.0,
            0.0,
            100.0,
            ScreenSize::new(1000, 300),
        )
    }

    #[test]
    fn degrees_are_evenly_spaced() {
        let viewport = viewport();
        let pixels = EquirectProjection
            .screen_point(&Coordinates::from_degrees(90.0, 45.0, 0.0), &viewport)
            .unwrap();
        assert_relative_eq!(pixels.x(), 600.0, epsilon = 1e-9);
        assert_relative_eq!(pixels.y(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn map_is_two_radii_tall() {
        let viewport = viewport();
        assert_eq!(
            EquirectProjection.map_region(&viewport),
            MapRegion::Band {
                top: 50.0,
                bottom: 250.0
            }
        );
        assert!(EquirectProjection.geo_coordinates(Pixels::new(500.0, 49.0), &viewport).is_none());
        assert!(EquirectProjection.geo_coordinates(Pixels::new(500.0, 250.0), &viewport).is_none());

        let pole = EquirectProjection
            .geo_coordinates(Pixels::new(500.0, 50.0), &viewport)
            .unwrap();
        assert_relative_eq!(pole.latitude().to_degrees(), 90.0, epsilon = 1e-9);
        assert!(!EquirectProjection.map_covers_viewport(&viewport));
    }

    #[test]
    fn shown_once_per_period() {
        let viewport = viewport();
        let origin = Coordinates::from_degrees(0.0, 0.0, 0.0);
        let positions = EquirectProjection.screen_positions(&origin, &viewport);
        assert_eq!(
            positions,
            vec![
                Pixels::new(100.0, 150.0),
                Pixels::new(500.0, 150.0),
                Pixels::new(900.0, 150.0)
            ]
        );

        // East of the date line shows up right of a view centered at 170°.
        let mut narrow = viewport.clone();
        narrow.set_size(ScreenSize::new(300, 300));
        narrow.center_on(170f64.to_radians(), 0.0);
        let pixels = EquirectProjection
            .screen_coordinates(&Coordinates::from_degrees(-170.0, 0.0, 0.0), &narrow)
            .pixels()
            .unwrap();
        assert_relative_eq!(pixels.x(), 150.0 + 20.0 * 200.0 / 180.0, epsilon = 1e-9);

        narrow.set_size(ScreenSize::new(10, 300));
        narrow.center_on(180f64.to_radians(), 0.0);
        assert!(matches!(
            EquirectProjection.screen_coordinates(&origin, &narrow),
            ScreenPosition::OffScreen(_)
        ));
    }

    #[test]
    fn columns_wrap_around() {
        let viewport = viewport();
        let c = EquirectProjection
            .geo_coordinates(Pixels::new(750.0, 150.0), &viewport)
            .unwrap();
        assert_relative_eq!(c.longitude().to_degrees(), -135.0, epsilon = 1e-9);
    }
}
