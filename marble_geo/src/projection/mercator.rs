use super::{MapProjection, MapRegion, ProjectionKind, cylindrical, visible_copies};
use crate::coordinates::Coordinates;
use crate::position::{Pixels, ScreenPosition};
use crate::tile_scheme::MERCATOR_MAX_LATITUDE;
use crate::viewport::ViewportParams;

/// Inverse Gudermannian function: the Mercator ordinate of a latitude, in radians.
fn gd_inv(lat: f64) -> f64 {
    lat.sin().atanh()
}

/// Conformal cylindrical projection, cut off where the map becomes square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MercatorProjection;

impl MercatorProjection {
    /// Rows of the northern and southern map edges.
    fn edges(viewport: &ViewportParams) -> (f64, f64) {
        let rad_to_pixel = cylindrical::rad_to_pixel(viewport);
        let top = 0.5 * viewport.height() as f64
            - rad_to_pixel * (gd_inv(MERCATOR_MAX_LATITUDE) - gd_inv(viewport.center_latitude()));
        (top, top + 2.0 * rad_to_pixel * gd_inv(MERCATOR_MAX_LATITUDE))
    }
}

impl MapProjection for MercatorProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Mercator
    }

    fn repeatable_x(&self) -> bool {
        true
    }

    fn traversable_poles(&self) -> bool {
        false
    }

    fn max_valid_lat(&self) -> f64 {
        MERCATOR_MAX_LATITUDE
    }

    fn min_valid_lat(&self) -> f64 {
        -MERCATOR_MAX_LATITUDE
    }

    fn clipping_radius(&self) -> f64 {
        f64::INFINITY
    }

    /// Latitudes beyond the map edges are clamped onto them.
    fn screen_point(&self, coordinates: &Coordinates, viewport: &ViewportParams) -> Option<Pixels> {
        let (lon, lat) = coordinates.normalized().lon_lat();
        let lat = lat.clamp(self.min_valid_lat(), self.max_valid_lat());
        let offset = gd_inv(lat) - gd_inv(viewport.center_latitude());
        let y = 0.5 * viewport.height() as f64 - cylindrical::rad_to_pixel(viewport) * offset;
        Some(Pixels::new(cylindrical::screen_x(lon, viewport), y))
    }

    /// Points beyond the map edges are never reported as visible, even though they are
    /// projected onto them.
    fn screen_coordinates(
        &self,
        coordinates: &Coordinates,
        viewport: &ViewportParams,
    ) -> ScreenPosition {
        let Some(pixels) = self.screen_point(coordinates, viewport) else {
            return ScreenPosition::Hidden;
        };
        if !self.is_valid_lat(coordinates.normalized().latitude().to_radians()) {
            return ScreenPosition::OffScreen(pixels);
        }
        match visible_copies(pixels, viewport).first() {
            Some(copy) => ScreenPosition::Visible(*copy),
            None => ScreenPosition::OffScreen(pixels),
        }
    }

    fn screen_positions(
        &self,
        coordinates: &Coordinates,
        viewport: &ViewportParams,
    ) -> Vec<Pixels> {
        if !self.is_valid_lat(coordinates.normalized().latitude().to_radians()) {
            return Vec::new();
        }
        self.screen_point(coordinates, viewport)
            .map(|pixels| visible_copies(pixels, viewport))
            .unwrap_or_default()
    }

    fn geo_coordinates(&self, pixels: Pixels, viewport: &ViewportParams) -> Option<Coordinates> {
        let (top, bottom) = Self::edges(viewport);
        if pixels.y() < top || pixels.y() >= bottom {
            return None;
        }

        let ordinate = gd_inv(viewport.center_latitude())
            + (0.5 * viewport.height() as f64 - pixels.y()) / cylindrical::rad_to_pixel(viewport);
        let lat = ordinate.sinh().atan().clamp(self.min_valid_lat(), self.max_valid_lat());
        Some(Coordinates::new(cylindrical::longitude(pixels.x(), viewport), lat, 0.0))
    }

    fn map_region(&self, viewport: &ViewportParams) -> MapRegion {
        let (top, bottom) = Self::edges(viewport);
        MapRegion::Band { top, bottom }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::ScreenSize;
    use approx::assert_relative_eq;

    fn viewport() -> ViewportParams {
        ViewportParams::new(
            ProjectionKind::Mercator,
            0.0,
            0.0,
            100.0,
            ScreenSize::new(400, 600),
        )
    }

    #[test]
    fn map_is_square() {
        let viewport = viewport();
        let MapRegion::Band { top, bottom } = MercatorProjection.map_region(&viewport) else {
            panic!("Mercator map is a band");
        };
        assert_relative_eq!(bottom - top, 400.0, epsilon = 1e-3);
        assert_relative_eq!(top + bottom, 600.0, epsilon = 1e-9);
    }

    #[test]
    fn latitudes_beyond_the_edge_are_clamped() {
        let viewport = viewport();
        let edge = MercatorProjection
            .screen_point(&Coordinates::new(0.0, MERCATOR_MAX_LATITUDE, 0.0), &viewport)
            .unwrap();
        let pole = Coordinates::from_degrees(0.0, 90.0, 0.0);
        assert_eq!(MercatorProjection.screen_point(&pole, &viewport), Some(edge));

        // Inside of the viewport, but still not visible.
        assert_eq!(
            MercatorProjection.screen_coordinates(&pole, &viewport),
            ScreenPosition::OffScreen(edge)
        );
        assert!(MercatorProjection.screen_positions(&pole, &viewport).is_empty());
    }

    #[test]
    fn latitudes_past_the_pole_fold_back_onto_the_map() {
        let viewport = viewport();
        // 95° north is 85° north on the opposite meridian, just inside of the map edge.
        let past_the_pole = Coordinates::from_degrees(30.0, 95.0, 0.0);
        let folded = Coordinates::from_degrees(-150.0, 85.0, 0.0);

        let ScreenPosition::Visible(pixels) =
            MercatorProjection.screen_coordinates(&past_the_pole, &viewport)
        else {
            panic!("{past_the_pole} is on the map");
        };
        let expected = MercatorProjection.screen_point(&folded, &viewport).unwrap();
        assert_relative_eq!(pixels.x(), expected.x(), epsilon = 1e-6);
        assert_relative_eq!(pixels.y(), expected.y(), epsilon = 1e-6);
        assert_eq!(MercatorProjection.screen_positions(&past_the_pole, &viewport).len(), 1);

        // 100° north folds onto 80° and is not clamped to the edge.
        let edge = MercatorProjection
            .screen_point(&Coordinates::new(0.0, MERCATOR_MAX_LATITUDE, 0.0), &viewport)
            .unwrap();
        let far = Coordinates::from_degrees(30.0, 100.0, 0.0);
        let pixels = MercatorProjection.screen_point(&far, &viewport).unwrap();
        assert!(pixels.y() > edge.y());
    }

    #[test]
    fn rows_grow_apart_towards_the_poles() {
        let viewport = viewport();
        let row = |lat: f64| {
            MercatorProjection
                .screen_point(&Coordinates::from_degrees(0.0, lat, 0.0), &viewport)
                .unwrap()
                .y()
        };
        assert!(row(10.0) - row(20.0) < row(60.0) - row(70.0));
    }

    #[test]
    fn screen_and_back() {
        let mut viewport = viewport();
        viewport.center_on(10f64.to_radians(), 50f64.to_radians());
        for (x, y) in [(200.0, 300.0), (10.0, 200.0), (390.0, 480.0)] {
            let coordinates = MercatorProjection
                .geo_coordinates(Pixels::new(x, y), &viewport)
                .unwrap();
            let pixels = MercatorProjection.screen_point(&coordinates, &viewport).unwrap();
            assert_relative_eq!(pixels.x(), x, epsilon = 1e-6);
            assert_relative_eq!(pixels.y(), y, epsilon = 1e-6);
        }
    }
}
