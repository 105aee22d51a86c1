/// Highest tile level a [`crate::TileScheme`] may be configured with.
pub const MAX_TILE_LEVEL: i32 = 30;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid zoom level")]
pub struct InvalidZoom;

/// Tile level, checked to be in `0..=MAX_TILE_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TileLevel(i32);

impl TryFrom<i32> for TileLevel {
    type Error = InvalidZoom;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if !(0..=MAX_TILE_LEVEL).contains(&value) {
            Err(InvalidZoom)
        } else {
            Ok(Self(value))
        }
    }
}

impl From<TileLevel> for i32 {
    fn from(level: TileLevel) -> Self {
        level.0
    }
}

/// Continuous zoom value as shown to users. It maps exponentially onto the globe radius in
/// pixels, so equal zoom steps feel like equal magnification steps.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Zoom(f64);

/// Zoom change of one "step" of the mouse wheel.
pub const ZOOM_STEP: f64 = 40.0;

impl Zoom {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn from_radius(radius: f64) -> Self {
        Self(zoom_from_radius(radius))
    }

    pub fn radius(&self) -> f64 {
        radius_from_zoom(self.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn zoom_in(&mut self) {
        self.0 += ZOOM_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.0 -= ZOOM_STEP;
    }

    /// Zoom using a relative value.
    pub fn zoom_by(&mut self, value: f64) {
        self.0 += value;
    }
}

impl From<Zoom> for f64 {
    fn from(zoom: Zoom) -> Self {
        zoom.0
    }
}

/// Globe radius in pixels for the given zoom value.
pub fn radius_from_zoom(zoom: f64) -> f64 {
    (zoom / 200.0).exp()
}

/// Zoom value for the given globe radius in pixels.
pub fn zoom_from_radius(radius: f64) -> f64 {
    200.0 * radius.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constructing_tile_level() {
        assert_eq!(Ok(TileLevel(0)), TileLevel::try_from(0));
        assert_eq!(Ok(TileLevel(MAX_TILE_LEVEL)), TileLevel::try_from(MAX_TILE_LEVEL));
        assert_eq!(Err(InvalidZoom), TileLevel::try_from(-1));
        assert_eq!(Err(InvalidZoom), TileLevel::try_from(MAX_TILE_LEVEL + 1));
    }

    #[test]
    fn zoom_and_radius_are_inverse() {
        assert_relative_eq!(radius_from_zoom(0.0), 1.0);
        assert_relative_eq!(zoom_from_radius(radius_from_zoom(1234.0)), 1234.0, epsilon = 1e-9);
        assert_relative_eq!(Zoom::from_radius(2000.0).radius(), 2000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zooming_in_and_out() {
        let mut zoom = Zoom::from_radius(1000.0);
        let radius = zoom.radius();

        zoom.zoom_in();
        assert!(zoom.radius() > radius);

        zoom.zoom_out();
        assert_relative_eq!(zoom.radius(), radius, epsilon = 1e-9);

        zoom.zoom_by(-200.0);
        assert_relative_eq!(zoom.radius(), radius / std::f64::consts::E, epsilon = 1e-9);
    }
}
