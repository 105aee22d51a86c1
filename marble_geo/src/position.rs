//! Types for positions on the screen.

/// Location projected on the screen or an abstract bitmap.
pub type Pixels = geo_types::Point;

/// Projected outline of a line string or a ring, ready to be painted.
pub type ScreenPolygon = geo_types::LineString<f64>;

/// Axis aligned rectangle on the screen, in pixels.
pub type ScreenRect = geo_types::Rect<f64>;

/// Size of the viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The whole viewport as a rectangle with its top left corner at (0, 0).
    pub fn rect(&self) -> ScreenRect {
        ScreenRect::new(
            geo_types::coord! { x: 0.0, y: 0.0 },
            geo_types::coord! { x: self.width as f64, y: self.height as f64 },
        )
    }

    pub fn center(&self) -> Pixels {
        Pixels::new(0.5 * self.width as f64, 0.5 * self.height as f64)
    }
}

/// Result of projecting a geographic point onto the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScreenPosition {
    /// Projected inside the viewport.
    Visible(Pixels),
    /// Projected, but outside of the viewport.
    OffScreen(Pixels),
    /// On the far side of the globe, or outside of what the projection can show.
    Hidden,
}

impl ScreenPosition {
    /// Classify `pixels` depending on whether they land inside a viewport of the given size.
    pub(crate) fn classify(pixels: Pixels, size: ScreenSize) -> Self {
        if pixels.x() >= 0.0
            && pixels.x() < size.width as f64
            && pixels.y() >= 0.0
            && pixels.y() < size.height as f64
        {
            Self::Visible(pixels)
        } else {
            Self::OffScreen(pixels)
        }
    }

    /// Projected pixels, unless the point is hidden.
    pub fn pixels(&self) -> Option<Pixels> {
        match self {
            Self::Visible(pixels) | Self::OffScreen(pixels) => Some(*pixels),
            Self::Hidden => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }

    /// Whether the globe hides the point.
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifying_positions() {
        let size = ScreenSize::new(100, 50);

        assert!(ScreenPosition::classify(Pixels::new(0.0, 0.0), size).is_visible());
        assert!(ScreenPosition::classify(Pixels::new(99.5, 49.5), size).is_visible());
        assert_eq!(
            ScreenPosition::classify(Pixels::new(100.0, 10.0), size),
            ScreenPosition::OffScreen(Pixels::new(100.0, 10.0))
        );
        assert!(!ScreenPosition::classify(Pixels::new(10.0, -1.0), size).is_visible());

        assert_eq!(ScreenPosition::Hidden.pixels(), None);
        assert!(ScreenPosition::Hidden.is_hidden());
    }

    #[test]
    fn viewport_rect_and_center() {
        let size = ScreenSize::new(640, 480);
        assert_eq!(size.center(), Pixels::new(320.0, 240.0));
        assert_eq!(size.rect().width(), 640.0);
        assert_eq!(size.rect().height(), 480.0);
    }
}
