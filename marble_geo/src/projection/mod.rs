//! Map projections, converting between geographic coordinates and viewport pixels.
//!
//! The set of projections is closed, so they are variants of [`Projection`] rather than trait
//! objects. Each one implements [`MapProjection`], which carries the shared algorithms as
//! default methods.

mod azimuthal;
mod cylindrical;
mod equirect;
mod gnomonic;
mod mercator;
mod spherical;
mod stereographic;

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use enum_dispatch::enum_dispatch;

use crate::bbox::LatLonAltBox;
use crate::coordinates::Coordinates;
use crate::position::{Pixels, ScreenPosition, ScreenRect, ScreenSize};
use crate::viewport::ViewportParams;

pub use equirect::EquirectProjection;
pub use gnomonic::GnomonicProjection;
pub use mercator::MercatorProjection;
pub use spherical::SphericalProjection;
pub use stereographic::StereographicProjection;

/// Distance between border samples when estimating the geographic extent of a screen area.
const SAMPLE_STEP: f64 = 4.0;

/// Fewest samples taken along the horizon of a globe.
const MIN_HORIZON_SAMPLES: usize = 64;

/// Altitude range of boxes computed from the screen, wide enough for anything in view.
const MIN_VIEW_ALTITUDE: f64 = -100_000_000.0;
const MAX_VIEW_ALTITUDE: f64 = 100_000_000_000_000.0;

#[enum_dispatch]
pub trait MapProjection {
    fn kind(&self) -> ProjectionKind;

    /// Whether the map repeats sideways, every four globe radii.
    fn repeatable_x(&self) -> bool {
        false
    }

    /// Whether the view may be rotated over a pole.
    fn traversable_poles(&self) -> bool;

    /// Northernmost latitude the projection can show.
    fn max_valid_lat(&self) -> f64 {
        FRAC_PI_2
    }

    /// Southernmost latitude the projection can show.
    fn min_valid_lat(&self) -> f64 {
        -FRAC_PI_2
    }

    /// Northernmost latitude of the map. Same as [`MapProjection::max_valid_lat`].
    fn max_lat(&self) -> f64 {
        self.max_valid_lat()
    }

    /// Southernmost latitude of the map. Same as [`MapProjection::min_valid_lat`].
    fn min_lat(&self) -> f64 {
        self.min_valid_lat()
    }

    fn is_valid_lat(&self, lat: f64) -> bool {
        (self.min_valid_lat()..=self.max_valid_lat()).contains(&lat)
    }

    /// Radius, in globe radii, of the disk the map is drawn in. Infinite for projections
    /// without a horizon.
    fn clipping_radius(&self) -> f64 {
        1.0
    }

    /// Position of the point on the (unbounded) screen plane, or `None` if the globe hides
    /// it. Repeating projections return the copy to which the view center belongs.
    fn screen_point(&self, coordinates: &Coordinates, viewport: &ViewportParams) -> Option<Pixels>;

    fn screen_coordinates(
        &self,
        coordinates: &Coordinates,
        viewport: &ViewportParams,
    ) -> ScreenPosition {
        projected_on_screen(self, coordinates, viewport)
    }

    /// Every position inside the viewport where the point is shown. Repeating projections
    /// may show it several times.
    fn screen_positions(
        &self,
        coordinates: &Coordinates,
        viewport: &ViewportParams,
    ) -> Vec<Pixels> {
        let Some(pixels) = self.screen_point(coordinates, viewport) else {
            return Vec::new();
        };
        if self.repeatable_x() {
            visible_copies(pixels, viewport)
        } else if ScreenPosition::classify(pixels, viewport.size()).is_visible() {
            vec![pixels]
        } else {
            Vec::new()
        }
    }

    /// Geographic point shown at the given pixel, or `None` where the map shows nothing.
    fn geo_coordinates(&self, pixels: Pixels, viewport: &ViewportParams) -> Option<Coordinates>;

    /// Part of the screen plane the map is drawn in.
    fn map_region(&self, viewport: &ViewportParams) -> MapRegion;

    /// Whether no part of the viewport is left empty by the map.
    fn map_covers_viewport(&self, viewport: &ViewportParams) -> bool {
        self.map_region(viewport).covers(viewport.size())
    }

    /// Geographic extent of what is shown in `rect`.
    fn lat_lon_alt_box(&self, rect: ScreenRect, viewport: &ViewportParams) -> LatLonAltBox {
        sampled_lat_lon_alt_box(self, rect, viewport)
    }
}

#[enum_dispatch(MapProjection)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    SphericalProjection,
    EquirectProjection,
    MercatorProjection,
    StereographicProjection,
    GnomonicProjection,
}

impl Default for Projection {
    fn default() -> Self {
        ProjectionKind::default().projection()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ProjectionKind {
    #[default]
    Spherical,
    Equirectangular,
    Mercator,
    Stereographic,
    Gnomonic,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 5] = [
        ProjectionKind::Spherical,
        ProjectionKind::Equirectangular,
        ProjectionKind::Mercator,
        ProjectionKind::Stereographic,
        ProjectionKind::Gnomonic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProjectionKind::Spherical => "spherical",
            ProjectionKind::Equirectangular => "equirectangular",
            ProjectionKind::Mercator => "mercator",
            ProjectionKind::Stereographic => "stereographic",
            ProjectionKind::Gnomonic => "gnomonic",
        }
    }

    pub fn projection(self) -> Projection {
        match self {
            ProjectionKind::Spherical => SphericalProjection.into(),
            ProjectionKind::Equirectangular => EquirectProjection.into(),
            ProjectionKind::Mercator => MercatorProjection.into(),
            ProjectionKind::Stereographic => StereographicProjection.into(),
            ProjectionKind::Gnomonic => GnomonicProjection.into(),
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Unknown projection: {0:?}")]
pub struct UnknownProjection(pub String);

impl FromStr for ProjectionKind {
    type Err = UnknownProjection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectionKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownProjection(s.to_owned()))
    }
}

/// Part of the screen plane covered by a map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapRegion {
    /// Disk of the globe, or of the visible hemisphere.
    Disk { center: Pixels, radius: f64 },
    /// Band between two rows, repeating sideways without end.
    Band { top: f64, bottom: f64 },
    /// The whole plane.
    Everywhere,
}

impl MapRegion {
    pub fn contains(&self, pixels: Pixels) -> bool {
        match *self {
            MapRegion::Disk { center, radius } => {
                (pixels.x() - center.x()).hypot(pixels.y() - center.y()) < radius
            }
            MapRegion::Band { top, bottom } => pixels.y() >= top && pixels.y() < bottom,
            MapRegion::Everywhere => true,
        }
    }

    /// Whether a viewport of the given size lies completely inside the region.
    pub fn covers(&self, size: ScreenSize) -> bool {
        let (width, height) = (size.width as f64, size.height as f64);
        match *self {
            MapRegion::Disk { center, radius } => {
                [(0.0, 0.0), (width, 0.0), (0.0, height), (width, height)]
                    .into_iter()
                    .all(|(x, y)| (x - center.x()).hypot(y - center.y()) <= radius)
            }
            MapRegion::Band { top, bottom } => top <= 0.0 && bottom >= height,
            MapRegion::Everywhere => true,
        }
    }

    /// Samples along the outline of the part of `rect` this region covers, in order around
    /// it. Samples sit half a pixel inside, so that each of them maps to a point.
    fn border_samples(&self, rect: ScreenRect) -> Vec<Pixels> {
        let (min, max) = (rect.min(), rect.max());
        let (left, right) = (min.x + 0.5, (max.x - 0.5).max(min.x + 0.5));
        let (top, bottom) = (min.y + 0.5, (max.y - 0.5).max(min.y + 0.5));

        let mut samples = Vec::new();
        let horizontal = |samples: &mut Vec<Pixels>, y: f64| {
            let steps = ((right - left) / SAMPLE_STEP).ceil().max(1.0) as usize;
            let x = |i: usize| left + (right - left) * i as f64 / steps as f64;
            samples.extend((0..=steps).map(|i| Pixels::new(x(i), y)));
        };
        let vertical = |samples: &mut Vec<Pixels>, x: f64| {
            let steps = ((bottom - top) / SAMPLE_STEP).ceil().max(1.0) as usize;
            let y = |i: usize| top + (bottom - top) * i as f64 / steps as f64;
            samples.extend((0..=steps).map(|i| Pixels::new(x, y(i))));
        };

        horizontal(&mut samples, top);
        horizontal(&mut samples, bottom);
        vertical(&mut samples, left);
        vertical(&mut samples, right);
        samples.retain(|p| self.contains(*p));

        // Outline of the region where it runs through the rectangle.
        match *self {
            MapRegion::Disk { center, radius } => {
                let r = radius - 1.0;
                if r > 0.0 {
                    let count = ((2.0 * PI * r / SAMPLE_STEP).ceil() as usize)
                        .max(MIN_HORIZON_SAMPLES);
                    let inside = |p: &Pixels| {
                        (left..=right).contains(&p.x()) && (top..=bottom).contains(&p.y())
                    };
                    let on_circle =
                        |a: f64| Pixels::new(center.x() + r * a.cos(), center.y() + r * a.sin());
                    samples.extend(
                        (0..count)
                            .map(|i| on_circle(2.0 * PI * i as f64 / count as f64))
                            .filter(inside),
                    );
                }
            }
            MapRegion::Band {
                top: band_top,
                bottom: band_bottom,
            } => {
                for y in [band_top + 0.5, band_bottom - 0.5] {
                    if (top..=bottom).contains(&y) {
                        horizontal(&mut samples, y);
                    }
                }
            }
            MapRegion::Everywhere => {}
        }

        if samples.is_empty() {
            return samples;
        }

        // The covered area is convex, so ordering by angle around its centroid walks along the
        // outline.
        let n = samples.len() as f64;
        let cx = samples.iter().map(|p| p.x()).sum::<f64>() / n;
        let cy = samples.iter().map(|p| p.y()).sum::<f64>() / n;
        samples.sort_by(|a, b| {
            let angle_a = (a.y() - cy).atan2(a.x() - cx);
            let angle_b = (b.y() - cy).atan2(b.x() - cx);
            angle_a.total_cmp(&angle_b)
        });
        samples
    }
}

/// Sideways shifts of a repeating map which bring the horizontal span `x_min..=x_max` into
/// the viewport.
pub(crate) fn repeat_offsets(
    x_min: f64,
    x_max: f64,
    viewport: &ViewportParams,
) -> impl Iterator<Item = f64> {
    let period = 4.0 * viewport.radius();
    let width = viewport.width() as f64;
    let first = (-x_max / period).ceil() as i64;
    let last = ((width - x_min) / period).ceil() as i64 - 1;
    (first..=last).map(move |k| k as f64 * period)
}

fn visible_copies(pixels: Pixels, viewport: &ViewportParams) -> Vec<Pixels> {
    repeat_offsets(pixels.x(), pixels.x(), viewport)
        .map(|offset| Pixels::new(pixels.x() + offset, pixels.y()))
        .filter(|copy| ScreenPosition::classify(*copy, viewport.size()).is_visible())
        .collect()
}

fn projected_on_screen<P: MapProjection + ?Sized>(
    projection: &P,
    coordinates: &Coordinates,
    viewport: &ViewportParams,
) -> ScreenPosition {
    let Some(pixels) = projection.screen_point(coordinates, viewport) else {
        return ScreenPosition::Hidden;
    };
    if projection.repeatable_x()
        && let Some(copy) = visible_copies(pixels, viewport).first()
    {
        return ScreenPosition::Visible(*copy);
    }
    ScreenPosition::classify(pixels, viewport.size())
}

/// Whether the point shows up within `rect`, in any of its copies.
fn shown_in_rect<P: MapProjection + ?Sized>(
    projection: &P,
    coordinates: &Coordinates,
    rect: ScreenRect,
    viewport: &ViewportParams,
) -> bool {
    let Some(pixels) = projection.screen_point(coordinates, viewport) else {
        return false;
    };
    let (min, max) = (rect.min(), rect.max());
    let inside = |x: f64| x >= min.x && x < max.x && pixels.y() >= min.y && pixels.y() < max.y;

    if projection.repeatable_x() {
        let period = 4.0 * viewport.radius();
        let first = ((min.x - pixels.x()) / period).floor() as i64;
        let last = ((max.x - pixels.x()) / period).ceil() as i64;
        (first..=last).any(|k| inside(pixels.x() + k as f64 * period))
    } else {
        inside(pixels.x())
    }
}

/// Geographic extent of a screen area: the outline of the visible map within `rect` is
/// sampled and unprojected. The poles need extra care, as they may lie inside the area
/// without the outline coming near them.
fn sampled_lat_lon_alt_box<P: MapProjection + ?Sized>(
    projection: &P,
    rect: ScreenRect,
    viewport: &ViewportParams,
) -> LatLonAltBox {
    let samples = projection.map_region(viewport).border_samples(rect);
    let outline: Vec<Coordinates> = samples
        .into_iter()
        .filter_map(|pixels| projection.geo_coordinates(pixels, viewport))
        .collect();

    if outline.is_empty() {
        log::trace!("Nothing of the map shown in {rect:?}.");
        return LatLonAltBox::default();
    }

    let bbox = LatLonAltBox::from_coordinates(&outline, true);
    let (mut north, mut south) = (bbox.north().to_radians(), bbox.south().to_radians());
    let (mut east, mut west) = (bbox.east().to_radians(), bbox.west().to_radians());

    let average_lon = bbox.center().longitude().to_radians();
    let max_lat_point = Coordinates::new(average_lon, projection.max_lat(), 0.0);
    let min_lat_point = Coordinates::new(average_lon, projection.min_lat(), 0.0);

    if shown_in_rect(projection, &max_lat_point, rect, viewport) {
        north = projection.max_lat();
        (west, east) = (-PI, PI);
    }
    if shown_in_rect(projection, &min_lat_point, rect, viewport) {
        south = projection.min_lat();
        (west, east) = (-PI, PI);
    }

    LatLonAltBox::new(north, south, east, west).with_altitude(MIN_VIEW_ALTITUDE, MAX_VIEW_ALTITUDE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;

    #[test]
    fn projection_names() {
        for kind in ProjectionKind::ALL {
            assert_eq!(kind.to_string().parse(), Ok(kind));
            assert_eq!(kind.projection().kind(), kind);
        }
        assert_eq!("Mercator".parse(), Ok(ProjectionKind::Mercator));
        assert_eq!(
            "robinson".parse::<ProjectionKind>(),
            Err(UnknownProjection("robinson".to_owned()))
        );
    }

    #[test]
    fn projection_capabilities() {
        let spherical = ProjectionKind::Spherical.projection();
        assert!(!spherical.repeatable_x());
        assert!(spherical.traversable_poles());
        assert_eq!(spherical.clipping_radius(), 1.0);

        let mercator = ProjectionKind::Mercator.projection();
        assert!(mercator.repeatable_x());
        assert!(!mercator.traversable_poles());
        assert!(mercator.max_valid_lat() < FRAC_PI_2);
        assert!(mercator.is_valid_lat(0.0));
        assert!(!mercator.is_valid_lat(1.5));

        let gnomonic = ProjectionKind::Gnomonic.projection();
        assert!(gnomonic.clipping_radius().is_infinite());
        assert_eq!(ProjectionKind::Stereographic.projection().clipping_radius(), 2.0);
    }

    #[test]
    fn regions_covering_the_viewport() {
        let size = ScreenSize::new(100, 60);
        let disk = |radius| MapRegion::Disk {
            center: size.center(),
            radius,
        };
        assert!(disk(59.0).covers(size));
        assert!(!disk(58.0).covers(size));

        assert!(MapRegion::Band { top: 0.0, bottom: 60.0 }.covers(size));
        assert!(!MapRegion::Band { top: 1.0, bottom: 100.0 }.covers(size));
        assert!(MapRegion::Everywhere.covers(size));
    }

    #[test]
    fn repeating_sideways() {
        let mut viewport = ViewportParams::default();
        viewport.set_radius(100.0);
        viewport.set_size(ScreenSize::new(1000, 100));

        let offsets: Vec<f64> = repeat_offsets(10.0, 20.0, &viewport).collect();
        assert_eq!(offsets, vec![0.0, 400.0, 800.0]);

        let offsets: Vec<f64> = repeat_offsets(-450.0, -420.0, &viewport).collect();
        assert_eq!(offsets, vec![800.0, 1200.0]);
    }

    #[test]
    fn border_samples_stay_in_the_region() {
        let rect = ScreenRect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 200.0, y: 100.0 });
        let region = MapRegion::Disk {
            center: Pixels::new(100.0, 50.0),
            radius: 80.0,
        };
        let samples = region.border_samples(rect);
        assert!(!samples.is_empty());
        for p in &samples {
            assert!(region.contains(*p));
            assert!(p.x() > 0.0 && p.x() < 200.0 && p.y() > 0.0 && p.y() < 100.0);
        }

        let band = MapRegion::Band {
            top: 30.0,
            bottom: 300.0,
        };
        let samples = band.border_samples(rect);
        assert!(samples.iter().all(|p| band.contains(*p)));
        assert!(samples.iter().any(|p| p.y() == 30.5));
    }
}
