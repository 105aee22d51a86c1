//! Geographic bounding boxes which may cross the antimeridian.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::angle::{DEG2RAD, Latitude, Longitude};
use crate::coordinates::Coordinates;

const TAU: f64 = 2.0 * PI;

/// Box bounded by two parallels and two meridians, plus an altitude range.
///
/// The box spans eastwards from `west` to `east`, so `east < west` means it crosses the
/// antimeridian. All angles are radians, normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct LatLonAltBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
    min_altitude: f64,
    max_altitude: f64,
}

impl LatLonAltBox {
    /// Box spanning the whole planet.
    pub const WORLD: LatLonAltBox = LatLonAltBox {
        north: FRAC_PI_2,
        south: -FRAC_PI_2,
        east: PI,
        west: -PI,
        min_altitude: 0.0,
        max_altitude: 0.0,
    };

    /// Construct from radians. Both latitudes are folded and both longitudes wrapped into their
    /// canonical ranges.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north: Coordinates::normalize_lat(north),
            south: Coordinates::normalize_lat(south),
            east: Coordinates::normalize_lon(east),
            west: Coordinates::normalize_lon(west),
            min_altitude: 0.0,
            max_altitude: 0.0,
        }
    }

    pub fn from_degrees(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self::new(
            north * DEG2RAD,
            south * DEG2RAD,
            east * DEG2RAD,
            west * DEG2RAD,
        )
    }

    pub fn with_altitude(self, min_altitude: f64, max_altitude: f64) -> Self {
        Self {
            min_altitude,
            max_altitude,
            ..self
        }
    }

    pub fn north(&self) -> Latitude {
        Latitude::from_radians(self.north)
    }

    pub fn south(&self) -> Latitude {
        Latitude::from_radians(self.south)
    }

    pub fn east(&self) -> Longitude {
        Longitude::from_radians(self.east)
    }

    pub fn west(&self) -> Longitude {
        Longitude::from_radians(self.west)
    }

    pub fn min_altitude(&self) -> f64 {
        self.min_altitude
    }

    pub fn max_altitude(&self) -> f64 {
        self.max_altitude
    }

    /// North-west corner.
    pub fn north_west(&self) -> Coordinates {
        Coordinates::new(self.west, self.north, 0.0)
    }

    /// South-east corner.
    pub fn south_east(&self) -> Coordinates {
        Coordinates::new(self.east, self.south, 0.0)
    }

    pub fn crosses_date_line(&self) -> bool {
        self.east < self.west
    }

    /// Longitudinal extent in radians, taking the antimeridian into account.
    pub fn width(&self) -> f64 {
        if self.crosses_date_line() {
            TAU - (self.west - self.east)
        } else {
            self.east - self.west
        }
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            Coordinates::normalize_lon(self.west + 0.5 * self.width()),
            0.5 * (self.north + self.south),
            0.5 * (self.min_altitude + self.max_altitude),
        )
    }

    /// A box equal to [`LatLonAltBox::default`] holds no area and is treated as missing when
    /// uniting boxes.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        let (lon, lat) = point.normalized().lon_lat();
        lat >= self.south && lat <= self.north && self.contains_lon(lon)
    }

    fn contains_lon(&self, lon: f64) -> bool {
        if self.crosses_date_line() {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        }
    }

    /// Longitude intervals without antimeridian crossings. A crossing box is split in two.
    fn lon_intervals(&self) -> impl Iterator<Item = (f64, f64)> {
        let (first, second) = if self.crosses_date_line() {
            ((self.west, PI), Some((-PI, self.east)))
        } else {
            ((self.west, self.east), None)
        };
        std::iter::once(first).chain(second)
    }

    /// Whether both boxes share at least one point, edges included.
    pub fn intersects(&self, other: &LatLonAltBox) -> bool {
        if self.south > other.north || self.north < other.south {
            return false;
        }

        self.lon_intervals().any(|(west, east)| {
            other
                .lon_intervals()
                .any(|(other_west, other_east)| west <= other_east && other_west <= east)
        })
    }

    /// Smallest box containing both. Of the two ways to join disjoint longitude ranges, the
    /// narrower one is taken.
    pub fn united(&self, other: &LatLonAltBox) -> LatLonAltBox {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        let (west, east) = united_arc(
            (self.west, self.east, self.width()),
            (other.west, other.east, other.width()),
        );

        LatLonAltBox {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            east,
            west,
            min_altitude: self.min_altitude.min(other.min_altitude),
            max_altitude: self.max_altitude.max(other.max_altitude),
        }
    }

    /// Bounding box of a sequence of points. For `closed` sequences the segment from the last
    /// point back to the first is taken into account too.
    ///
    /// Every crossing of the antimeridian is counted by direction. A path which crosses it
    /// to the east and comes back bounds a box crossing the antimeridian; a path going round
    /// the whole planet (e.g. a closed ring around a pole) spans all longitudes and is extended
    /// to the pole it encloses.
    pub fn from_coordinates<'a>(
        coordinates: impl IntoIterator<Item = &'a Coordinates>,
        closed: bool,
    ) -> LatLonAltBox {
        let mut points = coordinates.into_iter().map(|c| {
            let (lon, lat) = c.normalized().lon_lat();
            (lon, lat, c.altitude())
        });

        let Some(first) = points.next() else {
            return LatLonAltBox::default();
        };

        let (first_lon, first_lat, first_alt) = first;
        let mut north = first_lat;
        let mut south = first_lat;
        let mut east = first_lon;
        let mut west = first_lon;
        let mut min_altitude = first_alt;
        let mut max_altitude = first_alt;

        let mut crossed = false;
        let mut cross_state = 0i32;
        let mut max_cross_state = 0i32;
        let mut min_cross_state = 0i32;

        // Extents of the parts of the path lying beyond the antimeridian.
        let mut other_west = PI;
        let mut other_east = -PI;

        let mut previous_lon = first_lon;
        let closing = closed.then_some(first);

        for (lon, lat, altitude) in points.chain(closing) {
            north = north.max(lat);
            south = south.min(lat);
            min_altitude = min_altitude.min(altitude);
            max_altitude = max_altitude.max(altitude);

            if (previous_lon < 0.0) != (lon < 0.0) && previous_lon.abs() + lon.abs() > PI {
                crossed = true;
                if previous_lon > 0.0 {
                    // Heading east.
                    cross_state -= 1;
                } else {
                    cross_state += 1;
                }
                min_cross_state = min_cross_state.min(cross_state);
                max_cross_state = max_cross_state.max(cross_state);
            }

            if cross_state == 0 {
                east = east.max(lon);
                west = west.min(lon);
            } else if lon < 0.0 {
                other_east = other_east.max(lon);
            } else {
                other_west = other_west.min(lon);
            }

            previous_lon = lon;
        }

        if crossed {
            if min_cross_state < 0 {
                east = other_east;
            }
            if max_cross_state > 0 {
                west = other_west;
            }
            if (min_cross_state < 0 && max_cross_state > 0)
                || min_cross_state < -1
                || max_cross_state > 1
                || west <= east
                || (closed && cross_state != 0)
            {
                east = PI;
                west = -PI;
                if north < 0.0 {
                    south = -FRAC_PI_2;
                } else {
                    north = FRAC_PI_2;
                }
            }
        }

        LatLonAltBox {
            north,
            south,
            east,
            west,
            min_altitude,
            max_altitude,
        }
    }
}

/// Union of two eastward longitude ranges given as (west, east, width). Returns (west, east).
fn united_arc(
    (west_a, east_a, len_a): (f64, f64, f64),
    (west_b, east_b, len_b): (f64, f64, f64),
) -> (f64, f64) {
    if len_a >= TAU || len_b >= TAU {
        return (-PI, PI);
    }

    let b_after_a = (west_b - west_a).rem_euclid(TAU);
    let a_after_b = (west_a - west_b).rem_euclid(TAU);

    if b_after_a + len_b <= len_a {
        return (west_a, east_a);
    }
    if a_after_b + len_a <= len_b {
        return (west_b, east_b);
    }

    let (west, east, len) = if b_after_a <= len_a {
        (west_a, east_b, b_after_a + len_b)
    } else if a_after_b <= len_b {
        (west_b, east_a, a_after_b + len_a)
    } else if b_after_a + len_b <= a_after_b + len_a {
        (west_a, east_b, b_after_a + len_b)
    } else {
        (west_b, east_a, a_after_b + len_a)
    };

    if len >= TAU { (-PI, PI) } else { (west, east) }
}
