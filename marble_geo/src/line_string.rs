//! Polylines and closed rings on the sphere.

use crate::angle::Angle;
use crate::bbox::LatLonAltBox;
use crate::coordinates::Coordinates;

/// Angular resolution (radians per pixel) thresholds below which a detail level is needed.
/// Each step halves the threshold; anything coarser than the last one is level 1.
const DETAIL_LADDER: [(f64, u8); 16] = [
    (0.0000005, 17),
    (0.0000010, 16),
    (0.0000020, 15),
    (0.0000040, 14),
    (0.0000080, 13),
    (0.0000160, 12),
    (0.0000320, 11),
    (0.0000640, 10),
    (0.0001280, 9),
    (0.0002560, 8),
    (0.0005120, 7),
    (0.0010240, 6),
    (0.0020480, 5),
    (0.0040960, 4),
    (0.0081920, 3),
    (0.0163840, 2),
];

/// Detail level a viewport with the given angular resolution resolves. Vertices with a higher
/// [`Coordinates::detail`] are too fine to be seen and can be skipped.
pub fn level_for_resolution(resolution: f64) -> u8 {
    DETAIL_LADDER
        .iter()
        .find(|(threshold, _)| resolution < *threshold)
        .map_or(1, |(_, level)| *level)
}

/// Open polyline. When `tessellate` is set the segments follow great circles and are
/// subdivided before projecting, otherwise they are drawn as straight screen lines.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct LineString {
    coordinates: Vec<Coordinates>,
    tessellate: bool,
}

impl LineString {
    pub fn new(coordinates: Vec<Coordinates>) -> Self {
        Self {
            coordinates,
            tessellate: false,
        }
    }

    pub fn tessellated(coordinates: Vec<Coordinates>) -> Self {
        Self {
            coordinates,
            tessellate: true,
        }
    }

    pub fn tessellate(&self) -> bool {
        self.tessellate
    }

    pub fn set_tessellate(&mut self, tessellate: bool) {
        self.tessellate = tessellate;
    }

    pub fn push(&mut self, coordinates: Coordinates) {
        self.coordinates.push(coordinates);
    }

    pub fn coordinates(&self) -> &[Coordinates] {
        &self.coordinates
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn lat_lon_alt_box(&self) -> LatLonAltBox {
        LatLonAltBox::from_coordinates(&self.coordinates, false)
    }

    /// Sum of the great circle distances between consecutive vertices.
    pub fn angular_length(&self) -> Angle {
        self.coordinates
            .windows(2)
            .fold(Angle::ZERO, |length, pair| {
                length + pair[0].angular_distance(&pair[1])
            })
    }

    /// Vertices with a detail level up to `level`. The end points are always kept.
    pub fn vertices_at_level(&self, level: u8) -> impl Iterator<Item = &Coordinates> {
        let last = self.coordinates.len().saturating_sub(1);
        self.coordinates
            .iter()
            .enumerate()
            .filter(move |(index, c)| *index == 0 || *index == last || c.detail() <= level)
            .map(|(_, c)| c)
    }

    /// Vertices with great circle points inserted so that no segment is longer than `step`.
    pub fn subdivided(&self, step: Angle) -> Vec<Coordinates> {
        subdivide(&self.coordinates, step)
    }
}

impl FromIterator<Coordinates> for LineString {
    fn from_iter<I: IntoIterator<Item = Coordinates>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Closed polyline. The segment from the last vertex back to the first is implied.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct LinearRing(LineString);

impl LinearRing {
    pub fn new(coordinates: Vec<Coordinates>) -> Self {
        Self(LineString::new(coordinates))
    }

    pub fn tessellated(coordinates: Vec<Coordinates>) -> Self {
        Self(LineString::tessellated(coordinates))
    }

    pub fn line_string(&self) -> &LineString {
        &self.0
    }

    pub fn coordinates(&self) -> &[Coordinates] {
        self.0.coordinates()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn lat_lon_alt_box(&self) -> LatLonAltBox {
        LatLonAltBox::from_coordinates(self.0.coordinates(), true)
    }

    /// Perimeter, including the closing segment.
    pub fn angular_length(&self) -> Angle {
        let closing = match self.coordinates() {
            [first, .., last] => last.angular_distance(first),
            _ => Angle::ZERO,
        };
        self.0.angular_length() + closing
    }
}

impl From<LineString> for LinearRing {
    fn from(line_string: LineString) -> Self {
        Self(line_string)
    }
}

impl FromIterator<Coordinates> for LinearRing {
    fn from_iter<I: IntoIterator<Item = Coordinates>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn subdivide(coordinates: &[Coordinates], step: Angle) -> Vec<Coordinates> {
    let step = step.to_radians();
    let mut result = Vec::with_capacity(coordinates.len());

    for pair in coordinates.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        result.push(*from);

        let distance = from.angular_distance(to).to_radians();
        if step > 0.0 && distance > step {
            let count = (distance / step).ceil() as usize;
            for i in 1..count {
                result.push(from.interpolate(to, i as f64 / count as f64));
            }
        }
    }

    result.extend(coordinates.last());
    result
}
