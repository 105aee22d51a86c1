use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::coordinates::Coordinates;
use crate::tile_scheme::TileScheme;

/// Identifies the tile in the tile grid of a map.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct TileId {
    /// Map (texture or vector dataset) the tile belongs to, see [`map_id_for`].
    pub map_id: u32,

    /// Tile level, where 0 means the level-zero grid of the tile scheme.
    pub zoom: i32,

    /// Column, counted eastwards from the antimeridian.
    pub x: i32,

    /// Row, counted southwards from the north.
    pub y: i32,
}

impl TileId {
    pub fn new(map_id: u32, zoom: i32, x: i32, y: i32) -> Self {
        Self { map_id, zoom, x, y }
    }

    /// Tile containing `coordinates` in the default scheme: a single equirectangular tile at
    /// level zero, doubling in both directions with every level.
    pub fn from_coordinates(coordinates: &Coordinates, zoom: i32) -> Self {
        TileScheme::default().tile_id(coordinates, zoom)
    }

    /// Tile one level up which contains this one.
    pub fn parent(&self) -> Option<TileId> {
        (self.zoom > 0).then(|| TileId {
            map_id: self.map_id,
            zoom: self.zoom - 1,
            x: self.x >> 1,
            y: self.y >> 1,
        })
    }

    /// The four tiles one level down covering this one.
    pub fn children(&self) -> [TileId; 4] {
        let child = |dx, dy| TileId {
            map_id: self.map_id,
            zoom: self.zoom + 1,
            x: 2 * self.x + dx,
            y: 2 * self.y + dy,
        };
        [child(0, 0), child(1, 0), child(0, 1), child(1, 1)]
    }
}

/// Formats as the `map:zoom/x/y` key.
impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}/{}", self.map_id, self.zoom, self.x, self.y)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseTileIdError {
    #[error("Expected \"zoom/x/y\" or \"map:zoom/x/y\", got: {0:?}")]
    Format(String),

    #[error("Invalid number in tile key: {0}")]
    Number(#[from] ParseIntError),
}

/// Parses `zoom/x/y`, or `map:zoom/x/y` as produced by [`TileId`]'s `Display`. A missing map
/// id stands for map 0.
impl FromStr for TileId {
    type Err = ParseTileIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (map_id, path) = match s.split_once(':') {
            Some((map_id, path)) => (map_id.parse()?, path),
            None => (0, s),
        };

        let mut parts = path.split('/');
        let (Some(zoom), Some(x), Some(y), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseTileIdError::Format(s.to_owned()));
        };

        Ok(TileId {
            map_id,
            zoom: zoom.parse()?,
            x: x.parse()?,
            y: y.parse()?,
        })
    }
}

/// Identifier of a map, derived from its name with 32 bit FNV-1a. The same name gives the
/// same id in every build and process, so ids may be persisted.
pub fn map_id_for(name: &str) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    name.bytes().fold(OFFSET_BASIS, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_of_the_equator_and_prime_meridian() {
        let zoom = 1;
        let last = (2 << (zoom - 1)) - 1;
        let mid = (last as f64 / 2.0).round() as i32;

        let tile = TileId::from_coordinates(&Coordinates::from_degrees(0.0, 0.0, 0.0), zoom);
        assert_eq!(tile, TileId::new(0, zoom, last, mid));
        assert_eq!(tile, TileId::new(0, 1, 1, 1));
    }

    #[test]
    fn tiles_at_the_edges_of_the_map() {
        let zoom = 1;
        let tile =
            |lon, lat| TileId::from_coordinates(&Coordinates::from_degrees(lon, lat, 0.0), zoom);

        assert_eq!(tile(-180.0, 90.0), TileId::new(0, 1, 0, 0));
        assert_eq!(tile(180.0, 0.0), TileId::new(0, 1, 1, 1));
        assert_eq!(tile(180.0, -90.0), TileId::new(0, 1, 1, 1));
        assert_eq!(tile(-0.001, 0.001), TileId::new(0, 1, 0, 0));
    }

    #[test]
    fn parents_and_children() {
        let tile = TileId::new(7, 3, 5, 2);
        assert_eq!(tile.parent(), Some(TileId::new(7, 2, 2, 1)));
        assert_eq!(TileId::new(7, 0, 0, 0).parent(), None);

        for child in tile.children() {
            assert_eq!(child.zoom, 4);
            assert_eq!(child.parent(), Some(tile));
        }
    }

    #[test]
    fn tile_keys() {
        let tile = TileId::new(42, 3, 5, 2);
        assert_eq!(tile.to_string(), "42:3/5/2");
        assert_eq!("42:3/5/2".parse(), Ok(tile));
        assert_eq!("3/5/2".parse(), Ok(TileId::new(0, 3, 5, 2)));

        assert_eq!(
            "3/5".parse::<TileId>(),
            Err(ParseTileIdError::Format("3/5".to_owned()))
        );
        assert!(matches!(
            "3/5/2/1".parse::<TileId>(),
            Err(ParseTileIdError::Format(_))
        ));
        assert!(matches!(
            "a:3/5/2".parse::<TileId>(),
            Err(ParseTileIdError::Number(_))
        ));
    }

    #[test]
    fn map_ids_depend_on_the_name() {
        assert_eq!(map_id_for("earth/bluemarble"), map_id_for("earth/bluemarble"));
        assert_ne!(map_id_for("earth/bluemarble"), map_id_for("earth/openstreetmap"));
    }

    #[test]
    fn map_ids_are_fixed() {
        assert_eq!(map_id_for(""), 0x811c_9dc5);
        assert_eq!(map_id_for("a"), 0xe40c_292c);
        assert_eq!(map_id_for("foobar"), 0xbf9c_f968);
    }
}
