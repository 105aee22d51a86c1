//! Layout of the tile grid: how many tiles there are per level and how they map onto the
//! planet.

use std::f64::consts::{FRAC_PI_2, PI};

use geo_types::{Rect, coord};

use crate::bbox::LatLonAltBox;
use crate::coordinates::Coordinates;
use crate::tiles::TileId;
use crate::viewport::ViewportParams;
use crate::zoom::{InvalidZoom, MAX_TILE_LEVEL, TileLevel};

/// Latitude limit of Mercator tiles, where the map becomes square.
pub const MERCATOR_MAX_LATITUDE: f64 = 85.05113 * crate::angle::DEG2RAD;

/// How the tile bitmaps are projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub enum TileProjection {
    /// Rows are equally spaced in latitude.
    #[default]
    Equirectangular,
    /// Rows follow the Mercator projection, clipped at [`MERCATOR_MAX_LATITUDE`].
    Mercator,
}

/// Configuration of a tiled map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TileScheme {
    /// Identifier put into every [`TileId`] of this map.
    pub map_id: u32,

    /// Number of tile columns at level zero.
    pub level_zero_columns: u32,

    /// Number of tile rows at level zero.
    pub level_zero_rows: u32,

    /// Width and height of a single tile in pixels.
    pub tile_size: u32,

    pub projection: TileProjection,

    /// Deepest tile level available.
    pub max_level: i32,
}

impl Default for TileScheme {
    fn default() -> Self {
        Self {
            map_id: 0,
            level_zero_columns: 1,
            level_zero_rows: 1,
            tile_size: 256,
            projection: TileProjection::default(),
            max_level: 20,
        }
    }
}

impl TileScheme {
    /// Number of tile columns at the given level, saturating at `i32::MAX` for levels too deep
    /// for the grid to be addressable.
    pub fn tile_columns(&self, level: i32) -> i32 {
        grid_size(self.level_zero_columns, level).unwrap_or(i32::MAX)
    }

    /// Number of tile rows at the given level, saturating like [`TileScheme::tile_columns`].
    pub fn tile_rows(&self, level: i32) -> i32 {
        grid_size(self.level_zero_rows, level).unwrap_or(i32::MAX)
    }

    /// Deepest level this map has whose whole grid is addressable by [`TileId`].
    pub fn deepest_level(&self) -> i32 {
        let mut level = self.max_level.clamp(0, MAX_TILE_LEVEL);
        while level > 0
            && (grid_size(self.level_zero_columns, level).is_none()
                || grid_size(self.level_zero_rows, level).is_none())
        {
            level -= 1;
        }
        level
    }

    /// Position of the point on the whole map, both axes scaled to `[0, 1]`.
    fn normalized_position(&self, coordinates: &Coordinates) -> (f64, f64) {
        let (lon, lat) = coordinates.normalized().lon_lat();
        let u = (lon + PI) / (2.0 * PI);
        let v = match self.projection {
            TileProjection::Equirectangular => (FRAC_PI_2 - lat) / PI,
            TileProjection::Mercator => {
                let lat = lat.clamp(-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE);
                0.5 - 0.5 * lat.sin().atanh() / PI
            }
        };
        (u, v)
    }

    /// Latitude of the horizontal line at `v` (from 0 at the top to 1 at the bottom).
    fn latitude_at(&self, v: f64) -> f64 {
        match self.projection {
            TileProjection::Equirectangular => FRAC_PI_2 - v * PI,
            TileProjection::Mercator => (PI * (1.0 - 2.0 * v)).sinh().atan(),
        }
    }

    /// Tile containing `coordinates` at the given level. Points on the east and south edges
    /// of the map belong to the last column and row.
    pub fn tile_id(&self, coordinates: &Coordinates, level: i32) -> TileId {
        let (u, v) = self.normalized_position(coordinates);
        let columns = self.tile_columns(level);
        let rows = self.tile_rows(level);

        let x = ((u * columns as f64).floor() as i32).clamp(0, columns - 1);
        let y = ((v * rows as f64).floor() as i32).clamp(0, rows - 1);

        TileId::new(self.map_id, level, x, y)
    }

    /// Like [`TileScheme::tile_id`], but refuses levels this map does not have.
    pub fn checked_tile_id(
        &self,
        coordinates: &Coordinates,
        level: i32,
    ) -> Result<TileId, InvalidZoom> {
        let level: i32 = TileLevel::try_from(level)?.into();
        if level > self.deepest_level() {
            return Err(InvalidZoom);
        }
        Ok(self.tile_id(coordinates, level))
    }

    /// Geographic area covered by the tile.
    pub fn tile_bounds(&self, tile: &TileId) -> LatLonAltBox {
        let columns = self.tile_columns(tile.zoom) as f64;
        let rows = self.tile_rows(tile.zoom) as f64;

        let west = tile.x as f64 / columns * 2.0 * PI - PI;
        let east = (tile.x + 1) as f64 / columns * 2.0 * PI - PI;
        let north = self.latitude_at(tile.y as f64 / rows);
        let south = self.latitude_at((tile.y + 1) as f64 / rows);

        LatLonAltBox::new(north, south, east, west)
    }

    /// Inclusive range of tiles covering `bbox` at the given level. The box must not cross
    /// the antimeridian, otherwise the range is inverted.
    pub fn tile_range(&self, bbox: &LatLonAltBox, level: i32) -> Rect<i32> {
        let north_west = self.tile_id(&bbox.north_west(), level);
        let south_east = self.tile_id(&bbox.south_east(), level);
        Rect::new(
            coord! { x: north_west.x, y: north_west.y },
            coord! { x: south_east.x, y: south_east.y },
        )
    }

    /// Deepest level whose tiles are not magnified on a globe of the given radius.
    pub fn tile_level_for_radius(&self, radius: f64) -> i32 {
        let linear_level =
            4.0 * radius / (self.tile_size as f64 * self.level_zero_columns as f64);

        let level = if linear_level >= 1.0 {
            (linear_level.log2().floor() as i32).saturating_add(1)
        } else {
            0
        };

        level.clamp(0, self.deepest_level())
    }

    /// Tiles needed to cover what the viewport shows, at the level matching its radius.
    pub fn visible_tiles(&self, viewport: &ViewportParams) -> Vec<TileId> {
        let level = self.tile_level_for_radius(viewport.radius());
        let bbox = viewport.view_lat_lon_alt_box();

        let halves = if bbox.crosses_date_line() {
            let (north, south) = (bbox.north().to_radians(), bbox.south().to_radians());
            vec![
                LatLonAltBox::new(north, south, PI, bbox.west().to_radians()),
                LatLonAltBox::new(north, south, bbox.east().to_radians(), -PI),
            ]
        } else {
            vec![bbox]
        };

        let mut tiles: Vec<TileId> = halves
            .iter()
            .flat_map(|half| {
                let range = self.tile_range(half, level);
                (range.min().y..=range.max().y).flat_map(move |y| {
                    (range.min().x..=range.max().x)
                        .map(move |x| TileId::new(self.map_id, level, x, y))
                })
            })
            .collect();

        tiles.sort_unstable();
        tiles.dedup();

        log::trace!("{} tiles visible at level {level}.", tiles.len());
        tiles
    }
}

/// Number of tiles along one axis, `count` at level zero doubling with every level. `None`
/// when it does not fit into `i32`. Negative levels count as level zero.
fn grid_size(count: u32, level: i32) -> Option<i32> {
    let shift = u32::try_from(level.max(0)).ok().filter(|shift| *shift < u32::BITS)?;
    i32::try_from(u64::from(count) << shift).ok()
}
