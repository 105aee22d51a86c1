use geo_types::{Rect, coord};

/// Tile ranges covering one area over a span of levels. Going up a level halves the tile
/// indices, so each range is the bottom range shifted right by the level difference.
///
/// Ranges are inclusive: `Rect::max` is the last tile, not one past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCoordsPyramid {
    top_level: i32,
    bottom_level: i32,
    bottom_level_coords: Rect<i32>,
}

impl TileCoordsPyramid {
    pub fn new(top_level: i32, bottom_level: i32) -> Self {
        debug_assert!(
            top_level <= bottom_level,
            "top level {top_level} is below bottom level {bottom_level}"
        );
        Self {
            top_level,
            bottom_level,
            bottom_level_coords: Rect::new(coord! { x: 0, y: 0 }, coord! { x: 0, y: 0 }),
        }
    }

    pub fn with_bottom_level_coords(mut self, coords: Rect<i32>) -> Self {
        self.bottom_level_coords = coords;
        self
    }

    pub fn set_bottom_level_coords(&mut self, coords: Rect<i32>) {
        self.bottom_level_coords = coords;
    }

    pub fn top_level(&self) -> i32 {
        self.top_level
    }

    pub fn bottom_level(&self) -> i32 {
        self.bottom_level
    }

    /// Tile range at `level`, which must lie between the top and the bottom level.
    pub fn coords(&self, level: i32) -> Rect<i32> {
        debug_assert!(
            self.top_level <= level && level <= self.bottom_level,
            "level {level} outside of {}..={}",
            self.top_level,
            self.bottom_level
        );

        let delta = self.bottom_level - level;
        let min = self.bottom_level_coords.min();
        let max = self.bottom_level_coords.max();
        Rect::new(
            coord! { x: min.x >> delta, y: min.y >> delta },
            coord! { x: max.x >> delta, y: max.y >> delta },
        )
    }

    /// Levels from the top (coarsest) down to the bottom, with their ranges.
    pub fn levels(&self) -> impl Iterator<Item = (i32, Rect<i32>)> + '_ {
        (self.top_level..=self.bottom_level).map(|level| (level, self.coords(level)))
    }

    /// Number of tiles on all levels together.
    pub fn tiles_count(&self) -> i64 {
        self.levels()
            .map(|(_, coords)| {
                // Products of large ranges overflow i32.
                (coords.width() as i64 + 1) * (coords.height() as i64 + 1)
            })
            .sum()
    }
}
