//! Spatial index of drawable items, bucketed by the tiles they fit into.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use std::sync::Arc;

use geo_types::Rect;

use crate::bbox::LatLonAltBox;
use crate::pyramid::TileCoordsPyramid;
use crate::tile_scheme::TileScheme;
use crate::tiles::TileId;
use crate::zoom::MAX_TILE_LEVEL;

/// Identifies the feature (placemark, track, ...) an item draws. A feature may be drawn by
/// several items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct FeatureId(pub u64);

/// Anything the scene can hold.
pub trait GraphicsItem {
    fn feature(&self) -> FeatureId;

    fn lat_lon_alt_box(&self) -> LatLonAltBox;

    /// Drawing order. Items with a higher value are drawn on top.
    fn z_value(&self) -> f64;

    /// Lowest tile level at which the item is shown.
    fn min_zoom_level(&self) -> i32 {
        0
    }

    fn visible(&self) -> bool {
        true
    }
}

/// Kinds of geometry, for picking a default drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Polygon,
    Building,
    LineString,
    Track,
    Point,
    Label,
}

/// Drawing order of items of the given kind: areas at the bottom, labels on top.
pub const fn default_z_value(kind: GeometryKind) -> f64 {
    const BASE: f64 = 50.0;
    match kind {
        GeometryKind::Polygon => BASE - 20.0,
        GeometryKind::Building => BASE - 10.0,
        GeometryKind::LineString => BASE,
        GeometryKind::Track => BASE + 10.0,
        GeometryKind::Point => BASE + 20.0,
        GeometryKind::Label => BASE + 30.0,
    }
}

#[derive(Debug)]
struct Entry<T> {
    item: Arc<T>,
    z_value: f64,
    sequence: u64,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            item: Arc::clone(&self.item),
            z_value: self.z_value,
            sequence: self.sequence,
        }
    }
}

impl<T> Entry<T> {
    fn order(&self, other: &Entry<T>) -> std::cmp::Ordering {
        self.z_value
            .total_cmp(&other.z_value)
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// Items bucketed by the tile they fit into, so that only buckets near a queried area need to
/// be looked at.
///
/// Each item is put into the deepest tile, not deeper than its minimal zoom level, which
/// holds its whole bounding box. Buckets are kept ordered by z value, ties broken by
/// insertion order.
#[derive(Debug)]
pub struct GeoGraphicsScene<T> {
    buckets: HashMap<TileId, Vec<Entry<T>>>,
    features: HashMap<FeatureId, Vec<TileId>>,
    highlighted: HashSet<FeatureId>,
    next_sequence: u64,
}

impl<T> Default for GeoGraphicsScene<T> {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
            features: HashMap::new(),
            highlighted: HashSet::new(),
            next_sequence: 0,
        }
    }
}

impl<T> Clone for GeoGraphicsScene<T> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            features: self.features.clone(),
            highlighted: self.highlighted.clone(),
            next_sequence: self.next_sequence,
        }
    }
}

impl<T: GraphicsItem> GeoGraphicsScene<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: T) {
        self.insert(Arc::new(item));
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.add_item(item);
        }
    }

    fn insert(&mut self, item: Arc<T>) {
        let tile = bucket_tile(item.as_ref());
        let entry = Entry {
            z_value: item.z_value(),
            sequence: self.next_sequence,
            item,
        };
        self.next_sequence += 1;

        let feature = entry.item.feature();
        let bucket = self.buckets.entry(tile).or_default();
        let position = bucket.partition_point(|other| other.order(&entry).is_lt());
        bucket.insert(position, entry);

        let tiles = self.features.entry(feature).or_default();
        if !tiles.contains(&tile) {
            tiles.push(tile);
        }
    }

    /// Remove every item of the feature, returning how many there were.
    pub fn remove_item(&mut self, feature: FeatureId) -> usize {
        let Some(tiles) = self.features.remove(&feature) else {
            log::warn!("Feature {feature:?} is not in the scene.");
            return 0;
        };

        let mut removed = 0;
        for tile in tiles {
            if let Some(bucket) = self.buckets.get_mut(&tile) {
                let before = bucket.len();
                bucket.retain(|entry| entry.item.feature() != feature);
                removed += before - bucket.len();
                if bucket.is_empty() {
                    self.buckets.remove(&tile);
                }
            }
        }
        removed
    }

    pub fn remove_features(&mut self, features: impl IntoIterator<Item = FeatureId>) -> usize {
        features
            .into_iter()
            .map(|feature| self.remove_item(feature))
            .sum()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.features.clear();
        self.highlighted.clear();
    }

    /// Put every item into its bucket again. Needed after the bounding boxes, z values or
    /// minimal zoom levels of items changed. Visibility is checked on every query and needs
    /// no rebucketing.
    pub fn rebucket(&mut self) {
        let mut entries: Vec<Entry<T>> =
            self.buckets.drain().flat_map(|(_, bucket)| bucket).collect();
        entries.sort_by_key(|entry| entry.sequence);
        self.features.clear();

        for entry in entries {
            self.insert(entry.item);
        }
        log::debug!("Rebucketed {} items into {} tiles.", self.len(), self.buckets.len());
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Mark the given features as highlighted, replacing the previous selection.
    pub fn apply_highlight(&mut self, features: impl IntoIterator<Item = FeatureId>) {
        self.highlighted = features.into_iter().collect();
    }

    pub fn is_highlighted(&self, feature: FeatureId) -> bool {
        self.highlighted.contains(&feature)
    }

    /// Visible items within `bbox` at the given tile level, ordered by z value.
    pub fn items(&self, bbox: &LatLonAltBox, zoom: i32) -> Vec<Arc<T>> {
        if bbox.crosses_date_line() {
            let (north, south) = (bbox.north().to_radians(), bbox.south().to_radians());
            let west_half = LatLonAltBox::new(north, south, bbox.east().to_radians(), -PI);
            let east_half = LatLonAltBox::new(north, south, PI, bbox.west().to_radians());

            let mut seen = HashSet::new();
            let mut entries: Vec<&Entry<T>> = self
                .entries(&west_half, zoom)
                .into_iter()
                .chain(self.entries(&east_half, zoom))
                .filter(|entry| seen.insert(Arc::as_ptr(&entry.item)))
                .collect();
            entries.sort_by(|a, b| a.order(b));
            return entries.into_iter().map(|entry| Arc::clone(&entry.item)).collect();
        }

        let mut entries = self.entries(bbox, zoom);
        entries.sort_by(|a, b| a.order(b));
        entries.into_iter().map(|entry| Arc::clone(&entry.item)).collect()
    }

    fn entries(&self, bbox: &LatLonAltBox, zoom: i32) -> Vec<&Entry<T>> {
        let zoom = zoom.clamp(0, MAX_TILE_LEVEL);
        let range = TileScheme::default().tile_range(bbox, zoom);
        let pyramid = TileCoordsPyramid::new(0, zoom).with_bottom_level_coords(range);

        let mut entries = Vec::new();
        for (level, coords) in pyramid.levels() {
            let (min, max) = (coords.min(), coords.max());
            for (tile, bucket) in self.buckets_in_range(level, coords) {
                // Items in inner tiles lie inside of the box for sure.
                let border =
                    tile.x == min.x || tile.x == max.x || tile.y == min.y || tile.y == max.y;
                entries.extend(bucket.iter().filter(|entry| {
                    entry.item.min_zoom_level() <= zoom
                        && entry.item.visible()
                        && (!border || entry.item.lat_lon_alt_box().intersects(bbox))
                }));
            }
        }
        entries
    }

    /// Occupied buckets of the level within the inclusive tile range. Large ranges are
    /// matched against the occupied buckets instead of being walked tile by tile.
    fn buckets_in_range(
        &self,
        level: i32,
        coords: Rect<i32>,
    ) -> Vec<(&TileId, &Vec<Entry<T>>)> {
        let (min, max) = (coords.min(), coords.max());
        let tiles = (i64::from(coords.width()) + 1) * (i64::from(coords.height()) + 1);

        if tiles > self.buckets.len() as i64 {
            return self
                .buckets
                .iter()
                .filter(|(tile, _)| {
                    tile.zoom == level
                        && (min.x..=max.x).contains(&tile.x)
                        && (min.y..=max.y).contains(&tile.y)
                })
                .collect();
        }

        (min.y..=max.y)
            .flat_map(|y| (min.x..=max.x).map(move |x| TileId::new(0, level, x, y)))
            .filter_map(|tile| self.buckets.get_key_value(&tile))
            .collect()
    }
}

/// Deepest tile, starting at the item's minimal zoom level, holding both corners of its box.
fn bucket_tile<T: GraphicsItem + ?Sized>(item: &T) -> TileId {
    let bbox = item.lat_lon_alt_box();
    let (north_west, south_east) = (bbox.north_west(), bbox.south_east());

    let mut level = item.min_zoom_level().clamp(0, MAX_TILE_LEVEL);
    loop {
        let tile = TileId::from_coordinates(&north_west, level);
        if level == 0 || tile == TileId::from_coordinates(&south_east, level) {
            return tile;
        }
        level -= 1;
    }
}
