//! Projecting line strings and rings into screen polygons.
//!
//! A line is cut into pieces wherever it goes behind the globe, and, on maps repeating
//! sideways, wherever it jumps from one edge of the map to the other. Cut-offs at the
//! horizon get an extra point on it, so that the pieces reach the globe's outline.

use geo_types::Coord;

use crate::coordinates::Coordinates;
use crate::line_string::{LineString, LinearRing, level_for_resolution};
use crate::position::{Pixels, ScreenPolygon};
use crate::projection::{MapProjection as _, repeat_offsets};
use crate::viewport::ViewportParams;

/// Pixels between tessellation nodes.
const TESSELLATION_PRECISION: f64 = 10.0;

/// Upper bound of nodes inserted into a single segment.
const MAX_TESSELLATION_NODES: f64 = 200.0;

/// Steps of the search for the horizon between a visible and a hidden point.
const HORIZON_BISECTIONS: usize = 16;

pub(crate) fn line_string_polygons(
    viewport: &ViewportParams,
    line_string: &LineString,
) -> Vec<ScreenPolygon> {
    Splitter::new(viewport).run(line_string, false)
}

pub(crate) fn linear_ring_polygons(
    viewport: &ViewportParams,
    ring: &LinearRing,
) -> Vec<ScreenPolygon> {
    Splitter::new(viewport).run(ring.line_string(), true)
}

struct Splitter<'a> {
    viewport: &'a ViewportParams,
    finished: Vec<Vec<Coord>>,
    current: Vec<Coord>,
}

impl<'a> Splitter<'a> {
    fn new(viewport: &'a ViewportParams) -> Self {
        Self {
            viewport,
            finished: Vec::new(),
            current: Vec::new(),
        }
    }

    fn run(mut self, line: &LineString, closed: bool) -> Vec<ScreenPolygon> {
        let level = level_for_resolution(self.viewport.angular_resolution());
        let mut vertices: Vec<Coordinates> = line.vertices_at_level(level).copied().collect();
        if closed && let Some(first) = vertices.first().copied() {
            vertices.push(first);
        }
        if vertices.len() < 2 {
            return Vec::new();
        }

        let path = self.path(&vertices, line.tessellate());
        let starts_visible = path.first().is_some_and(|(_, pixels)| pixels.is_some());
        let ends_visible = path.last().is_some_and(|(_, pixels)| pixels.is_some());

        for pair in path.windows(2) {
            let [(from, from_pixels), (to, to_pixels)] = pair else {
                continue;
            };
            self.step(from, *from_pixels, to, *to_pixels);
        }
        self.finish();

        let mut polygons = std::mem::take(&mut self.finished);

        // A ring starts at an arbitrary vertex, so a piece running through it was cut in two.
        if closed && starts_visible && ends_visible && polygons.len() > 1 {
            let first = polygons.remove(0);
            if let Some(last) = polygons.last_mut() {
                last.extend(first.into_iter().skip(1));
            }
        }
        polygons.retain(|polygon| polygon.len() >= 2);
        if closed {
            for polygon in &mut polygons {
                if let (Some(first), Some(last)) = (polygon.first().copied(), polygon.last())
                    && first != *last
                {
                    polygon.push(first);
                }
            }
        }

        self.repeated(polygons)
    }

    /// Vertices with the tessellation nodes in between, each with its projection.
    fn path(
        &self,
        vertices: &[Coordinates],
        tessellate: bool,
    ) -> Vec<(Coordinates, Option<Pixels>)> {
        let project = |c: Coordinates| (c, self.screen_point(&c));
        let mut path = Vec::with_capacity(vertices.len());
        path.extend(vertices.first().copied().map(project));

        for pair in vertices.windows(2) {
            let [from, to] = pair else {
                continue;
            };
            if tessellate {
                let pixels = from.angular_distance(to).to_radians() * self.viewport.radius();
                let steps = (pixels / TESSELLATION_PRECISION)
                    .ceil()
                    .clamp(1.0, MAX_TESSELLATION_NODES) as usize;
                path.extend(
                    (1..steps).map(|i| project(from.interpolate(to, i as f64 / steps as f64))),
                );
            }
            path.push(project(*to));
        }
        path
    }

    fn screen_point(&self, coordinates: &Coordinates) -> Option<Pixels> {
        self.viewport
            .current_projection()
            .screen_point(coordinates, self.viewport)
    }

    fn step(
        &mut self,
        from: &Coordinates,
        from_pixels: Option<Pixels>,
        to: &Coordinates,
        to_pixels: Option<Pixels>,
    ) {
        match (from_pixels, to_pixels) {
            (Some(from_pixels), Some(to_pixels)) => {
                if self.current.is_empty() {
                    self.current.push(from_pixels.0);
                }
                let jump = to_pixels.x() - from_pixels.x();
                let projection = self.viewport.current_projection();
                if projection.repeatable_x() && jump.abs() > 2.0 * self.viewport.radius() {
                    // Carry on into the neighbouring copy, and start over in this one.
                    let period = 4.0 * self.viewport.radius() * jump.signum();
                    self.current.push(Coord {
                        x: to_pixels.x() - period,
                        y: to_pixels.y(),
                    });
                    self.finish();
                    self.current.push(Coord {
                        x: from_pixels.x() + period,
                        y: from_pixels.y(),
                    });
                }
                self.current.push(to_pixels.0);
            }
            (Some(from_pixels), None) => {
                if self.current.is_empty() {
                    self.current.push(from_pixels.0);
                }
                if let Some(horizon) = self.horizon(from, to) {
                    self.current.push(horizon.0);
                }
                self.finish();
            }
            (None, Some(to_pixels)) => {
                self.finish();
                if let Some(horizon) = self.horizon(to, from) {
                    self.current.push(horizon.0);
                }
                self.current.push(to_pixels.0);
            }
            (None, None) => {}
        }
    }

    /// Last visible point on the great circle from `visible` towards `hidden`. Projections
    /// without a horizon have no such point.
    fn horizon(&self, visible: &Coordinates, hidden: &Coordinates) -> Option<Pixels> {
        if !self.viewport.current_projection().clipping_radius().is_finite() {
            return None;
        }

        let (mut low, mut high) = (0.0, 1.0);
        let mut best = self.screen_point(visible);
        for _ in 0..HORIZON_BISECTIONS {
            let middle = 0.5 * (low + high);
            match self.screen_point(&visible.interpolate(hidden, middle)) {
                Some(pixels) => {
                    best = Some(pixels);
                    low = middle;
                }
                None => high = middle,
            }
        }
        best
    }

    fn finish(&mut self) {
        if !self.current.is_empty() {
            self.finished.push(std::mem::take(&mut self.current));
        }
    }

    /// Copies of the polygons for every repetition of the map they show up in.
    fn repeated(&self, polygons: Vec<Vec<Coord>>) -> Vec<ScreenPolygon> {
        if !self.viewport.current_projection().repeatable_x() {
            return polygons.into_iter().map(ScreenPolygon::new).collect();
        }

        let mut copies = Vec::new();
        for polygon in polygons {
            let (x_min, x_max) = polygon
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), c| {
                    (min.min(c.x), max.max(c.x))
                });
            for offset in repeat_offsets(x_min, x_max, self.viewport) {
                copies.push(ScreenPolygon::new(
                    polygon
                        .iter()
                        .map(|c| Coord { x: c.x + offset, y: c.y })
                        .collect(),
                ));
            }
        }
        copies
    }
}
