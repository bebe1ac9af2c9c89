//! Closed regions and layer tags
//!
//! A [`Region`] is the unit of geometry exchanged with layout collaborators:
//! one closed outline plus optional holes. Regions are immutable snapshots;
//! transforming one produces a new value.

use crate::geometry::{rotate_point, Bounds, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layer/datatype pair identifying where a region lands in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Layer {
    /// Layer number.
    pub number: u16,
    /// Datatype within the layer (0-255).
    #[serde(default)]
    pub datatype: u8,
}

impl Layer {
    /// Creates a layer.
    pub const fn new(number: u16, datatype: u8) -> Self {
        Self { number, datatype }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}D{}", self.number, self.datatype)
    }
}

/// Closed polygonal region.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    /// Outer boundary, implicitly closed (first point is not repeated).
    pub outline: Vec<Point>,
    /// Inner boundaries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Vec<Point>>,
}

impl Region {
    /// Creates a region from an outline. A trailing point equal to the first
    /// one is dropped.
    pub fn new(mut outline: Vec<Point>) -> Self {
        if outline.len() > 1 {
            if let (Some(first), Some(last)) = (outline.first(), outline.last()) {
                if first.approx_eq(*last, 1e-12) {
                    outline.pop();
                }
            }
        }
        Self {
            outline,
            holes: Vec::new(),
        }
    }

    /// Creates a region with holes.
    pub fn with_holes(outline: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        let mut region = Self::new(outline);
        region.holes = holes;
        region
    }

    /// Axis-aligned rectangle spanning two corners.
    pub fn rectangle(a: Point, b: Point) -> Self {
        Self::new(vec![
            Point::new(a.x, a.y),
            Point::new(b.x, a.y),
            Point::new(b.x, b.y),
            Point::new(a.x, b.y),
        ])
    }

    /// Number of outline vertices.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Shoelace signed area of the outline (positive when counter-clockwise).
    pub fn signed_area(&self) -> f64 {
        ring_signed_area(&self.outline)
    }

    /// Enclosed area: outline minus holes.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| ring_signed_area(h).abs()).sum();
        self.signed_area().abs() - holes
    }

    /// Whether the region encloses (almost) nothing.
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        self.outline.len() < 3 || self.area() <= tolerance
    }

    /// Bounding box of the outline.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.outline)
    }

    /// Returns a copy rotated by `theta` about `pivot`.
    #[must_use]
    pub fn rotated(&self, theta: f64, pivot: Point) -> Self {
        self.map_points(|p| rotate_point(theta, p, pivot))
    }

    /// Returns a copy translated by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Point) -> Self {
        self.map_points(|p| p + offset)
    }

    /// Returns a copy with every coordinate rounded to a multiple of `grid`.
    #[must_use]
    pub fn snapped(&self, grid: f64) -> Self {
        if grid <= 0.0 {
            return self.clone();
        }
        self.map_points(|p| Point::new((p.x / grid).round() * grid, (p.y / grid).round() * grid))
    }

    /// Returns a copy whose outline winds counter-clockwise.
    #[must_use]
    pub fn oriented_ccw(&self) -> Self {
        let mut out = self.clone();
        if out.signed_area() < 0.0 {
            out.outline.reverse();
        }
        out
    }

    fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            outline: self.outline.iter().map(|p| f(*p)).collect(),
            holes: self
                .holes
                .iter()
                .map(|h| h.iter().map(|p| f(*p)).collect())
                .collect(),
        }
    }
}

fn ring_signed_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, p) in ring.iter().enumerate() {
        let q = ring[(i + 1) % ring.len()];
        sum += p.x * q.y - q.x * p.y;
    }
    sum / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_rectangle_area_and_orientation() {
        let r = Region::rectangle(Point::new(0.0, 0.0), Point::new(4.0, 2.0));
        assert_eq!(r.len(), 4);
        assert!((r.signed_area() - 8.0).abs() < 1e-12);

        let mut cw = r.clone();
        cw.outline.reverse();
        assert!(cw.signed_area() < 0.0);
        assert!(cw.oriented_ccw().signed_area() > 0.0);
    }

    #[test]
    fn test_closing_point_is_dropped() {
        let r = Region::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ]);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_holes_reduce_area() {
        let outer = Region::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let hole = Region::rectangle(Point::new(2.0, 2.0), Point::new(4.0, 4.0));
        let r = Region::with_holes(outer.outline, vec![hole.outline]);
        assert!((r.area() - 96.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_region() {
        let line = Region::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)]);
        assert!(line.is_degenerate(1e-12));
    }

    #[test]
    fn test_rotate_and_snap() {
        let r = Region::rectangle(Point::new(0.0, 0.0), Point::new(2.0, 1.0));
        let rotated = r.rotated(PI, Point::zero()).snapped(1e-3);
        assert!(rotated.outline[2].approx_eq(Point::new(-2.0, -1.0), 1e-9));
        assert!((rotated.area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_layer_display() {
        assert_eq!(Layer::new(5, 0).to_string(), "L5D0");
    }
}
