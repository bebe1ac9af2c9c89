//! Geometry kernel
//!
//! Pure 2-D helpers shared by every primitive: points, rotation about a
//! pivot, and displacement/heading between two points. All angles are in
//! radians and all lengths share one linear unit (microns by convention).

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance used when comparing lengths and coordinates.
pub const EPSILON: f64 = 1e-9;

/// A point (or displacement) in the layout plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector pointing along `angle`.
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Point reached by walking `length` along `angle` from `self`.
    pub fn polar(self, length: f64, angle: f64) -> Self {
        self + Self::from_angle(angle) * length
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        (other - self).hypot()
    }

    /// Euclidean norm of the vector.
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Linear interpolation between `self` and `other`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }

    /// Whether both coordinates agree within `tolerance`.
    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    /// Converts to the `[x, y]` array layout used by polygon libraries.
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Rotates `point` by `theta` radians about `pivot`.
pub fn rotate_point(theta: f64, point: Point, pivot: Point) -> Point {
    let (sin, cos) = theta.sin_cos();
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Point::new(
        cos * dx - sin * dy + pivot.x,
        sin * dx + cos * dy + pivot.y,
    )
}

/// Distance from `start` to `end` and the heading of that displacement.
///
/// The heading covers the full `[-PI, PI)` range. Vertical displacements are
/// resolved explicitly to `+-PI/2`; a zero displacement has heading 0.
pub fn displacement_and_heading(start: Point, end: Point) -> (f64, f64) {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let distance = dx.hypot(dy);

    let heading = if dx == 0.0 && dy > 0.0 {
        PI / 2.0
    } else if dx == 0.0 && dy < 0.0 {
        -PI / 2.0
    } else if dx == 0.0 {
        0.0
    } else {
        normalize_angle(dy.atan2(dx))
    };

    (distance, heading)
}

/// Wraps an angle into `[-PI, PI)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU for inputs just below a multiple of it
    if wrapped >= PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Signed smallest difference `a - b`, wrapped into `[-PI, PI)`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    normalize_angle(a - b)
}

/// Whether two headings describe the same direction within `tolerance`.
pub fn headings_match(a: f64, b: f64, tolerance: f64) -> bool {
    angle_difference(a, b).abs() <= tolerance
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for an empty input.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.include(*p);
        }
        Some(bounds)
    }

    /// Grows the box to contain `point`.
    pub fn include(&mut self, point: Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Union of two boxes.
    pub fn union(self, other: Self) -> Self {
        let mut out = self;
        out.include(other.min);
        out.include(other.max);
        out
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_quarter_turn() {
        let p = rotate_point(PI / 2.0, Point::new(2.0, 1.0), Point::new(1.0, 1.0));
        assert!(p.approx_eq(Point::new(1.0, 2.0), 1e-12));
    }

    #[test]
    fn test_displacement_vertical_cases() {
        let (d, h) = displacement_and_heading(Point::new(3.0, 1.0), Point::new(3.0, 5.0));
        assert!((d - 4.0).abs() < 1e-12);
        assert!((h - PI / 2.0).abs() < 1e-12);

        let (_, h) = displacement_and_heading(Point::new(3.0, 1.0), Point::new(3.0, -5.0));
        assert!((h + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_displacement_left_half_plane() {
        let (d, h) = displacement_and_heading(Point::zero(), Point::new(-1.0, -1.0));
        assert!((d - 2f64.sqrt()).abs() < 1e-12);
        assert!((h + 3.0 * PI / 4.0).abs() < 1e-12);

        let (_, h) = displacement_and_heading(Point::zero(), Point::new(-1.0, 0.0));
        assert!((h + PI).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(PI) + PI).abs() < 1e-12);
        assert!(normalize_angle(-PI) < PI);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_headings_match_across_wrap() {
        assert!(headings_match(PI - 1e-12, -PI, 1e-9));
        assert!(!headings_match(0.0, PI, 1e-9));
    }

    #[test]
    fn test_bounds() {
        let pts = [Point::new(1.0, -2.0), Point::new(-3.0, 4.0), Point::new(0.0, 0.0)];
        let b = Bounds::from_points(&pts).unwrap();
        assert_eq!(b.min, Point::new(-3.0, -2.0));
        assert_eq!(b.max, Point::new(1.0, 4.0));
        assert_eq!(b.width(), 4.0);
        assert_eq!(b.height(), 6.0);
        assert!(Bounds::from_points(&Vec::<Point>::new()).is_none());
    }
}
