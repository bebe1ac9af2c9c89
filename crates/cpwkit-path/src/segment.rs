//! Immutable path segments and their outlines.
//!
//! Every segment carries a copy of the pose and cross-section it was emitted
//! with, so its outline can be rebuilt without looking at its neighbours.
//! Outlines are the etched regions: the two gaps either side of the centre
//! conductor, or the full opening for an open end.

use crate::cursor::{CrossSection, Pose};
use cpwkit_core::{Point, Region};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::f64::consts::TAU;

/// Minimum number of points along a tessellated arc edge.
pub const MIN_BEND_POINTS: usize = 2;

/// Default arc tessellation density.
pub const DEFAULT_BEND_POINTS: usize = 100;

/// Which end of an open gap receives the rounded corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilletSide {
    /// The trace starts after the gap; the gap's leading edge is rounded.
    Begin,
    /// The trace ends before the gap; the gap's trailing edge is rounded.
    End,
}

/// Outlines produced by one segment. Most segments yield one or two.
pub type Outlines = SmallVec<[Region; 2]>;

/// One emitted primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Straight {
        start: Pose,
        length: f64,
        section: CrossSection,
    },
    Taper {
        start: Pose,
        length: f64,
        from: CrossSection,
        to: CrossSection,
    },
    OpenGap {
        start: Pose,
        length: f64,
        from: CrossSection,
        to: CrossSection,
    },
    Arc {
        start: Pose,
        radius: f64,
        /// Signed sweep in radians; positive turns left.
        sweep: f64,
        from: CrossSection,
        to: CrossSection,
        points: usize,
    },
    /// Open gap with rounded corners. The outline is resolved through the
    /// boolean provider when the segment is emitted.
    FilletedGap {
        start: Pose,
        length: f64,
        section: CrossSection,
        side: FilletSide,
        radius: f64,
        regions: Vec<Region>,
    },
}

impl PathSegment {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Straight { .. } => "straight",
            Self::Taper { .. } => "taper",
            Self::OpenGap { .. } => "open gap",
            Self::Arc { .. } => "bend",
            Self::FilletedGap { .. } => "filleted gap",
        }
    }

    pub fn start(&self) -> Pose {
        match self {
            Self::Straight { start, .. }
            | Self::Taper { start, .. }
            | Self::OpenGap { start, .. }
            | Self::Arc { start, .. }
            | Self::FilletedGap { start, .. } => *start,
        }
    }

    /// Pose of the cursor after this segment.
    pub fn end(&self) -> Pose {
        match self {
            Self::Straight { start, length, .. }
            | Self::Taper { start, length, .. }
            | Self::OpenGap { start, length, .. }
            | Self::FilletedGap { start, length, .. } => start.advanced(*length),
            Self::Arc {
                start,
                radius,
                sweep,
                ..
            } => Pose::new(
                start.to_world(arc_point(*radius, *sweep, 0.0, 1.0)),
                start.heading + sweep,
            ),
        }
    }

    /// Cross-section at the start of the segment.
    pub fn section_start(&self) -> CrossSection {
        match self {
            Self::Straight { section, .. } | Self::FilletedGap { section, .. } => *section,
            Self::Taper { from, .. } | Self::OpenGap { from, .. } | Self::Arc { from, .. } => *from,
        }
    }

    /// Cross-section the cursor carries after the segment.
    pub fn section_end(&self) -> CrossSection {
        match self {
            Self::Straight { section, .. } | Self::FilletedGap { section, .. } => *section,
            Self::Taper { to, .. } | Self::OpenGap { to, .. } | Self::Arc { to, .. } => *to,
        }
    }

    /// Centreline length.
    pub fn length(&self) -> f64 {
        match self {
            Self::Straight { length, .. }
            | Self::Taper { length, .. }
            | Self::OpenGap { length, .. }
            | Self::FilletedGap { length, .. } => *length,
            Self::Arc { radius, sweep, .. } => radius * sweep.abs(),
        }
    }

    /// Etched regions of this segment in world coordinates.
    pub fn outlines(&self) -> Outlines {
        match self {
            Self::Straight {
                start,
                length,
                section,
            } => side_quads(start, *length, section, section),
            Self::Taper {
                start,
                length,
                from,
                to,
            } => side_quads(start, *length, from, to),
            Self::OpenGap {
                start,
                length,
                from,
                to,
            } => {
                let h0 = from.total_extent() / 2.0;
                let h1 = to.total_extent() / 2.0;
                let local = [
                    Point::new(0.0, -h0),
                    Point::new(*length, -h1),
                    Point::new(*length, h1),
                    Point::new(0.0, h0),
                ];
                let mut out = Outlines::new();
                out.push(Region::new(local.iter().map(|p| start.to_world(*p)).collect()));
                out
            }
            Self::Arc {
                start,
                radius,
                sweep,
                from,
                to,
                points,
            } => {
                let mut out = Outlines::new();
                for side in [1.0, -1.0] {
                    out.push(arc_side(start, *radius, *sweep, from, to, side, *points));
                }
                out
            }
            Self::FilletedGap { regions, .. } => regions.iter().cloned().collect(),
        }
    }
}

/// Point on an arc in the local frame of its start pose.
///
/// `offset` is the lateral offset from the centreline (left positive) and
/// `t` the fraction of the sweep travelled.
pub fn arc_point(radius: f64, sweep: f64, offset: f64, t: f64) -> Point {
    let sign = sweep.signum();
    let rho = radius - sign * offset;
    let angle = sweep.abs() * t;
    Point::new(rho * angle.sin(), sign * (radius - rho * angle.cos()))
}

/// Centre of an arc in the local frame of its start pose.
pub fn arc_center(radius: f64, sweep: f64) -> Point {
    Point::new(0.0, sweep.signum() * radius)
}

/// Number of edge points for an arc, scaled with its share of a full turn.
pub fn arc_steps(sweep: f64, points: usize) -> usize {
    let points = points.max(MIN_BEND_POINTS);
    (((points - 1) as f64) * sweep.abs() / (TAU / 2.0)).ceil().max(1.0) as usize
}

fn side_quads(start: &Pose, length: f64, from: &CrossSection, to: &CrossSection) -> Outlines {
    let mut out = Outlines::new();
    for side in [-1.0, 1.0] {
        let local = [
            Point::new(0.0, side * from.width / 2.0),
            Point::new(length, side * to.width / 2.0),
            Point::new(length, side * to.half_extent()),
            Point::new(0.0, side * from.half_extent()),
        ];
        out.push(Region::new(local.iter().map(|p| start.to_world(*p)).collect()));
    }
    out
}

fn arc_side(
    start: &Pose,
    radius: f64,
    sweep: f64,
    from: &CrossSection,
    to: &CrossSection,
    side: f64,
    points: usize,
) -> Region {
    let steps = arc_steps(sweep, points);
    let mut inner = Vec::with_capacity(steps + 1);
    let mut outer = Vec::with_capacity(steps + 1);
    for k in 0..=steps {
        let t = k as f64 / steps as f64;
        let width = from.width + (to.width - from.width) * t;
        let gap = from.gap + (to.gap - from.gap) * t;
        inner.push(start.to_world(arc_point(radius, sweep, side * width / 2.0, t)));
        outer.push(start.to_world(arc_point(radius, sweep, side * (width / 2.0 + gap), t)));
    }
    outer.reverse();
    inner.extend(outer);
    Region::new(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn cs(width: f64, gap: f64) -> CrossSection {
        CrossSection { width, gap }
    }

    #[test]
    fn test_straight_outlines_are_two_gaps() {
        let seg = PathSegment::Straight {
            start: Pose::new(Point::zero(), 0.0),
            length: 100.0,
            section: cs(10.0, 6.0),
        };
        let out = seg.outlines();
        assert_eq!(out.len(), 2);
        for region in &out {
            assert!((region.area() - 600.0).abs() < 1e-9);
        }
        assert!(seg.end().position.approx_eq(Point::new(100.0, 0.0), 1e-12));
    }

    #[test]
    fn test_open_gap_covers_full_extent() {
        let seg = PathSegment::OpenGap {
            start: Pose::new(Point::zero(), PI / 2.0),
            length: 20.0,
            from: cs(10.0, 6.0),
            to: cs(10.0, 6.0),
        };
        let out = seg.outlines();
        assert_eq!(out.len(), 1);
        assert!((out[0].area() - 20.0 * 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_arc_end_pose_left_and_right() {
        let left = PathSegment::Arc {
            start: Pose::new(Point::new(100.0, 0.0), 0.0),
            radius: 50.0,
            sweep: PI,
            from: cs(10.0, 6.0),
            to: cs(10.0, 6.0),
            points: DEFAULT_BEND_POINTS,
        };
        let end = left.end();
        assert!(end.position.approx_eq(Point::new(100.0, 100.0), 1e-9));
        assert!((end.heading.abs() - PI).abs() < 1e-12);

        let right = PathSegment::Arc {
            start: Pose::new(Point::zero(), 0.0),
            radius: 50.0,
            sweep: -PI / 2.0,
            from: cs(10.0, 6.0),
            to: cs(10.0, 6.0),
            points: DEFAULT_BEND_POINTS,
        };
        let end = right.end();
        assert!(end.position.approx_eq(Point::new(50.0, -50.0), 1e-9));
        assert!((end.heading + PI / 2.0).abs() < 1e-12);
        assert!((right.length() - 25.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_arc_side_area_matches_annulus() {
        let seg = PathSegment::Arc {
            start: Pose::new(Point::zero(), 0.0),
            radius: 50.0,
            sweep: PI,
            from: cs(10.0, 6.0),
            to: cs(10.0, 6.0),
            points: 2000,
        };
        // Half annulus between radii 55 and 61 (outer side of a left turn)
        let expected = PI / 2.0 * (61.0_f64.powi(2) - 55.0_f64.powi(2));
        let areas: Vec<f64> = seg.outlines().iter().map(Region::area).collect();
        assert!(areas.iter().any(|a| (a - expected).abs() / expected < 1e-3));
    }

    #[test]
    fn test_arc_steps_never_below_one() {
        assert_eq!(arc_steps(1e-6, 100), 1);
        assert_eq!(arc_steps(PI, 0), 1);
        assert_eq!(arc_steps(PI, 101), 100);
    }
}
