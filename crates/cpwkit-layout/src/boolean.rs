//! Polygon booleans backed by `csgrs` sketches.

use cpwkit_core::{BooleanOp, BooleanProvider, PathError, PathResult, Point, Region};
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use tracing::debug;

/// Regions with less area than this are treated as degenerate.
pub const DEFAULT_MIN_AREA: f64 = 1e-12;

/// [`BooleanProvider`] built on `csgrs::sketch::Sketch`.
#[derive(Debug, Clone, Copy)]
pub struct SketchBoolean {
    /// Smallest operand area accepted.
    pub min_area: f64,
}

impl Default for SketchBoolean {
    fn default() -> Self {
        Self {
            min_area: DEFAULT_MIN_AREA,
        }
    }
}

impl SketchBoolean {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_operands(&self, regions: &[Region], role: &str) -> PathResult<()> {
        for (i, region) in regions.iter().enumerate() {
            if region.is_degenerate(self.min_area) {
                return Err(PathError::geometry(format!(
                    "{} region {} has zero area",
                    role, i
                )));
            }
        }
        Ok(())
    }
}

fn ring_to_sketch(ring: &[Point]) -> Sketch<()> {
    let pts: Vec<[f64; 2]> = ring.iter().map(|p| p.to_array()).collect();
    Sketch::polygon(&pts, None)
}

/// Merges a set of regions into one sketch, cutting out holes.
pub fn regions_to_sketch(regions: &[Region]) -> Sketch<()> {
    let mut merged = Sketch::new();
    for region in regions {
        let mut s = ring_to_sketch(&region.outline);
        for hole in &region.holes {
            s = s.difference(&ring_to_sketch(hole));
        }
        merged = merged.union(&s);
    }
    merged
}

/// Converts a sketch back into regions, dropping repeated vertices.
pub fn sketch_to_regions(sketch: &Sketch<()>) -> Vec<Region> {
    let mp = sketch.to_multipolygon();
    let mut regions = Vec::new();
    for poly in mp.0 {
        let outline = dedup_ring(poly.exterior().0.iter().map(|c| Point::new(c.x, c.y)));
        if outline.len() < 3 {
            continue;
        }
        let holes: Vec<Vec<Point>> = poly
            .interiors()
            .iter()
            .map(|ring| dedup_ring(ring.0.iter().map(|c| Point::new(c.x, c.y))))
            .filter(|ring| ring.len() >= 3)
            .collect();
        regions.push(Region::with_holes(outline, holes));
    }
    regions
}

fn dedup_ring(points: impl Iterator<Item = Point>) -> Vec<Point> {
    let mut ring: Vec<Point> = Vec::new();
    for p in points {
        if ring.last().is_some_and(|last| last.approx_eq(p, 1e-9)) {
            continue;
        }
        ring.push(p);
    }
    if ring.len() > 1 && ring[0].approx_eq(ring[ring.len() - 1], 1e-9) {
        ring.pop();
    }
    ring
}

impl BooleanProvider for SketchBoolean {
    fn boolean(
        &self,
        subject: &[Region],
        clip: &[Region],
        op: BooleanOp,
    ) -> PathResult<Vec<Region>> {
        self.check_operands(subject, "subject")?;
        self.check_operands(clip, "clip")?;

        let a = regions_to_sketch(subject);
        let b = regions_to_sketch(clip);
        let result = match op {
            BooleanOp::Union => a.union(&b),
            BooleanOp::Subtract => a.difference(&b),
            BooleanOp::Intersect => a.intersection(&b),
        };

        let regions = sketch_to_regions(&result);
        debug!(
            "boolean {}: {} + {} operands -> {} regions",
            op,
            subject.len(),
            clip.len(),
            regions.len()
        );
        Ok(regions)
    }
}

/// Subtracts `subtract_this` from `from` (positive mask generation).
pub fn mask(
    provider: &dyn BooleanProvider,
    subtract_this: &[Region],
    from: &[Region],
) -> PathResult<Vec<Region>> {
    provider.boolean(from, subtract_this, BooleanOp::Subtract)
}

/// Union of two region sets.
pub fn union(provider: &dyn BooleanProvider, one: &[Region], two: &[Region]) -> PathResult<Vec<Region>> {
    provider.boolean(one, two, BooleanOp::Union)
}
