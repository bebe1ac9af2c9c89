//! Corner rounding for closed outlines.

use crate::geometry::{angle_difference, Point};
use std::f64::consts::{PI, TAU};

/// Default tessellation density for fillet arcs (points per full turn).
pub const DEFAULT_POINTS_PER_TURN: usize = 128;

/// Rounds every corner of a closed outline with arcs of `radius`.
///
/// At each vertex the radius is reduced when the tangent points would run
/// past the midpoint of an adjacent edge, so short edges never overlap.
/// Collinear and zero-length corners are kept as they are.
pub fn fillet_outline(outline: &[Point], radius: f64, points_per_turn: usize) -> Vec<Point> {
    let n = outline.len();
    if n < 3 || radius <= 0.0 {
        return outline.to_vec();
    }

    let mut out = Vec::with_capacity(n * 8);
    for i in 0..n {
        let p = outline[i];
        let prev = outline[(i + n - 1) % n];
        let next = outline[(i + 1) % n];

        let to_prev = prev - p;
        let to_next = next - p;
        let len_prev = to_prev.hypot();
        let len_next = to_next.hypot();
        if len_prev < 1e-12 || len_next < 1e-12 {
            out.push(p);
            continue;
        }
        let u = to_prev * (1.0 / len_prev);
        let v = to_next * (1.0 / len_next);

        let cos_alpha = (u.x * v.x + u.y * v.y).clamp(-1.0, 1.0);
        let alpha = cos_alpha.acos();
        if alpha < 1e-9 || PI - alpha < 1e-9 {
            out.push(p);
            continue;
        }

        let half = alpha / 2.0;
        let max_tangent = len_prev.min(len_next) / 2.0;
        let mut tangent = radius / half.tan();
        let mut r = radius;
        if tangent > max_tangent {
            tangent = max_tangent;
            r = tangent * half.tan();
        }

        let start = p + u * tangent;
        let end = p + v * tangent;
        let bisector = u + v;
        let center = p + bisector * (r / half.sin() / bisector.hypot());

        let a0 = (start.y - center.y).atan2(start.x - center.x);
        let a1 = (end.y - center.y).atan2(end.x - center.x);
        let sweep = angle_difference(a1, a0);
        let steps = ((points_per_turn as f64) * sweep.abs() / TAU).ceil().max(1.0) as usize;

        for k in 0..=steps {
            let a = a0 + sweep * (k as f64) / (steps as f64);
            out.push(center.polar(r, a));
        }
    }
    out
}
