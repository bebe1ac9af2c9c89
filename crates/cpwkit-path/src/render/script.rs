//! Drafting-command backend feeding a [`CommandSink`].
//!
//! Straight pieces become closed `PLINE`s. Constant-section bends are drawn
//! as `ARC` edges joined by radial `LINE`s; the `ARC` command only sweeps
//! counter-clockwise, so right turns pass their end point first. Tapered
//! bends fall back to tessellated polylines.

use super::Renderer;
use crate::cursor::Pose;
use crate::segment::{arc_center, arc_point, PathSegment};
use cpwkit_core::{CommandSink, Layer, Point, Result};
use cpwkit_layout::format_point;
use std::f64::consts::TAU;
use std::fmt::Write;
use tracing::{debug, warn};

/// Command that joins touching entities into polylines.
pub const JOIN_ALL: &str = "PEDIT\nM\nALL\n\n\nJ\n\n\n";

/// Renders segments as drafting commands.
#[derive(Debug, Clone)]
pub struct ScriptRenderer {
    /// Layer made current before the path is drawn.
    pub layer_name: Option<String>,
    /// Join the pieces of every arc bend into polylines.
    pub join_bends: bool,
}

impl Default for ScriptRenderer {
    fn default() -> Self {
        Self {
            layer_name: None,
            join_bends: true,
        }
    }
}

impl ScriptRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws on the named layer.
    pub fn on_layer(mut self, name: impl Into<String>) -> Self {
        self.layer_name = Some(name.into());
        self
    }

    fn polyline(ring: &[Point]) -> String {
        let mut cmd = String::from("PLINE\n");
        for p in ring {
            let _ = writeln!(cmd, "{}", format_point(*p));
        }
        cmd.push('c');
        cmd
    }

    fn polylines(&self, segment: &PathSegment, sink: &mut dyn CommandSink) {
        for region in segment.outlines() {
            if region.is_degenerate(1e-12) {
                warn!(
                    "Dropping degenerate {} outline at {}",
                    segment.kind(),
                    segment.start()
                );
                continue;
            }
            sink.push_command(&Self::polyline(&region.outline));
            for hole in &region.holes {
                sink.push_command(&Self::polyline(hole));
            }
        }
    }

    fn arcs(&self, start: &Pose, radius: f64, sweep: f64, width: f64, gap: f64, sink: &mut dyn CommandSink) {
        let center = start.to_world(arc_center(radius, sweep));
        let world = |offset: f64, t: f64| start.to_world(arc_point(radius, sweep, offset, t));

        for side in [1.0, -1.0] {
            let inner = side * width / 2.0;
            let outer = side * (width / 2.0 + gap);
            for offset in [inner, outer] {
                let (a, b) = (world(offset, 0.0), world(offset, 1.0));
                let (from, to) = if sweep > 0.0 { (a, b) } else { (b, a) };
                sink.push_command(&format!(
                    "ARC\nC\n{}\n{}\n{}",
                    format_point(center),
                    format_point(from),
                    format_point(to)
                ));
            }
            for t in [0.0, 1.0] {
                sink.push_command(&format!(
                    "LINE\n{}\n{}\n\n",
                    format_point(world(inner, t)),
                    format_point(world(outer, t))
                ));
            }
        }
        if self.join_bends {
            sink.push_command(JOIN_ALL);
        }
    }
}

impl Renderer for ScriptRenderer {
    type Sink = dyn CommandSink;

    fn begin(&self, _layer: Layer, sink: &mut Self::Sink) -> Result<()> {
        if let Some(name) = &self.layer_name {
            sink.push_command(&format!("-LAYER\nSET\n{}\n\n", name));
        }
        Ok(())
    }

    fn render(&self, segment: &PathSegment, _layer: Layer, sink: &mut Self::Sink) -> Result<()> {
        debug!("{} at {}", segment.kind(), segment.start());
        match segment {
            PathSegment::Arc {
                start,
                radius,
                sweep,
                from,
                to,
                ..
            } if from == to && sweep.abs() < TAU - 1e-9 => {
                self.arcs(start, *radius, *sweep, from.width, from.gap, sink);
            }
            _ => self.polylines(segment, sink),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CrossSection;
    use std::f64::consts::PI;

    fn arc(sweep: f64, to: CrossSection) -> PathSegment {
        PathSegment::Arc {
            start: Pose::new(Point::zero(), 0.0),
            radius: 50.0,
            sweep,
            from: CrossSection { width: 10.0, gap: 6.0 },
            to,
            points: 8,
        }
    }

    #[test]
    fn test_straight_is_two_closed_polylines() {
        let seg = PathSegment::Straight {
            start: Pose::new(Point::zero(), 0.0),
            length: 100.0,
            section: CrossSection { width: 4.0, gap: 4.0 },
        };
        let mut out: Vec<String> = Vec::new();
        ScriptRenderer::new().render(&seg, Layer::default(), &mut out).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0],
            "PLINE\n0.000000,-2.000000\n100.000000,-2.000000\n100.000000,-6.000000\n0.000000,-6.000000\nc"
        );
    }

    #[test]
    fn test_left_arc_runs_start_to_end() {
        let mut out: Vec<String> = Vec::new();
        let seg = arc(PI / 2.0, CrossSection { width: 10.0, gap: 6.0 });
        ScriptRenderer::new().render(&seg, Layer::default(), &mut out).unwrap();
        // 2 sides x (2 arcs + 2 lines) + join
        assert_eq!(out.len(), 9);
        // Left edge of a left turn: radius 45 about (0, 50)
        assert_eq!(out[0], "ARC\nC\n0.000000,50.000000\n0.000000,5.000000\n45.000000,50.000000");
        assert_eq!(out[8], JOIN_ALL);
    }

    #[test]
    fn test_right_arc_swaps_endpoints() {
        let mut out: Vec<String> = Vec::new();
        let seg = arc(-PI / 2.0, CrossSection { width: 10.0, gap: 6.0 });
        ScriptRenderer::new().render(&seg, Layer::default(), &mut out).unwrap();
        // Left edge of a right turn: radius 55 about (0, -50), drawn end first
        assert_eq!(out[0], "ARC\nC\n0.000000,-50.000000\n55.000000,-50.000000\n0.000000,5.000000");
    }

    #[test]
    fn test_tapered_arc_falls_back_to_polylines() {
        let mut out: Vec<String> = Vec::new();
        let seg = arc(PI / 2.0, CrossSection { width: 20.0, gap: 10.0 });
        ScriptRenderer::new().render(&seg, Layer::default(), &mut out).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.starts_with("PLINE\n") && c.ends_with("\nc")));
    }

    #[test]
    fn test_begin_sets_layer() {
        let mut out = String::new();
        ScriptRenderer::new()
            .on_layer("CPW")
            .begin(Layer::default(), &mut out)
            .unwrap();
        assert_eq!(out, "-LAYER\nSET\nCPW\n\n");
    }
}
