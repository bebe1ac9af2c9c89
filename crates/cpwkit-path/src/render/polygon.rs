//! Closed-region backend feeding a [`LayoutSink`].

use super::Renderer;
use crate::segment::PathSegment;
use cpwkit_core::{Layer, LayoutSink, Result};
use tracing::{debug, warn};

/// Renders each segment's etched outlines as closed regions.
#[derive(Debug, Clone, Copy)]
pub struct PolygonRenderer {
    /// Outlines with less area than this are dropped.
    pub min_area: f64,
}

impl Default for PolygonRenderer {
    fn default() -> Self {
        Self { min_area: 1e-12 }
    }
}

impl PolygonRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for PolygonRenderer {
    type Sink = dyn LayoutSink;

    fn render(&self, segment: &PathSegment, layer: Layer, sink: &mut Self::Sink) -> Result<()> {
        let outlines = segment.outlines();
        debug!("{}: {} outlines on {}", segment.kind(), outlines.len(), layer);
        for region in outlines {
            if region.is_degenerate(self.min_area) {
                warn!(
                    "Dropping degenerate {} outline at {}",
                    segment.kind(),
                    segment.start()
                );
                continue;
            }
            sink.add_region(region, layer)?;
        }
        Ok(())
    }
}
