//! Rendering backends
//!
//! A [`Renderer`] turns emitted segments into output for one kind of sink.
//! The waveguide builder is generic over the renderer, so the geometry logic
//! exists once and the backend is chosen when the path is constructed.

pub mod polygon;
pub mod script;

pub use polygon::PolygonRenderer;
pub use script::ScriptRenderer;

use crate::segment::PathSegment;
use cpwkit_core::{Layer, Result};

/// Strategy that writes segments to a sink.
pub trait Renderer {
    /// Collaborator receiving the rendered output.
    type Sink: ?Sized;

    /// Called once before the first segment of a path is rendered.
    fn begin(&self, _layer: Layer, _sink: &mut Self::Sink) -> Result<()> {
        Ok(())
    }

    /// Renders one segment.
    fn render(&self, segment: &PathSegment, layer: Layer, sink: &mut Self::Sink) -> Result<()>;

    /// Called once after the last segment.
    fn finish(&self, _layer: Layer, _sink: &mut Self::Sink) -> Result<()> {
        Ok(())
    }
}
