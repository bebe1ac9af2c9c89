//! Launch pads: wide bond pads tapering into the working trace.

use crate::cursor::{CrossSection, StartDirection};
use crate::render::Renderer;
use crate::segment::FilletSide;
use crate::waveguide::WaveguidePath;
use cpwkit_core::{PathError, PathResult, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the outer end of the pad is closed off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum PadClosing {
    /// Square opening.
    Rectangular,
    /// Opening with rounded corners.
    Filleted { radius: f64 },
}

/// Pad geometry. The pad conductor is `pad_width` wide inside an opening of
/// `total_width`; the opening is closed by a gap as long as the pad's side
/// gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchPad {
    pub pad_width: f64,
    pub total_width: f64,
    pub pad_length: f64,
    pub ramp_length: f64,
    #[serde(default = "default_closing")]
    pub closing: PadClosing,
}

fn default_closing() -> PadClosing {
    PadClosing::Rectangular
}

impl LaunchPad {
    pub fn new(pad_width: f64, total_width: f64, pad_length: f64, ramp_length: f64) -> Self {
        Self {
            pad_width,
            total_width,
            pad_length,
            ramp_length,
            closing: PadClosing::Rectangular,
        }
    }

    pub fn with_closing(mut self, closing: PadClosing) -> Self {
        self.closing = closing;
        self
    }

    /// Side gap of the pad, `(total_width - pad_width) / 2`.
    pub fn pad_gap(&self) -> f64 {
        (self.total_width - self.pad_width) / 2.0
    }

    /// Cross-section along the pad.
    pub fn section(&self) -> PathResult<CrossSection> {
        if !(self.total_width > self.pad_width) {
            return Err(PathError::invalid_argument(
                "total width",
                format!(
                    "must exceed the pad width {}, got {}",
                    self.pad_width, self.total_width
                ),
            ));
        }
        for (name, value) in [("pad length", self.pad_length), ("ramp length", self.ramp_length)] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(PathError::invalid_argument(name, format!("must be >= 0, got {}", value)));
            }
        }
        CrossSection::new(self.pad_width, self.pad_gap())
    }

    fn close<R: Renderer>(&self, path: &mut WaveguidePath<R>, side: FilletSide) -> PathResult<()> {
        let gap = self.pad_gap();
        match self.closing {
            PadClosing::Rectangular => path.open_gap(gap, None, None),
            PadClosing::Filleted { radius } => path.open_gap_fillet(gap, side, radius, None),
        }
    }

    /// Starts `path` with a pad at `position` and ramps down to the path's
    /// own cross-section.
    pub fn begin<R: Renderer>(
        &self,
        path: &mut WaveguidePath<R>,
        position: Point,
        direction: impl Into<StartDirection>,
    ) -> PathResult<()> {
        let pad = self.section()?;
        let trace = path.default_section();
        debug!("launch pad begin at {}", position);

        let checkpoint = path.checkpoint();
        let result = self.emit_begin(path, position, direction.into(), pad, trace);
        if result.is_err() {
            path.rollback(checkpoint);
        }
        result
    }

    fn emit_begin<R: Renderer>(
        &self,
        path: &mut WaveguidePath<R>,
        position: Point,
        direction: StartDirection,
        pad: CrossSection,
        trace: CrossSection,
    ) -> PathResult<()> {
        path.start_with(position, direction, pad)?;
        self.close(path, FilletSide::Begin)?;
        path.straight(self.pad_length, None, None)?;
        path.straight(self.ramp_length, Some(trace.width), Some(trace.gap))
    }

    /// Ramps a live path up to the pad, runs the pad and closes it off.
    pub fn end<R: Renderer>(&self, path: &mut WaveguidePath<R>) -> PathResult<()> {
        let pad = self.section()?;
        path.live("launch pad end")?;
        debug!("launch pad end at {}", path.position()?);

        let checkpoint = path.checkpoint();
        let result = self.emit_end(path, pad);
        if result.is_err() {
            path.rollback(checkpoint);
        }
        result
    }

    fn emit_end<R: Renderer>(&self, path: &mut WaveguidePath<R>, pad: CrossSection) -> PathResult<()> {
        path.straight(self.ramp_length, Some(pad.width), Some(pad.gap))?;
        path.straight(self.pad_length, None, None)?;
        self.close(path, FilletSide::End)
    }
}
