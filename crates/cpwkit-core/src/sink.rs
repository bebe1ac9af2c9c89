//! Collaborator contracts
//!
//! The path builder never performs I/O. It hands finished geometry to one of
//! these narrow interfaces, implemented in `cpwkit-layout`.

use crate::error::{LayoutResult, PathResult};
use crate::region::{Layer, Region};
use crate::units::LayoutUnits;
use std::fmt;
use std::path::Path;

/// Accepts closed regions tagged with a layer and persists them on request.
pub trait LayoutSink {
    /// Adds one region on `layer`.
    fn add_region(&mut self, region: Region, layer: Layer) -> LayoutResult<()>;

    /// Serializes everything accumulated so far to `file_name`.
    fn finalize(&mut self, file_name: &Path, units: &LayoutUnits) -> LayoutResult<()>;
}

/// Accepts an ordered stream of textual drafting commands. Write-only.
pub trait CommandSink {
    /// Appends one command block. Multi-line blocks are allowed; the sink
    /// terminates the block with a newline.
    fn push_command(&mut self, command: &str);
}

/// Combination predicate for [`BooleanProvider::boolean`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// Area covered by either operand.
    Union,
    /// Subject area not covered by the clip.
    Subtract,
    /// Area covered by both operands.
    Intersect,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Union => write!(f, "union"),
            Self::Subtract => write!(f, "subtract"),
            Self::Intersect => write!(f, "intersect"),
        }
    }
}

/// Polygon boolean engine.
pub trait BooleanProvider: fmt::Debug {
    /// Combines `subject` with `clip` and returns the resulting regions.
    ///
    /// Fails with a geometry error when an operand has zero area.
    fn boolean(&self, subject: &[Region], clip: &[Region], op: BooleanOp)
        -> PathResult<Vec<Region>>;
}

impl<S: LayoutSink + ?Sized> LayoutSink for &mut S {
    fn add_region(&mut self, region: Region, layer: Layer) -> LayoutResult<()> {
        (**self).add_region(region, layer)
    }

    fn finalize(&mut self, file_name: &Path, units: &LayoutUnits) -> LayoutResult<()> {
        (**self).finalize(file_name, units)
    }
}

impl CommandSink for String {
    fn push_command(&mut self, command: &str) {
        self.push_str(command);
        if !command.ends_with('\n') {
            self.push('\n');
        }
    }
}

impl CommandSink for Vec<String> {
    fn push_command(&mut self, command: &str) {
        self.push(command.to_string());
    }
}
