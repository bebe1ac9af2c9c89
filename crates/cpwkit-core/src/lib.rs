//! # CPWKit Core
//!
//! Core types, traits, and utilities for CPWKit.
//! Provides the geometry kernel used by every waveguide primitive, the error
//! taxonomy, physical layout units, and the contracts of the collaborators
//! that receive finished geometry.

pub mod error;
pub mod fillet;
pub mod geometry;
pub mod region;
pub mod sink;
pub mod units;

pub use error::{Error, LayoutError, LayoutResult, PathError, PathResult, Result};
pub use fillet::{fillet_outline, DEFAULT_POINTS_PER_TURN};
pub use geometry::{
    angle_difference, displacement_and_heading, headings_match, normalize_angle, rotate_point,
    Bounds, Point, EPSILON,
};
pub use region::{Layer, Region};
pub use sink::{BooleanOp, BooleanProvider, CommandSink, LayoutSink};
pub use units::{LayoutUnits, LengthUnit};
