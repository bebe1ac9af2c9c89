//! # CPWKit Path
//!
//! Cursor-based construction of coplanar-waveguide traces.
//!
//! A [`WaveguidePath`] tracks position, heading and cross-section, and
//! appends immutable [`PathSegment`]s for straight runs, tapers, open gaps,
//! filleted open gaps and circular bends. Meanders of an exact target length
//! and launch pads are composed from those primitives. Output is produced by
//! a [`Renderer`] chosen when the path is built: closed regions for a layout
//! sink, or drafting commands for a script.

pub mod angle;
pub mod cursor;
pub mod launch_pad;
pub mod meander;
pub mod path_set;
pub mod render;
pub mod segment;
pub mod waveguide;

pub use angle::{AngleSpec, TurnSense, TurnToken};
pub use cursor::{CrossSection, Cursor, Pose, StartDirection};
pub use launch_pad::{LaunchPad, PadClosing};
pub use meander::{initial_bend, MeanderEnding, MeanderReport};
pub use path_set::PathSet;
pub use render::{PolygonRenderer, Renderer, ScriptRenderer};
pub use segment::{FilletSide, PathSegment, DEFAULT_BEND_POINTS, MIN_BEND_POINTS};
pub use waveguide::{PathState, WaveguidePath};
