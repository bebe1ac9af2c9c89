//! # CPWKit Layout
//!
//! Collaborators that receive finished waveguide geometry: an in-memory
//! [`Cell`] persisted as DXF or JSON, a [`DraftingScript`] command stream,
//! and the `csgrs`-backed [`SketchBoolean`] polygon engine.

pub mod boolean;
pub mod cell;
pub mod dxf_export;
pub mod script;

pub use boolean::{mask, regions_to_sketch, sketch_to_regions, union, SketchBoolean, DEFAULT_MIN_AREA};
pub use cell::{load_json, Cell, CellElement};
pub use dxf_export::DxfExporter;
pub use script::{format_point, DraftingScript, LayerStyle, ScriptSettings, APPLICATION_EXE, SCRIPT_EXTENSION};
