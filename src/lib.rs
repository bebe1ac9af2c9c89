//! # CPWKit
//!
//! Coplanar-waveguide path construction for superconducting-circuit
//! photomasks. A path is built from a start pose by chaining straights,
//! tapers, open gaps, bends and length-matched meanders, then rendered
//! either as closed layout regions or as a drafting-application script.
//!
//! ## Architecture
//!
//! 1. **cpwkit-core** - Geometry kernel, regions and layers, units, errors,
//!    sink and boolean traits
//! 2. **cpwkit-layout** - Layout cell with DXF/JSON output, drafting
//!    scripts, polygon booleans
//! 3. **cpwkit-path** - Cursor, primitives, meander solver, launch pads,
//!    renderers
//! 4. **cpwkit** - Configuration, path recipes and the command-line runner

pub mod config;
pub mod recipe;

pub use config::{Backend, Config, ConfigError, ConfigResult, RenderSettings};
pub use recipe::{Frame, Operation, PathRecipe, RecipeFile, RunSummary};

pub use cpwkit_core::{
    Error, Layer, LayoutError, LayoutUnits, LengthUnit, PathError, Point, Region, Result,
};
pub use cpwkit_layout::{Cell, DraftingScript, LayerStyle, ScriptSettings, SketchBoolean};
pub use cpwkit_path::{
    AngleSpec, CrossSection, FilletSide, LaunchPad, MeanderReport, PadClosing, PathSet,
    PolygonRenderer, ScriptRenderer, StartDirection, TurnToken, WaveguidePath,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Pretty console output to stderr, filtered by `RUST_LOG` with INFO as
/// the floor.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
