//! Declarative path recipes.
//!
//! A recipe file names a layout cell, optional chip boundary and ground
//! plane, and one [`PathRecipe`] per waveguide. Each recipe is replayed
//! against a [`WaveguidePath`] with either renderer.

use crate::config::{read_document, Backend, Config, ConfigError, ConfigResult};
use anyhow::{bail, Context};
use cpwkit_core::{Layer, LayoutSink, PathResult, Point, Region};
use cpwkit_layout::{Cell, DraftingScript, LayerStyle};
use cpwkit_path::{
    AngleSpec, CrossSection, FilletSide, LaunchPad, MeanderReport, PathSet, Renderer,
    ScriptRenderer, StartDirection, TurnToken, WaveguidePath,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One primitive of a recipe, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Straight {
        length: f64,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        gap: Option<f64>,
    },
    StraightTo {
        end: Point,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        gap: Option<f64>,
    },
    TaperTo {
        end: Point,
        width: f64,
        gap: f64,
    },
    OpenGap {
        length: f64,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        gap: Option<f64>,
    },
    OpenGapFillet {
        length: f64,
        side: FilletSide,
        radius: f64,
        #[serde(default)]
        direction: Option<StartDirection>,
    },
    Bend {
        radius: f64,
        angle: AngleSpec,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        gap: Option<f64>,
        #[serde(default)]
        points: Option<usize>,
    },
    Meander {
        total: f64,
        radius: f64,
        straight: f64,
        #[serde(default)]
        phase: f64,
        #[serde(default)]
        points: Option<usize>,
    },
    MeanderWithTurn {
        total: f64,
        radius: f64,
        straight: f64,
        turn: TurnToken,
        #[serde(default)]
        points: Option<usize>,
    },
}

impl Operation {
    /// Emits this operation onto `path`. Meanders return their report.
    pub fn apply<R: Renderer>(
        &self,
        path: &mut WaveguidePath<R>,
        bend_points: usize,
    ) -> PathResult<Option<MeanderReport>> {
        match *self {
            Self::Straight { length, width, gap } => path.straight(length, width, gap)?,
            Self::StraightTo { end, width, gap } => path.straight_to(end, width, gap)?,
            Self::TaperTo { end, width, gap } => path.taper_to(end, width, gap)?,
            Self::OpenGap { length, width, gap } => path.open_gap(length, width, gap)?,
            Self::OpenGapFillet {
                length,
                side,
                radius,
                direction,
            } => path.open_gap_fillet(length, side, radius, direction)?,
            Self::Bend {
                radius,
                angle,
                width,
                gap,
                points,
            } => path.bend(radius, angle, width, gap, points.unwrap_or(bend_points))?,
            Self::Meander {
                total,
                radius,
                straight,
                phase,
                points,
            } => {
                let report =
                    path.meander(total, radius, straight, phase, points.unwrap_or(bend_points))?;
                return Ok(Some(report));
            }
            Self::MeanderWithTurn {
                total,
                radius,
                straight,
                turn,
                points,
            } => {
                let report = path.meander_with_turn(
                    total,
                    radius,
                    straight,
                    turn,
                    points.unwrap_or(bend_points),
                )?;
                return Ok(Some(report));
            }
        }
        Ok(None)
    }
}

fn default_layer() -> Layer {
    Layer::new(1, 0)
}

/// Colour of named layers in drafting scripts.
fn default_color() -> [u8; 3] {
    [255, 255, 255]
}

/// One waveguide: cross-section, layer, start pose and operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecipe {
    pub name: String,
    pub width: f64,
    pub gap: f64,
    #[serde(default = "default_layer")]
    pub layer: Layer,
    /// Layer name used by scripts and DXF output.
    #[serde(default)]
    pub layer_name: Option<String>,
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    pub start: Point,
    #[serde(default)]
    pub direction: StartDirection,
    /// Pads placed at both ends of the path.
    #[serde(default)]
    pub launch_pad: Option<LaunchPad>,
    #[serde(default)]
    pub ops: Vec<Operation>,
}

impl PathRecipe {
    pub fn section(&self) -> PathResult<CrossSection> {
        CrossSection::new(self.width, self.gap)
    }

    /// Name of the recipe's layer in written output.
    pub fn layer_label(&self) -> String {
        self.layer_name
            .clone()
            .unwrap_or_else(|| self.layer.to_string())
    }

    /// Starts `path` and replays every operation, closing with a pad when
    /// one is configured. The path is left live.
    pub fn build<R: Renderer>(
        &self,
        path: &mut WaveguidePath<R>,
        bend_points: usize,
    ) -> PathResult<Vec<MeanderReport>> {
        match &self.launch_pad {
            Some(pad) => pad.begin(path, self.start, self.direction)?,
            None => path.start(self.start, self.direction)?,
        }
        let mut reports = Vec::new();
        for op in &self.ops {
            if let Some(report) = op.apply(path, bend_points)? {
                reports.push(report);
            }
        }
        if let Some(pad) = &self.launch_pad {
            pad.end(path)?;
        }
        debug!(
            "Recipe '{}' built: {} segments, length {:.3}",
            self.name,
            path.segments().len(),
            path.length()
        );
        Ok(reports)
    }

    /// Unstarted path on the region backend.
    pub fn polygon_path(&self, config: &Config) -> PathResult<WaveguidePath> {
        Ok(WaveguidePath::polygon(self.section()?, self.layer)
            .with_fillet_points(config.render.fillet_points))
    }

    /// Unstarted path on the script backend, drawing on the recipe's layer.
    pub fn script_path(&self, config: &Config) -> PathResult<WaveguidePath<ScriptRenderer>> {
        let renderer = ScriptRenderer::new().on_layer(self.layer_label());
        Ok(WaveguidePath::script(self.section()?, renderer)
            .with_fillet_points(config.render.fillet_points))
    }
}

/// Axis-aligned rectangle on a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub min: Point,
    pub max: Point,
    #[serde(default = "default_layer")]
    pub layer: Layer,
    #[serde(default)]
    pub layer_name: Option<String>,
}

impl Frame {
    pub fn region(&self) -> Region {
        Region::rectangle(self.min, self.max)
    }

    fn label(&self) -> String {
        self.layer_name
            .clone()
            .unwrap_or_else(|| self.layer.to_string())
    }
}

fn default_cell() -> String {
    "TOP".to_string()
}

/// A recipe document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeFile {
    #[serde(default = "default_cell")]
    pub cell: String,
    /// Chip outline drawn as a plain rectangle.
    #[serde(default)]
    pub boundary: Option<Frame>,
    /// Metal plane the paths are etched from, written as the masked result.
    #[serde(default)]
    pub ground_plane: Option<Frame>,
    #[serde(default)]
    pub paths: Vec<PathRecipe>,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub backend: Backend,
    pub paths: usize,
    pub total_length: f64,
    pub meanders: Vec<MeanderReport>,
}

impl RecipeFile {
    /// Load a recipe document from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let file: Self = read_document(path)?;
        file.validate()?;
        Ok(file)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.paths.is_empty() {
            return Err(ConfigError::invalid("paths", "at least one path is required"));
        }
        for (index, recipe) in self.paths.iter().enumerate() {
            if recipe.name.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("paths[{}].name", index),
                    "must not be empty",
                ));
            }
        }
        Ok(())
    }

    /// Builds every path and writes the result to `output`. The backend
    /// follows the output extension, or the configured one when there is
    /// no extension.
    pub fn run(&self, config: &Config, output: &Path) -> anyhow::Result<RunSummary> {
        let (backend, output) = match output.extension().and_then(|e| e.to_str()) {
            Some(ext) => match Backend::for_extension(ext) {
                Some(backend) => (backend, output.to_path_buf()),
                None => bail!("Unsupported output format: .{}", ext),
            },
            None => {
                let backend = config.render.backend;
                (backend, output.with_extension(backend.default_extension()))
            }
        };
        info!("Rendering {} paths with the {} backend", self.paths.len(), backend);

        let (total_length, meanders) = match backend {
            Backend::Polygon => self.write_layout(config, &output)?,
            Backend::Script => self.write_script(config, &output)?,
        };
        Ok(RunSummary {
            output,
            backend,
            paths: self.paths.len(),
            total_length,
            meanders,
        })
    }

    fn build_all<R: Renderer>(
        &self,
        blank: impl Fn(&PathRecipe) -> PathResult<WaveguidePath<R>>,
        config: &Config,
    ) -> anyhow::Result<(PathSet<R>, Vec<MeanderReport>)> {
        let mut set = PathSet::new();
        let mut meanders = Vec::new();
        for recipe in &self.paths {
            let mut path = blank(recipe)
                .with_context(|| format!("Invalid cross-section for path '{}'", recipe.name))?;
            let reports = recipe
                .build(&mut path, config.render.bend_points)
                .with_context(|| format!("Failed to build path '{}'", recipe.name))?;
            meanders.extend(reports);
            set.push(path);
        }
        Ok((set, meanders))
    }

    fn write_layout(&self, config: &Config, output: &Path) -> anyhow::Result<(f64, Vec<MeanderReport>)> {
        let (mut set, meanders) = self.build_all(|r| r.polygon_path(config), config)?;

        let mut cell = Cell::new(self.cell.clone());
        for recipe in &self.paths {
            if let Some(name) = &recipe.layer_name {
                cell.name_layer(recipe.layer, name.clone());
            }
        }
        if let Some(frame) = &self.boundary {
            if let Some(name) = &frame.layer_name {
                cell.name_layer(frame.layer, name.clone());
            }
            cell.push(frame.region(), frame.layer);
        }
        if let Some(frame) = &self.ground_plane {
            if let Some(name) = &frame.layer_name {
                cell.name_layer(frame.layer, name.clone());
            }
            let mut metal = vec![frame.region()];
            for path in set.iter() {
                metal = path.use_as_mask(Some(metal.as_slice()))?;
            }
            for region in metal {
                cell.push(region, frame.layer);
            }
        }

        let rendered = set.end_all(&mut cell)?;
        debug!("{} paths rendered into cell '{}'", rendered, self.cell);
        cell.finalize(output, &config.units)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        Ok((set.total_length(), meanders))
    }

    fn write_script(&self, config: &Config, output: &Path) -> anyhow::Result<(f64, Vec<MeanderReport>)> {
        let (mut set, meanders) = self.build_all(|r| r.script_path(config), config)?;

        let mut script = DraftingScript::with_settings(output, config.script.clone());
        let mut declared: Vec<String> = Vec::new();
        let mut declare = |script: &mut DraftingScript, name: String, color: [u8; 3]| {
            if !declared.contains(&name) {
                script.add_layer(&LayerStyle::new(name.clone(), color));
                declared.push(name);
            }
        };
        for recipe in &self.paths {
            declare(&mut script, recipe.layer_label(), recipe.color);
        }
        if let Some(frame) = &self.boundary {
            declare(&mut script, frame.label(), default_color());
            script.set_layer(&frame.label());
            let size = frame.max - frame.min;
            script.add_rect(frame.min, size.x, size.y);
        }

        set.end_all(&mut script)?;

        if let Some(frame) = &self.ground_plane {
            declare(&mut script, frame.label(), default_color());
            script.set_layer(&frame.label());
            let size = frame.max - frame.min;
            script.add_rect(frame.min, size.x, size.y);
            script.convert_poly_to_region(&frame.label());
            for recipe in &self.paths {
                script.convert_poly_to_region(&recipe.layer_label());
                script.subtract_layers(&recipe.layer_label(), &frame.label());
            }
            script.convert_region_to_poly(&frame.label());
        }
        if config.render.export_dxf {
            script.export_dxf();
        }
        script
            .save()
            .with_context(|| format!("Failed to write {}", script.file_name().display()))?;
        Ok((set.total_length(), meanders))
    }
}
