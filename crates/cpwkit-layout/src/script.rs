//! Drafting-script command stream
//!
//! [`DraftingScript`] collects the textual commands that a drafting
//! application replays from a `.scr` file. Waveguide geometry arrives through
//! [`CommandSink::push_command`]; the remaining methods write the
//! housekeeping commands around it (layers, frames, region conversion,
//! DXF export).

use chrono::Local;
use cpwkit_core::{CommandSink, LayoutResult, Point};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Script file extension.
pub const SCRIPT_EXTENSION: &str = "scr";

/// Name of the drafting application executable inside its install folder.
pub const APPLICATION_EXE: &str = "acad.exe";

/// Formats a point the way the drafting command line expects it.
pub fn format_point(p: Point) -> String {
    format!("{:.6},{:.6}", p.x, p.y)
}

/// RGB colour of a named drafting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub name: String,
    pub color: [u8; 3],
}

impl LayerStyle {
    pub fn new(name: impl Into<String>, color: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::new("NameMe", [255, 255, 255])
    }
}

/// Script output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    /// Commands written before anything else.
    pub preamble: String,
    /// Version token passed to `DXFOUT`.
    pub dxf_version: String,
    /// Write a `;` comment with the generation time after the preamble.
    pub timestamp: bool,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            preamble: "(setvar \"CmdEcho\" 0)\n-osnap\n\n".to_string(),
            dxf_version: "LT2000".to_string(),
            timestamp: true,
        }
    }
}

/// An in-memory drafting script bound to the file it will be saved as.
#[derive(Debug, Clone)]
pub struct DraftingScript {
    file_name: PathBuf,
    settings: ScriptSettings,
    body: String,
    commands: usize,
}

impl DraftingScript {
    /// Creates a script with the default preamble.
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        Self::with_settings(file_name, ScriptSettings::default())
    }

    pub fn with_settings(file_name: impl Into<PathBuf>, settings: ScriptSettings) -> Self {
        let mut file_name = file_name.into();
        if file_name.extension().is_none() {
            file_name.set_extension(SCRIPT_EXTENSION);
        }
        let mut body = settings.preamble.clone();
        if settings.timestamp {
            body.push_str(&format!(
                "; generated {}\n",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            ));
        }
        Self {
            file_name,
            settings,
            body,
            commands: 0,
        }
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Script text accumulated so far.
    pub fn contents(&self) -> &str {
        &self.body
    }

    /// Number of command blocks written after the preamble.
    pub fn command_count(&self) -> usize {
        self.commands
    }

    fn write(&mut self, text: &str) {
        self.body.push_str(text);
        self.commands += 1;
    }

    /// Creates a layer with a true colour; it becomes the current layer.
    pub fn add_layer(&mut self, style: &LayerStyle) {
        let [r, g, b] = style.color;
        self.write(&format!(
            "-LAYER\nMAKE\n{}\nCOLOR\nTRUECOLOR\n{},{},{}\n\n\n",
            style.name, r, g, b
        ));
    }

    /// Makes an existing layer current.
    pub fn set_layer(&mut self, name: &str) {
        self.write(&format!("-LAYER\nSET\n{}\n\n", name));
    }

    /// Axis-aligned rectangle from `base` to `base + (x_len, y_len)`.
    pub fn add_rect(&mut self, base: Point, x_len: f64, y_len: f64) {
        self.write(&format!(
            "RECTANGLE\n{}\n{}\n",
            format_point(base),
            format_point(base + Point::new(x_len, y_len))
        ));
    }

    pub fn add_circle(&mut self, center: Point, radius: f64) {
        self.write(&format!("CIRCLE\n{}\n{:.6}\n", format_point(center), radius));
    }

    /// Circle repeated `repeat = [columns, rows]` times with the given
    /// `spacing = [row, column]` offsets.
    pub fn add_circle_array(&mut self, center: Point, radius: f64, spacing: [f64; 2], repeat: [u32; 2]) {
        let mut text = format!("CIRCLE\n{}\n{:.6}\n", format_point(center), radius);
        text.push_str("ARRAY\nLAST\n\n\n");
        text.push_str(&format!("{}\n{}\n", repeat[0], repeat[1]));
        // A single row or column takes only one spacing value
        if repeat[0] == 1 {
            text.push_str(&format!("{:.6}\n", spacing[1]));
        } else if repeat[1] == 1 {
            text.push_str(&format!("{:.6}\n", spacing[0]));
        } else {
            text.push_str(&format!("{:.6}\n{:.6}\n", spacing[0], spacing[1]));
        }
        self.write(&text);
    }

    /// Selects every object on a layer.
    pub fn select_all_on_layer(&mut self, layer: &str) {
        self.write(&format!("{}\n", layer_selection(layer)));
    }

    /// Converts the closed polylines on a layer into regions.
    pub fn convert_poly_to_region(&mut self, layer: &str) {
        self.write(&format!(
            "(if (setq ss {}) (command \"_.region\" ss \"\"))\n",
            layer_selection(layer)
        ));
    }

    /// Explodes the regions on a layer and rejoins the pieces into polylines.
    pub fn convert_region_to_poly(&mut self, layer: &str) {
        let selection = layer_selection(layer);
        let mut text = String::new();
        for _ in 0..3 {
            text.push_str(&format!("EXPLODE\n{}\n\n\n", selection));
        }
        text.push_str(&format!("PEDIT\nM\n{}\n\nY\nJ\nJ\nE\n\n\n", selection));
        self.write(&text);
    }

    /// Subtracts the regions on `remove` from those on `keep`.
    pub fn subtract_layers(&mut self, remove: &str, keep: &str) {
        self.write(&format!(
            "SUBTRACT\n{}\n\n{}\n\n",
            layer_selection(keep),
            layer_selection(remove)
        ));
    }

    /// Joins every touching segment in the drawing into polylines.
    pub fn join_all(&mut self) {
        self.write("PEDIT\nM\nALL\n\n\nJ\n\n\n");
    }

    /// Exports the drawing to a DXF file named after the script.
    pub fn export_dxf(&mut self) {
        let name = self.dxf_name();
        let version = self.settings.dxf_version.clone();
        self.write(&format!("ZOOM\nALL\nDXFOUT\n{}\nV\n{}\n\n", name, version));
    }

    fn dxf_name(&self) -> String {
        self.file_name.with_extension("").to_string_lossy().into_owned()
    }

    /// Writes the script to its file.
    pub fn save(&self) -> LayoutResult<()> {
        fs::write(&self.file_name, &self.body)?;
        info!(
            "Saved drafting script with {} commands to {}",
            self.commands,
            self.file_name.display()
        );
        Ok(())
    }

    /// Command that replays the saved script in batch mode. The caller
    /// decides whether and how to spawn it.
    pub fn launch_command(&self, application_dir: &Path) -> Command {
        let script = if self.file_name.is_absolute() {
            self.file_name.clone()
        } else {
            std::env::current_dir()
                .map(|dir| dir.join(&self.file_name))
                .unwrap_or_else(|_| self.file_name.clone())
        };
        let mut command = Command::new(application_dir.join(APPLICATION_EXE));
        command.arg("/b").arg(script);
        command
    }
}

fn layer_selection(layer: &str) -> String {
    format!("(ssget \"_X\" '((8 . \"{}\")))", layer)
}

impl CommandSink for DraftingScript {
    fn push_command(&mut self, command: &str) {
        debug!("script command: {}", command.lines().next().unwrap_or_default());
        self.body.push_str(command);
        if !command.ends_with('\n') {
            self.body.push('\n');
        }
        self.commands += 1;
    }
}
