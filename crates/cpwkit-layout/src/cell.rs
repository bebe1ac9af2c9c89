//! In-memory layout cell
//!
//! Accumulates layer-tagged regions handed over by finished paths and
//! persists them on [`LayoutSink::finalize`]. The output format follows the
//! file extension: `.dxf` (R2000 drawing) or `.json` (serde dump).

use crate::dxf_export::DxfExporter;
use cpwkit_core::{Bounds, Layer, LayoutError, LayoutResult, LayoutSink, LayoutUnits, Point, Region};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One region placed on a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellElement {
    pub layer: Layer,
    pub region: Region,
}

/// A named collection of layer-tagged regions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    name: String,
    elements: Vec<CellElement>,
    #[serde(default)]
    layer_names: Vec<(Layer, String)>,
}

/// Serialized form written by the JSON backend.
#[derive(Debug, Serialize, Deserialize)]
struct CellFile {
    unit: f64,
    precision: f64,
    cell: Cell,
}

impl Cell {
    /// Creates an empty cell.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
            layer_names: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of regions in the cell.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All placed regions, in insertion order.
    pub fn elements(&self) -> &[CellElement] {
        &self.elements
    }

    /// Places a region on a layer.
    pub fn push(&mut self, region: Region, layer: Layer) {
        self.elements.push(CellElement { layer, region });
    }

    /// Adds an axis-aligned rectangle (chip or feature boundary).
    pub fn add_rectangle(&mut self, a: Point, b: Point, layer: Layer) {
        self.push(Region::rectangle(a, b), layer);
    }

    /// Assigns a display name to a layer; later calls replace earlier ones.
    pub fn name_layer(&mut self, layer: Layer, name: impl Into<String>) {
        let name = name.into();
        match self.layer_names.iter_mut().find(|(l, _)| *l == layer) {
            Some(entry) => entry.1 = name,
            None => self.layer_names.push((layer, name)),
        }
    }

    /// Display name of a layer, defaulting to `L<n>D<d>`.
    pub fn layer_name(&self, layer: Layer) -> String {
        self.layer_names
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, n)| n.clone())
            .unwrap_or_else(|| layer.to_string())
    }

    /// Distinct layers in use, sorted.
    pub fn layers(&self) -> Vec<Layer> {
        let mut layers: Vec<Layer> = self.elements.iter().map(|e| e.layer).collect();
        layers.sort();
        layers.dedup();
        layers
    }

    /// Regions placed on `layer`.
    pub fn regions_on(&self, layer: Layer) -> impl Iterator<Item = &Region> {
        self.elements
            .iter()
            .filter(move |e| e.layer == layer)
            .map(|e| &e.region)
    }

    /// Bounding box of every region.
    pub fn bounds(&self) -> Option<Bounds> {
        self.elements
            .iter()
            .filter_map(|e| e.region.bounds())
            .reduce(Bounds::union)
    }

    fn write_json(&self, path: &Path, units: &LayoutUnits) -> LayoutResult<()> {
        let grid = units.grid();
        let snapped = Cell {
            name: self.name.clone(),
            elements: self
                .elements
                .iter()
                .map(|e| CellElement {
                    layer: e.layer,
                    region: e.region.snapped(grid),
                })
                .collect(),
            layer_names: self.layer_names.clone(),
        };
        let file = CellFile {
            unit: units.unit,
            precision: units.precision,
            cell: snapped,
        };
        let content = serde_json::to_string_pretty(&file)?;
        fs::write(path, content)?;
        info!("Wrote {} regions of cell '{}' to {}", self.len(), self.name, path.display());
        Ok(())
    }
}

impl LayoutSink for Cell {
    fn add_region(&mut self, region: Region, layer: Layer) -> LayoutResult<()> {
        debug!("cell '{}': region with {} vertices on {}", self.name, region.len(), layer);
        self.push(region, layer);
        Ok(())
    }

    fn finalize(&mut self, file_name: &Path, units: &LayoutUnits) -> LayoutResult<()> {
        units.validate()?;
        if self.elements.is_empty() {
            return Err(LayoutError::Empty(format!("cell '{}'", self.name)));
        }

        let ext = file_name
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "dxf" => DxfExporter::new(*units).write(self, file_name),
            "json" => self.write_json(file_name, units),
            other => Err(LayoutError::UnsupportedFormat(format!(
                "'{}' (expected .dxf or .json)",
                other
            ))),
        }
    }
}

/// Reads back a cell written by the JSON backend, with its units.
pub fn load_json(path: &Path) -> LayoutResult<(Cell, LayoutUnits)> {
    let content = fs::read_to_string(path)?;
    let file: CellFile = serde_json::from_str(&content)?;
    Ok((file.cell, LayoutUnits::new(file.unit, file.precision)))
}
