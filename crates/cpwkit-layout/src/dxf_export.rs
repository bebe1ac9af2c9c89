//! DXF output for layout cells.
//!
//! Each region ring becomes a closed `LWPOLYLINE` on a layer named after the
//! region's layer tag (or the cell's display name for it).

use crate::cell::Cell;
use cpwkit_core::{LayoutError, LayoutResult, LayoutUnits, LengthUnit, Point};
use dxf::entities::{Entity, EntityType, LwPolyline};
use dxf::LwPolylineVertex;
use dxf::enums::{AcadVersion, Units};
use dxf::tables::Layer as DxfLayer;
use dxf::Drawing;
use std::path::Path;
use tracing::info;

/// Builds DXF drawings from cells.
#[derive(Debug, Clone, Copy)]
pub struct DxfExporter {
    units: LayoutUnits,
}

impl DxfExporter {
    pub fn new(units: LayoutUnits) -> Self {
        Self { units }
    }

    /// Converts a cell into an R2000 drawing with coordinates snapped to the
    /// precision grid.
    pub fn build(&self, cell: &Cell) -> Drawing {
        let mut drawing = Drawing::new();
        drawing.header.version = AcadVersion::R2000;
        drawing.header.default_drawing_units = match self.units.length_unit() {
            Some(LengthUnit::Nanometer) => Units::Nanometers,
            Some(LengthUnit::Micron) => Units::Microns,
            Some(LengthUnit::Millimeter) => Units::Millimeters,
            None => Units::Unitless,
        };

        for layer in cell.layers() {
            drawing.add_layer(DxfLayer {
                name: cell.layer_name(layer),
                ..Default::default()
            });
        }

        let grid = self.units.grid();
        for element in cell.elements() {
            let region = element.region.snapped(grid);
            let layer_name = cell.layer_name(element.layer);
            for ring in std::iter::once(&region.outline).chain(region.holes.iter()) {
                if ring.len() < 2 {
                    continue;
                }
                let mut entity = Entity::new(EntityType::LwPolyline(closed_polyline(ring)));
                entity.common.layer = layer_name.clone();
                drawing.add_entity(entity);
            }
        }
        drawing
    }

    /// Writes a cell to `path`.
    pub fn write(&self, cell: &Cell, path: &Path) -> LayoutResult<()> {
        let drawing = self.build(cell);
        drawing
            .save_file(path)
            .map_err(|e| LayoutError::Dxf(e.to_string()))?;
        info!(
            "Wrote {} regions of cell '{}' to {}",
            cell.len(),
            cell.name(),
            path.display()
        );
        Ok(())
    }
}

fn closed_polyline(ring: &[Point]) -> LwPolyline {
    let mut poly = LwPolyline::default();
    poly.vertices = ring
        .iter()
        .map(|p| LwPolylineVertex {
            x: p.x,
            y: p.y,
            ..Default::default()
        })
        .collect();
    // Bit 0 (value 1) marks the polyline closed
    poly.flags |= 1;
    poly
}
