// Integration tests for cell persistence

use cpwkit_core::{Layer, LayoutError, LayoutSink, LayoutUnits, Point, Region};
use cpwkit_layout::{load_json, Cell};
use dxf::entities::EntityType;
use dxf::Drawing;
use tempfile::TempDir;

fn sample_cell() -> Cell {
    let mut cell = Cell::new("resonator");
    cell.name_layer(Layer::new(1, 0), "ChipBoundary");
    cell.add_rectangle(
        Point::new(0.0, 0.0),
        Point::new(10000.0, 5000.0),
        Layer::new(1, 0),
    );
    cell.add_region(
        Region::new(vec![
            Point::new(0.0, 2.0),
            Point::new(100.0000000004, 2.0),
            Point::new(100.0, 6.0),
            Point::new(0.0, 6.0),
        ]),
        Layer::new(5, 0),
    )
    .unwrap();
    cell
}

#[test]
fn test_json_round_trip_snaps_to_grid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("resonator.json");

    let mut cell = sample_cell();
    cell.finalize(&path, &LayoutUnits::default()).unwrap();

    let (loaded, units) = load_json(&path).unwrap();
    assert_eq!(units, LayoutUnits::default());
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.layer_name(Layer::new(1, 0)), "ChipBoundary");

    let cpw: Vec<_> = loaded.regions_on(Layer::new(5, 0)).collect();
    assert_eq!(cpw[0].outline[1], Point::new(100.0, 2.0));
}

#[test]
fn test_dxf_file_contains_closed_polylines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("resonator.dxf");

    let mut cell = sample_cell();
    cell.finalize(&path, &LayoutUnits::default()).unwrap();

    let drawing = Drawing::load_file(&path).unwrap();
    let polylines: Vec<_> = drawing
        .entities()
        .filter_map(|e| match &e.specific {
            EntityType::LwPolyline(p) => Some((e.common.layer.clone(), p.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(polylines.len(), 2);
    assert_eq!(polylines[0].0, "ChipBoundary");
    assert!(polylines.iter().all(|(_, p)| p.flags & 1 == 1));
}

#[test]
fn test_finalize_rejects_bad_units() {
    let dir = TempDir::new().unwrap();
    let mut cell = sample_cell();
    let err = cell
        .finalize(&dir.path().join("x.dxf"), &LayoutUnits::new(1e-6, 0.0))
        .unwrap_err();
    assert!(matches!(err, LayoutError::InvalidUnits(_)));
}
