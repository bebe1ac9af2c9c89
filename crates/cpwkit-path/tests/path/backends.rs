// Both renderers driven by the same primitive sequence

use cpwkit_core::{Layer, LayoutSink, LayoutUnits, Point};
use cpwkit_layout::{Cell, DraftingScript, LayerStyle, ScriptSettings};
use cpwkit_path::{
    AngleSpec, CrossSection, LaunchPad, Renderer, ScriptRenderer, StartDirection, TurnToken,
    WaveguidePath,
};
use std::fs;
use tempfile::TempDir;

fn build<R: Renderer>(path: &mut WaveguidePath<R>) {
    let pad = LaunchPad::new(150.0, 300.0, 200.0, 200.0);
    pad.begin(path, Point::new(3000.0, 200.0), StartDirection::PlusY)
        .unwrap();
    path.bend(100.0, -45.0, None, None, 50).unwrap();
    path.straight(200.0, None, None).unwrap();
    path.bend(100.0, 45.0, None, None, 50).unwrap();
    path.meander_with_turn(2000.0, 60.0, 300.0, TurnToken::HalfLeft, 50)
        .unwrap();
    path.bend(100.0, AngleSpec::QuarterLeft, None, None, 50).unwrap();
    pad.end(path).unwrap();
}

#[test]
fn test_polygon_backend_writes_dxf() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("device.dxf");

    let mut path = WaveguidePath::polygon(CrossSection::new(4.0, 4.0).unwrap(), Layer::new(5, 0));
    build(&mut path);
    let expected_regions: usize = path.segments().iter().map(|s| s.outlines().len()).sum();

    let mut cell = Cell::new("device");
    cell.add_rectangle(Point::zero(), Point::new(10000.0, 10000.0), Layer::new(1, 0));
    path.end(&mut cell).unwrap();
    assert_eq!(cell.regions_on(Layer::new(5, 0)).count(), expected_regions);

    cell.finalize(&file, &LayoutUnits::default()).unwrap();
    assert!(fs::metadata(&file).unwrap().len() > 0);
}

#[test]
fn test_script_backend_writes_commands() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("device.scr");

    let mut script = DraftingScript::with_settings(
        &file,
        ScriptSettings {
            timestamp: false,
            ..Default::default()
        },
    );
    script.add_layer(&LayerStyle::new("CPW", [50, 250, 50]));

    let mut path = WaveguidePath::script(
        CrossSection::new(4.0, 4.0).unwrap(),
        ScriptRenderer::new().on_layer("CPW"),
    );
    build(&mut path);
    let segments = path.segments().len();
    path.end(&mut script).unwrap();
    script.export_dxf();
    script.save().unwrap();

    let text = fs::read_to_string(&file).unwrap();
    assert!(text.contains("-LAYER\nSET\nCPW\n\n"));
    assert!(text.contains("ARC\nC\n"));
    assert!(text.contains("PLINE\n"));
    assert!(text.trim_end().ends_with("LT2000"));
    assert!(script.command_count() > segments);
}
