use cpwkit::{Backend, Config, Layer, RecipeFile};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn demo() -> RecipeFile {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/resonator.toml");
    RecipeFile::load_from_file(&path).unwrap()
}

#[test]
fn test_demo_to_dxf() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("resonator.dxf");

    let summary = demo().run(&Config::default(), &output).unwrap();
    assert_eq!(summary.backend, Backend::Polygon);
    assert_eq!(summary.paths, 2);
    assert_eq!(summary.meanders.len(), 1);
    assert!((summary.meanders[0].length - 4000.0).abs() < 1e-6);

    let drawing = dxf::Drawing::load_file(&output).unwrap();
    assert!(drawing.entities().count() > 10);
}

#[test]
fn test_demo_to_script() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("resonator.scr");
    let mut config = Config::default();
    config.script.timestamp = false;

    let summary = demo().run(&config, &output).unwrap();
    assert_eq!(summary.backend, Backend::Script);

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("(setvar \"CmdEcho\" 0)\n-osnap\n"));
    assert!(text.contains("-LAYER\nMAKE\nCPW\nCOLOR\nTRUECOLOR\n50,250,50\n"));
    assert!(text.contains("RECTANGLE\n"));
    assert!(text.contains("ARC\nC\n"));
    assert!(text.contains("DXFOUT\n"));
}

#[test]
fn test_output_without_extension_uses_configured_backend() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.render.backend = Backend::Script;
    config.render.export_dxf = false;

    let summary = demo().run(&config, &dir.path().join("chip")).unwrap();
    assert_eq!(summary.output, dir.path().join("chip.scr"));
    assert!(summary.output.exists());
}

#[test]
fn test_ground_plane_is_masked() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("masked.json");
    let json = r#"{
        "cell": "MASKED",
        "ground_plane": {
            "min": {"x": -100.0, "y": -100.0},
            "max": {"x": 300.0, "y": 100.0},
            "layer": {"number": 2, "datatype": 0}
        },
        "paths": [{
            "name": "line",
            "width": 10.0,
            "gap": 6.0,
            "layer": {"number": 5, "datatype": 0},
            "start": {"x": 0.0, "y": 0.0},
            "ops": [{"op": "straight", "length": 200.0}]
        }]
    }"#;
    let file: RecipeFile = serde_json::from_str(json).unwrap();
    file.run(&Config::default(), &output).unwrap();

    let (cell, _) = cpwkit_layout::load_json(&output).unwrap();
    let metal: f64 = cell.regions_on(Layer::new(2, 0)).map(|r| r.area()).sum();
    // 400 x 200 plane minus two 200 x 6 gaps
    assert!((metal - (80000.0 - 2400.0)).abs() < 1e-3);
    assert_eq!(cell.regions_on(Layer::new(5, 0)).count(), 2);
}

#[test]
fn test_unsupported_output_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = demo()
        .run(&Config::default(), &dir.path().join("chip.gds"))
        .unwrap_err();
    assert!(err.to_string().contains("Unsupported output format"));
}
