// Integration tests for drafting-script files

use cpwkit_core::{CommandSink, Point};
use cpwkit_layout::{DraftingScript, LayerStyle, ScriptSettings};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_saved_script_matches_contents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chip.scr");

    let mut script = DraftingScript::with_settings(
        &path,
        ScriptSettings {
            timestamp: false,
            ..Default::default()
        },
    );
    script.add_layer(&LayerStyle::new("Frame", [250, 50, 50]));
    script.add_rect(Point::new(0.0, 0.0), 10000.0, 10000.0);
    script.add_layer(&LayerStyle::new("CPW", [50, 250, 50]));
    script.push_command("PLINE\n0.000000,2.000000\n100.000000,2.000000\nc");
    script.convert_poly_to_region("CPW");
    script.subtract_layers("CPW", "Frame");
    script.export_dxf();
    script.save().unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, script.contents());
    assert!(written.starts_with("(setvar \"CmdEcho\" 0)\n-osnap\n\n-LAYER\nMAKE\nFrame\n"));
    assert!(written.contains("PLINE\n0.000000,2.000000\n100.000000,2.000000\nc\n"));
    assert!(written.contains(
        "SUBTRACT\n(ssget \"_X\" '((8 . \"Frame\")))\n\n(ssget \"_X\" '((8 . \"CPW\")))\n\n"
    ));
}

#[test]
fn test_custom_dxf_version() {
    let mut script = DraftingScript::with_settings(
        "mask.scr",
        ScriptSettings {
            dxf_version: "2013".to_string(),
            timestamp: false,
            ..Default::default()
        },
    );
    script.export_dxf();
    assert!(script.contents().ends_with("DXFOUT\nmask\nV\n2013\n\n"));
}
