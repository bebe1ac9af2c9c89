use cpwkit::{AngleSpec, FilletSide, Operation, PadClosing, RecipeFile, StartDirection, TurnToken};
use std::path::Path;

fn demo() -> RecipeFile {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/resonator.toml");
    RecipeFile::load_from_file(&path).unwrap()
}

#[test]
fn test_demo_recipe_parses() {
    let file = demo();
    assert_eq!(file.cell, "RESONATOR");
    assert_eq!(file.paths.len(), 2);

    let feed = &file.paths[0];
    assert_eq!(feed.direction, StartDirection::PlusX);
    let pad = feed.launch_pad.unwrap();
    assert_eq!(pad.closing, PadClosing::Filleted { radius: 20.0 });

    let resonator = &file.paths[1];
    assert!(matches!(
        resonator.ops[0],
        Operation::OpenGapFillet {
            side: FilletSide::Begin,
            direction: None,
            ..
        }
    ));
    assert!(matches!(
        resonator.ops[2],
        Operation::Bend {
            angle: AngleSpec::QuarterLeft,
            points: None,
            ..
        }
    ));
}

#[test]
fn test_json_operations() {
    let json = r#"{
        "paths": [{
            "name": "probe",
            "width": 4.0,
            "gap": 4.0,
            "start": {"x": 0.0, "y": 0.0},
            "direction": "1.5707963267948966",
            "ops": [
                {"op": "straight_to", "end": {"x": 0.0, "y": 100.0}},
                {"op": "taper_to", "end": {"x": 0.0, "y": 200.0}, "width": 10.0, "gap": 6.0},
                {"op": "bend", "radius": 50.0, "angle": -45.0, "points": 16},
                {"op": "meander_with_turn", "total": 900.0, "radius": 30.0, "straight": 100.0, "turn": "rr"}
            ]
        }]
    }"#;
    let file: RecipeFile = serde_json::from_str(json).unwrap();
    let recipe = &file.paths[0];
    assert_eq!(file.cell, "TOP");
    assert!(matches!(recipe.direction, StartDirection::Angle(_)));
    assert!(matches!(
        recipe.ops[2],
        Operation::Bend {
            angle: AngleSpec::Degrees(a),
            points: Some(16),
            ..
        } if a == -45.0
    ));
    assert!(matches!(
        recipe.ops[3],
        Operation::MeanderWithTurn {
            turn: TurnToken::HalfRight,
            ..
        }
    ));
}

#[test]
fn test_recipe_without_paths_is_rejected() {
    let file: RecipeFile = serde_json::from_str(r#"{"cell": "EMPTY"}"#).unwrap();
    assert!(file.validate().is_err());
}
