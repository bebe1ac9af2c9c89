// Property tests for meanders and bends

use cpwkit_core::{headings_match, normalize_angle, rotate_point, Layer, Point};
use cpwkit_path::{initial_bend, CrossSection, PathSegment, TurnToken, WaveguidePath};
use proptest::prelude::*;
use std::f64::consts::{PI, TAU};

fn started(x: f64, y: f64, heading: f64) -> WaveguidePath {
    let mut path = WaveguidePath::polygon(CrossSection::new(10.0, 6.0).unwrap(), Layer::new(5, 0));
    path.start(Point::new(x, y), heading).unwrap();
    path
}

fn integrated_heading(start: f64, segments: &[PathSegment]) -> f64 {
    let turned: f64 = segments
        .iter()
        .map(|s| match s {
            PathSegment::Arc { sweep, .. } => *sweep,
            _ => 0.0,
        })
        .sum();
    normalize_angle(start + turned)
}

fn token() -> impl Strategy<Value = TurnToken> {
    prop_oneof![
        Just(TurnToken::Left),
        Just(TurnToken::Right),
        Just(TurnToken::HalfLeft),
        Just(TurnToken::HalfRight),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn meander_realizes_exact_length(
        total in 0.0f64..5000.0,
        radius in 15.0f64..100.0,
        straight in 0.0f64..300.0,
        phase in 0.0f64..TAU,
    ) {
        let mut path = started(0.0, 0.0, 0.0);
        let report = path.meander(total, radius, straight, phase, 20).unwrap();
        prop_assert!((path.length() - total).abs() < 1e-6);
        prop_assert!((report.length - total).abs() < 1e-6);

        let bound = (total / (straight + PI * radius)).ceil() as usize + 1;
        prop_assert!(report.periods <= bound);
    }

    #[test]
    fn meander_heading_matches_integrated_sweeps(
        total in 0.0f64..3000.0,
        radius in 15.0f64..60.0,
        straight in 0.0f64..200.0,
        phase in 0.0f64..TAU,
        heading in -PI..PI,
    ) {
        let mut path = started(10.0, -20.0, heading);
        path.meander(total, radius, straight, phase, 20).unwrap();
        let expected = integrated_heading(heading, path.segments());
        prop_assert!(headings_match(path.heading().unwrap(), expected, 1e-9));
    }

    #[test]
    fn meander_opens_with_phase_rule(
        radius in 15.0f64..60.0,
        straight in 0.0f64..200.0,
        phase in 0.0f64..TAU,
    ) {
        let total = 4.0 * (straight + PI * radius);
        let mut path = started(0.0, 0.0, 0.0);
        path.meander(total, radius, straight, phase, 20).unwrap();
        let (expected, _) = initial_bend(phase);
        match &path.segments()[0] {
            PathSegment::Arc { sweep, .. } => prop_assert!((sweep - expected).abs() < 1e-12),
            other => prop_assert!(false, "expected an opening bend, got {:?}", other),
        }
    }

    #[test]
    fn token_meander_realizes_exact_length(
        total in 0.0f64..5000.0,
        radius in 15.0f64..100.0,
        straight in 0.0f64..300.0,
        turn in token(),
    ) {
        let mut path = started(0.0, 0.0, 0.0);
        let report = path.meander_with_turn(total, radius, straight, turn, 20).unwrap();
        prop_assert!((path.length() - total).abs() < 1e-6);
        prop_assert!(report.residual_angle.abs() <= PI + 1e-9);
    }

    #[test]
    fn opposite_quarter_bends_restore_heading(
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0,
        heading in -PI..PI,
        radius in 15.0f64..500.0,
    ) {
        let mut path = started(x, y, heading);
        path.bend(radius, 90.0, None, None, 20).unwrap();
        path.bend(radius, -90.0, None, None, 20).unwrap();

        prop_assert!(headings_match(path.heading().unwrap(), heading, 1e-9));
        // Two opposite quarter arcs: forward by r, left by r, twice over
        let start = Point::new(x, y);
        let expected = rotate_point(heading, Point::new(x + 2.0 * radius, y + 2.0 * radius), start);
        prop_assert!(path.position().unwrap().approx_eq(expected, 1e-6));
    }
}
