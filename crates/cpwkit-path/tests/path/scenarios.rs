// Scenario tests for the primitive emitter

use cpwkit_core::{headings_match, Layer, PathError, Point};
use cpwkit_path::{
    AngleSpec, CrossSection, FilletSide, MeanderEnding, PathSegment, StartDirection, WaveguidePath,
};
use std::f64::consts::PI;

fn path() -> WaveguidePath {
    WaveguidePath::polygon(CrossSection::new(10.0, 6.0).unwrap(), Layer::new(5, 0))
}

#[test]
fn test_straight_then_half_turn_scenario() {
    let mut p = path();
    p.start(Point::zero(), 0.0).unwrap();
    p.straight(100.0, None, None).unwrap();
    assert!(p.position().unwrap().approx_eq(Point::new(100.0, 0.0), 1e-12));
    assert!(headings_match(p.heading().unwrap(), 0.0, 1e-12));

    p.bend(50.0, AngleSpec::Degrees(180.0), None, None, 100).unwrap();
    assert!(headings_match(p.heading().unwrap(), PI, 1e-12));
    assert!(p.position().unwrap().approx_eq(Point::new(100.0, 100.0), 1e-9));
}

#[test]
fn test_reference_meander() {
    let mut p = path();
    p.start(Point::zero(), 0.0).unwrap();
    let report = p.meander(1000.0, 25.0, 150.0, 0.0, 100).unwrap();
    assert!((p.length() - 1000.0).abs() < 1e-6);
    assert!(report.periods <= (1000.0_f64 / (150.0 + PI * 25.0)).ceil() as usize + 1);
    assert_eq!(report.ending, MeanderEnding::Straight);
}

#[test]
fn test_degenerate_taper_keeps_cross_section() {
    let mut p = path();
    p.start(Point::zero(), 0.0).unwrap();
    p.straight(75.0, None, None).unwrap();
    let before = p.cursor().unwrap();
    p.straight(0.0, Some(10.0), Some(6.0)).unwrap();
    let after = p.cursor().unwrap();
    assert_eq!(after.section, before.section);
    assert!(after.pose.position.approx_eq(before.pose.position, 1e-12));
}

#[test]
fn test_fillet_radius_beyond_half_distance() {
    let mut p = path();
    p.start(Point::zero(), 0.0).unwrap();
    let err = p
        .open_gap_fillet(10.0, FilletSide::End, 5.5, None)
        .unwrap_err();
    assert!(matches!(err, PathError::Geometry(_)));
}

#[test]
fn test_open_gap_widens_cross_section() {
    let mut p = path();
    p.start(Point::zero(), StartDirection::MinusX).unwrap();
    p.open_gap(30.0, Some(20.0), Some(10.0)).unwrap();
    assert_eq!(p.cross_section().unwrap(), CrossSection::new(20.0, 10.0).unwrap());
    assert!(p.position().unwrap().approx_eq(Point::new(-30.0, 0.0), 1e-9));
    match &p.segments()[0] {
        PathSegment::OpenGap { from, to, .. } => {
            assert_eq!(from.total_extent(), 22.0);
            assert_eq!(to.total_extent(), 40.0);
        }
        other => panic!("expected an open gap, got {:?}", other),
    }
}

#[test]
fn test_tapered_bend_updates_cross_section() {
    let mut p = path();
    p.start(Point::zero(), 0.0).unwrap();
    p.bend(100.0, AngleSpec::QuarterRight, Some(4.0), Some(4.0), 50)
        .unwrap();
    assert_eq!(p.cross_section().unwrap(), CrossSection::new(4.0, 4.0).unwrap());
    assert!(headings_match(p.heading().unwrap(), -PI / 2.0, 1e-12));
    assert!(p.position().unwrap().approx_eq(Point::new(100.0, -100.0), 1e-9));
}

#[test]
fn test_earlier_segments_keep_their_section() {
    let mut p = path();
    p.start(Point::zero(), 0.0).unwrap();
    p.straight(10.0, None, None).unwrap();
    p.straight(10.0, Some(2.0), Some(2.0)).unwrap();
    p.straight(10.0, None, None).unwrap();
    assert_eq!(p.segments()[0].section_end(), CrossSection::new(10.0, 6.0).unwrap());
    assert_eq!(p.segments()[2].section_start(), CrossSection::new(2.0, 2.0).unwrap());
}

#[test]
fn test_invalid_angle_token() {
    let err = "left-ish".parse::<AngleSpec>().unwrap_err();
    assert!(matches!(err, PathError::InvalidArgument { .. }));
}
