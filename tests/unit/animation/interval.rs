use super::*;

fn fade_in() -> Segment {
    Segment::new([10.0, 20.0], [0.0, 1.0]).unwrap()
}

#[test]
fn clamps_outside_input_range() {
    let seg = fade_in();
    assert_eq!(seg.map(10.0 - 100.0), 0.0);
    assert_eq!(seg.map(20.0 + 100.0), 1.0);
    assert_eq!(seg.map(15.0), 0.5);
}

#[test]
fn identity_extrapolation_continues_the_line() {
    let seg = fade_in().with_extrapolation(Extrapolate::Identity, Extrapolate::Identity);
    assert_eq!(seg.map(0.0), -1.0);
    assert_eq!(seg.map(30.0), 2.0);
}

#[test]
fn degenerate_segment_returns_end_value_without_dividing() {
    let seg = Segment::new([50.0, 50.0], [0.0, 1.0]).unwrap();
    for f in [50.0, 50.5, 51.0, 1e6] {
        assert_eq!(seg.map(f), 1.0);
    }
    assert_eq!(seg.map(49.0), 0.0);

    let extended = seg.with_extrapolation(Extrapolate::Identity, Extrapolate::Identity);
    assert_eq!(extended.map(10.0), 0.0);
    assert_eq!(extended.map(60.0), 1.0);
}

#[test]
fn easing_shapes_progress_but_not_endpoints() {
    let seg = fade_in().with_ease(Ease::InQuad);
    assert_eq!(seg.map(10.0), 0.0);
    assert_eq!(seg.map(15.0), 0.25);
    assert_eq!(seg.map(20.0), 1.0);
}

#[test]
fn sub_frame_positions_are_not_rounded() {
    let seg = Segment::new([0.0, 4.0], [0.0, 1.0]).unwrap();
    assert_eq!(seg.map(0.5), 0.125);
}

#[test]
fn reversed_input_range_is_rejected() {
    assert!(Segment::new([20.0, 10.0], [0.0, 1.0]).is_err());
    assert!(Segment::new([0.0, f64::NAN], [0.0, 1.0]).is_err());
}

#[test]
fn piecewise_fade_in_hold_fade_out() {
    let pw = Piecewise::new(vec![0.0, 15.0, 75.0, 90.0], vec![0.0, 1.0, 1.0, 0.0]).unwrap();
    assert_eq!(pw.map(-5.0), 0.0);
    assert_eq!(pw.map(7.5), 0.5);
    assert_eq!(pw.map(15.0), 1.0);
    assert_eq!(pw.map(40.0), 1.0);
    assert_eq!(pw.map(82.5), 0.5);
    assert_eq!(pw.map(200.0), 0.0);
}

#[test]
fn piecewise_pulse_matches_three_knot_shape() {
    let pw = Piecewise::new(vec![0.0, 12.0, 24.0], vec![1.0, 1.08, 1.0]).unwrap();
    assert_eq!(pw.map(0.0), 1.0);
    assert_eq!(pw.map(12.0), 1.08);
    assert!((pw.map(18.0) - 1.04).abs() < 1e-12);
    assert_eq!(pw.map(40.0), 1.0);
}

#[test]
fn piecewise_extrapolation_uses_outer_segments() {
    let pw = Piecewise::new(vec![0.0, 10.0, 20.0], vec![0.0, 10.0, 30.0])
        .unwrap()
        .with_extrapolation(Extrapolate::Identity, Extrapolate::Identity);
    assert_eq!(pw.map(-5.0), -5.0);
    assert_eq!(pw.map(25.0), 40.0);
}

#[test]
fn piecewise_validation() {
    assert!(Piecewise::new(vec![0.0], vec![1.0]).is_err());
    assert!(Piecewise::new(vec![0.0, 1.0], vec![1.0]).is_err());
    assert!(Piecewise::new(vec![0.0, 2.0, 1.0], vec![0.0, 1.0, 2.0]).is_err());
}

#[test]
fn segment_converts_to_equivalent_piecewise() {
    let seg = fade_in().with_ease(Ease::OutCubic);
    let pw = Piecewise::from(seg.clone());
    for f in [0.0, 12.0, 17.5, 25.0] {
        assert_eq!(pw.map(f), seg.map(f));
    }
}

#[test]
fn free_function_matches_method() {
    let seg = fade_in();
    assert_eq!(map(13.0, &seg), seg.map(13.0));
}

#[test]
fn serde_defaults_to_clamped_linear() {
    let seg: Segment = serde_json::from_str(r#"{"input":[0,10],"output":[1,0]}"#).unwrap();
    assert_eq!(seg.left, Extrapolate::Clamp);
    assert_eq!(seg.right, Extrapolate::Clamp);
    assert_eq!(seg.ease, None);
    assert_eq!(seg.map(5.0), 0.5);
}
