use crate::geom::{ControlPoint, Curve2, Point2, PointSequence, RationalBezier, generate_bezier_curve, rational_bezier_point};

fn arch() -> PointSequence {
    PointSequence::from_parts(
        &[Point2::new(-2.0, 0.0), Point2::new(-1.0, 3.0), Point2::new(1.0, 3.0), Point2::new(2.0, 0.0)],
        Some(&[1.0, 2.0, 0.5, 1.0]),
    )
    .expect("valid arch")
}

#[test]
fn generated_curve_hits_first_and_last_control_points() {
    let points = arch();
    let curve = generate_bezier_curve(points.as_slice(), 50);
    assert_eq!(curve.len(), 51);
    assert!(curve[0].distance_to(Point2::new(-2.0, 0.0)) < 1e-12);
    assert!(curve[50].distance_to(Point2::new(2.0, 0.0)) < 1e-12);
}

#[test]
fn curve_trait_matches_free_function() {
    let points = arch();
    let bezier = RationalBezier::new(points.as_slice());
    assert_eq!(bezier.degree(), 3);
    assert_eq!(bezier.domain(), (0.0, 1.0));
    for i in 0..=10 {
        let t = f64::from(i) / 10.0;
        assert_eq!(bezier.point_at(t), rational_bezier_point(points.as_slice(), t));
    }
}

#[test]
fn rational_quadratic_traces_unit_quarter_circle() {
    // Middle weight cos(45°) gives an exact circular arc.
    let w = std::f64::consts::FRAC_1_SQRT_2;
    let pts = [ControlPoint::new(1.0, 0.0), ControlPoint::weighted(1.0, 1.0, w), ControlPoint::new(0.0, 1.0)];
    for p in generate_bezier_curve(&pts, 32) {
        let r = p.x.hypot(p.y);
        assert!((r - 1.0).abs() < 1e-12, "radius {r}");
    }
}

#[test]
fn editing_the_sequence_changes_the_next_evaluation() {
    let mut points = arch();
    let before = rational_bezier_point(points.as_slice(), 0.5).unwrap();
    points.move_point(1, Point2::new(-1.0, 6.0)).unwrap();
    let after = rational_bezier_point(points.as_slice(), 0.5).unwrap();
    assert!(after.y > before.y);
}

#[test]
fn non_finite_control_points_give_no_point() {
    let pts = [ControlPoint::new(0.0, 0.0), ControlPoint::new(f64::INFINITY, 1.0), ControlPoint::new(2.0, 0.0)];
    for t in [0.25, 0.5, 0.75] {
        assert!(rational_bezier_point(&pts, t).is_none(), "t = {t}");
    }
    assert!(generate_bezier_curve(&pts, 16).iter().all(|p| p.is_finite()));

    assert!(rational_bezier_point(&[ControlPoint::new(f64::NAN, 0.0)], 0.5).is_none());
}

#[test]
fn overflowing_homogeneous_weight_gives_no_point() {
    let pts = [
        ControlPoint::new(0.0, 0.0),
        ControlPoint::weighted(1e300, 0.0, 1e10),
        ControlPoint::new(1.0, 0.0),
    ];
    assert!(rational_bezier_point(&pts, 0.5).is_none());
    assert!(generate_bezier_curve(&pts, 20).iter().all(|p| p.is_finite()));
}
