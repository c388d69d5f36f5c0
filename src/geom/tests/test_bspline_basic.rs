use crate::geom::{
    BSplineSampling, ClampedBSpline, ControlPoint, Curve2, Point2, bspline_point, generate_bspline_curve,
};

fn wave(n: usize) -> Vec<ControlPoint> {
    (0..n).map(|i| ControlPoint::new(i as f64, if i % 2 == 0 { 0.0 } else { 1.0 })).collect()
}

#[test]
fn clamped_curve_interpolates_both_ends() {
    let pts = wave(7);
    let curve = generate_bspline_curve(&pts, 3, &BSplineSampling::default());
    let first = curve.first().copied().unwrap();
    let last = curve.last().copied().unwrap();
    assert_eq!(first, Point2::new(0.0, 0.0));
    assert!(last.distance_to(Point2::new(6.0, 0.0)) < 1e-4, "{last:?}");
}

#[test]
fn degree_bounds_produce_empty_curves() {
    let pts = wave(4);
    let sampling = BSplineSampling::default();
    assert!(!generate_bspline_curve(&pts, 2, &sampling).is_empty());
    assert!(generate_bspline_curve(&pts, 3, &sampling).is_empty());
    assert!(generate_bspline_curve(&pts, 4, &sampling).is_empty());
    assert!(generate_bspline_curve(&pts, 9, &sampling).is_empty());
    assert!(ClampedBSpline::new(&pts, 3).is_none());
}

#[test]
fn curve_stays_in_control_polygon_hull() {
    let pts = wave(8);
    for p in generate_bspline_curve(&pts, 3, &BSplineSampling::default()) {
        assert!(p.is_finite());
        assert!((-1e-9..=7.0 + 1e-9).contains(&p.x));
        assert!((-1e-9..=1.0 + 1e-9).contains(&p.y));
    }
}

#[test]
fn domain_spans_point_count_minus_degree() {
    let pts = wave(9);
    let spline = ClampedBSpline::new(&pts, 3).unwrap();
    assert_eq!(spline.domain(), (0.0, 6.0));
    assert_eq!(spline.span_count(), 6);
    assert_eq!(spline.knots().len(), 13);
    assert_eq!(spline.point_at(2.5), bspline_point(&pts, 3, 2.5));
}

#[test]
fn linear_bspline_is_the_control_polygon() {
    let pts = wave(5);
    let p = bspline_point(&pts, 1, 1.5).unwrap();
    assert!((p.x - 1.5).abs() < 1e-12);
    assert!((p.y - 0.5).abs() < 1e-12);
}

#[test]
fn infinite_coordinate_never_leaks_out() {
    let mut pts = wave(7);
    pts[4].x = f64::INFINITY;
    for u in [0.0, 1.0, 2.5, 3.9] {
        assert!(bspline_point(&pts, 3, u).is_none(), "u = {u}");
    }
    let curve = generate_bspline_curve(&pts, 3, &BSplineSampling::default());
    assert!(curve.iter().all(|p| p.is_finite()));

    pts[4].x = f64::NAN;
    assert!(bspline_point(&pts, 3, 2.0).is_none());
}

#[test]
fn huge_coordinates_give_finite_points_or_none() {
    let pts: Vec<ControlPoint> = (0..6)
        .map(|i| ControlPoint::new(f64::MAX, if i % 2 == 0 { f64::MAX } else { -f64::MAX }))
        .collect();
    let curve = generate_bspline_curve(&pts, 3, &BSplineSampling::default());
    assert!(curve.iter().all(|p| p.is_finite()));
    for s in 0..30 {
        let u = f64::from(s) * 0.1;
        if let Some(p) = bspline_point(&pts, 3, u) {
            assert!(p.is_finite(), "u = {u}: {p:?}");
        }
    }
}
