use sketch_engine::export::{import_curve_json, mesh_to_obj};
use sketch_engine::geom::{
    BSplineSampling, ControlPoint, FlightDirection, FlightOptions, FlightState, PointSequence, ProfileCurve,
    ProfileOptions, RevolveAxis, RevolveOptions, SmoothOptions, SpiralOptions, Tolerance, generate_profile,
    generate_trajectory, revolve_profile,
};
use sketch_engine::{FlightSession, RevolveRequest, build_revolve_surface, build_trajectory};

fn vase() -> PointSequence {
    PointSequence::from_points([
        ControlPoint::new(0.6, -2.0),
        ControlPoint::new(2.2, -1.2),
        ControlPoint::new(0.4, 0.4),
        ControlPoint::new(1.4, 1.6),
        ControlPoint::new(0.9, 2.0),
    ])
    .expect("valid polygon")
}

#[test]
fn imported_bezier_document_revolves_into_a_mesh() {
    let json = r#"{
        "type": "bezier",
        "degree": 2,
        "controlPoints": [{"x": 1, "y": 0}, {"x": 2, "y": 1}, {"x": 1, "y": 2}],
        "weights": [1, 2, 1],
        "timestamp": "2024-05-01T12:00:00.000Z"
    }"#;
    let imported = import_curve_json(json).expect("import");
    assert_eq!(imported.curve, ProfileCurve::Bezier);

    let profile = generate_profile(imported.points.as_slice(), &ProfileOptions::bezier());
    assert_eq!(profile.len(), 101);

    let (mesh, diag) = revolve_profile(&profile, &RevolveOptions::default()).expect("revolve");
    assert_eq!(mesh.vertex_count(), 33 * 101);
    assert_eq!(mesh.triangle_count(), 2 * 32 * 100);
    assert!(mesh.validate().is_ok());
    assert!(diag.is_clean(), "{}", diag.summary());

    let obj = mesh_to_obj(&mesh);
    assert_eq!(obj.lines().filter(|line| line.starts_with("v ")).count(), mesh.vertex_count());
    assert_eq!(obj.lines().filter(|line| line.starts_with("f ")).count(), mesh.triangle_count());
}

#[test]
fn bspline_profile_touches_both_polygon_ends() {
    let points = vase();
    let profile = generate_profile(points.as_slice(), &ProfileOptions::bspline());
    let spans = points.len() - 3;
    assert_eq!(profile.len(), BSplineSampling::default().sample_count(spans));

    let tol = Tolerance::new(1e-4);
    let first = points.as_slice()[0].position();
    let last = points.as_slice()[points.len() - 1].position();
    assert!(tol.approx_eq_point2(profile[0], first));
    assert!(tol.approx_eq_point2(profile[profile.len() - 1], last));
}

#[test]
fn welded_vase_is_closed_around_the_seam() {
    let profile = generate_profile(vase().as_slice(), &ProfileOptions::bspline());
    let options = RevolveOptions { weld_seam: true, ..RevolveOptions::new(RevolveAxis::Y, 360.0, 24) };
    let (mesh, diag) = revolve_profile(&profile, &options).expect("revolve");

    assert_eq!(mesh.vertex_count(), 24 * profile.len());
    // Only the top and bottom rims stay open.
    assert_eq!(diag.open_edge_count, 2 * 24);
    assert!(diag.is_manifold());
}

#[test]
fn canvas_request_builds_packed_surface() {
    let request: RevolveRequest = serde_json::from_str(
        r#"{
            "points": [{"x": 450, "y": 400}, {"x": 550, "y": 300}, {"x": 450, "y": 200}],
            "profile": {"bezier_steps": 20},
            "revolve": {"segments": 12},
            "canvas": {"width": 800, "height": 600, "pixels_per_unit": 50}
        }"#,
    )
    .expect("request json");

    let surface = build_revolve_surface(&request).expect("surface");
    assert_eq!(surface.vertex_count, 13 * 21);
    assert_eq!(surface.vertices.len(), surface.vertex_count * 3);
    // Canvas (450, 400) is one unit right of centre and two below it.
    assert!((surface.vertices[0] - 1.0).abs() < 1e-6);
    assert!((surface.vertices[1] + 2.0).abs() < 1e-6);

    let value = serde_json::to_value(&surface).expect("serialize");
    assert!(value.get("vertexCount").is_some());
    assert!(value.get("triangleCount").is_some());
}

#[test]
fn trajectory_export_and_flight_agree() {
    let spiral = SpiralOptions::new(8, FlightDirection::Left);
    let smooth = SmoothOptions::default();
    let export = build_trajectory(&spiral, &smooth).expect("trajectory");
    assert_eq!(export.control_points.len(), 8);
    assert_eq!(export.points.len(), 8 * 20 + 1);
    assert_eq!(export.arc_lengths.len(), export.points.len());
    assert!((export.arc_lengths[export.arc_lengths.len() - 1] - export.total_length).abs() < 1e-9);

    let trajectory = generate_trajectory(&spiral, &smooth).expect("trajectory");
    let session = FlightSession::from_trajectory(trajectory, FlightOptions::default());
    let mut player = session.player().clone();
    assert_eq!(player.status().state, FlightState::Idle);

    player.start();
    let mut last_altitude = None;
    while let Some(pose) = player.advance(1.0) {
        assert!(pose.position.is_finite());
        assert!(pose.yaw.is_finite() && pose.pitch.is_finite());
        last_altitude = Some(pose.position.y);
    }
    assert_eq!(player.status().state, FlightState::Landed);
    assert!(last_altitude.expect("at least one pose") >= 0.0);
}

#[test]
fn oversized_spiral_is_rejected() {
    let spiral = SpiralOptions::new(5_000, FlightDirection::Right);
    assert!(build_trajectory(&spiral, &SmoothOptions::default()).is_err());
}
