use sketch_engine::export::{OBJ_HEADER, mesh_to_obj};
use sketch_engine::geom::{
    ControlPoint, ProfileOptions, RevolveAxis, RevolveOptions, generate_profile, revolve_profile,
};

fn quarter_band_obj() -> String {
    let points = [ControlPoint::new(1.0, 0.0), ControlPoint::new(1.0, 2.0)];
    let profile = generate_profile(&points, &ProfileOptions { bezier_steps: 1, ..ProfileOptions::bezier() });
    assert_eq!(profile.len(), 2);

    let (mesh, diag) = revolve_profile(&profile, &RevolveOptions::new(RevolveAxis::Y, 90.0, 2)).expect("revolve");
    assert_eq!(diag.vertex_count, 6);
    assert_eq!(diag.triangle_count, 4);
    mesh_to_obj(&mesh)
}

#[test]
fn quarter_band_matches_golden_obj() {
    let expected = "\
# Generated by Revolution Surface
# Vertices
v 1.000000 0.000000 0.000000
v 1.000000 2.000000 0.000000
v 0.707107 0.000000 0.707107
v 0.707107 2.000000 0.707107
v 0.000000 0.000000 1.000000
v 0.000000 2.000000 1.000000

# Faces
f 1 3 2
f 3 4 2
f 3 5 4
f 5 6 4
";
    assert_eq!(quarter_band_obj(), expected);
}

#[test]
fn obj_is_stable_across_runs() {
    assert_eq!(quarter_band_obj(), quarter_band_obj());
}

#[test]
fn welded_full_turn_wraps_faces_to_the_first_ring() {
    let profile = [ControlPoint::new(1.0, 0.0), ControlPoint::new(1.0, 1.0)];
    let profile = generate_profile(&profile, &ProfileOptions { bezier_steps: 1, ..ProfileOptions::bezier() });
    let options = RevolveOptions { weld_seam: true, ..RevolveOptions::new(RevolveAxis::Y, 360.0, 4) };
    let (mesh, _) = revolve_profile(&profile, &options).expect("revolve");

    let obj = mesh_to_obj(&mesh);
    assert!(obj.starts_with(OBJ_HEADER));
    assert_eq!(obj.lines().filter(|line| line.starts_with("v ")).count(), 8);

    let faces: Vec<&str> = obj.lines().filter(|line| line.starts_with("f ")).collect();
    assert_eq!(faces.len(), 8);
    assert_eq!(&faces[6..], &["f 7 1 8", "f 1 2 8"]);
}

#[test]
fn empty_mesh_has_only_section_headers() {
    let (mesh, diag) = revolve_profile(&[], &RevolveOptions::default()).expect("revolve");
    assert!(diag.has_warnings());
    assert_eq!(mesh_to_obj(&mesh), format!("{OBJ_HEADER}\n# Vertices\n\n# Faces\n"));
}

#[test]
fn on_axis_vertices_print_unsigned_zeros() {
    let profile = [ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 1.0)];
    let profile = generate_profile(&profile, &ProfileOptions { bezier_steps: 1, ..ProfileOptions::bezier() });
    let (mesh, diag) = revolve_profile(&profile, &RevolveOptions::new(RevolveAxis::Y, 360.0, 4)).expect("revolve");
    assert_eq!(diag.axis_vertex_count, 1);

    let obj = mesh_to_obj(&mesh);
    let vertices: Vec<&str> = obj.lines().filter(|line| line.starts_with("v ")).collect();
    assert_eq!(vertices.len(), 10);
    // Even vertices are the revolved copies of the on-axis profile point.
    for line in vertices.iter().step_by(2) {
        assert_eq!(*line, "v 0.000000 0.000000 0.000000");
    }
    assert_eq!(vertices[1], "v 1.000000 1.000000 0.000000");
    assert_eq!(vertices[5], "v -1.000000 1.000000 0.000000");
}
