#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("sketch_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use sketch_engine::export::mesh_to_obj;
    use sketch_engine::geom::{
        ControlPoint, FlightDirection, FlightPlayer, FlightState, GeomMesh, GeomMeshDiagnostics, Point2, Point3,
        ProfileOptions, RevolveAxis, RevolveOptions, SmoothOptions, SpiralOptions, Trajectory,
        generate_profile, generate_spiral_control_points, generate_trajectory, revolve_profile,
    };
    use std::fmt::Write as _;
    use std::fs;
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;
    const FLIGHT_SPEED: f64 = 2.0;

    const USAGE: &str = r#"sketch_cli (sketch-engine)

USAGE:
  sketch_cli list
  sketch_cli run <scenario|all> [options]

SCENARIOS:
  bezier_vase
  bspline_vase
  bezier_wedge_x
  spiral_flight

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.obj and/or <scenario>.snap to this dir (required for `all`)
  --obj <path>       Write OBJ (single scenario only)
  --snap <path>      Write golden-style snapshot (single scenario only)
  --no-obj           Skip OBJ when using --out-dir
  --no-snap          Skip snapshot when using --out-dir
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut write_obj = true;
        let mut write_snap = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => overwrite = true,
                "--no-obj" => write_obj = false,
                "--no-snap" => write_snap = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if obj_path.is_some() || snap_path.is_some() {
                return Err("use either --out-dir or --obj/--snap (not both)".to_string());
            }
            if !write_obj && !write_snap {
                return Err("nothing to write (both --no-obj and --no-snap set)".to_string());
            }

            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(*scenario, dir, write_obj, write_snap, overwrite)?;
                }
                return Ok(());
            }

            let scenario =
                Scenario::from_str(scenario_name.as_str()).ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(scenario, dir, write_obj, write_snap, overwrite);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario =
            Scenario::from_str(scenario_name.as_str()).ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        if let Some(path) = obj_path.as_deref() {
            write_text_file(path, &output.obj, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}: {}", output.name, output.summary);
        Ok(())
    }

    fn run_one_scenario_to_dir(
        scenario: Scenario,
        dir: &Path,
        write_obj: bool,
        write_snap: bool,
        overwrite: bool,
    ) -> Result<(), String> {
        let output = run_scenario(scenario)?;

        if write_snap {
            let path = dir.join(format!("{}.snap", output.name));
            write_text_file(&path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if write_obj {
            let path = dir.join(format!("{}.obj", output.name));
            write_text_file(&path, &output.obj, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}: {}", output.name, output.summary);
        Ok(())
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        // Collapses -0.0 so mirrored runs snapshot identically.
        if q == 0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_vec3_line(out: &mut String, prefix: &str, v: [f64; 3]) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, v[0]);
        out.push(' ');
        write_f64(out, v[1]);
        out.push(' ');
        write_f64(out, v[2]);
        out.push('\n');
    }

    fn write_vec2_line(out: &mut String, prefix: &str, v: [f64; 2]) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, v[0]);
        out.push(' ');
        write_f64(out, v[1]);
        out.push('\n');
    }

    fn write_scalar_line(out: &mut String, key: &str, value: f64) {
        let _ = write!(out, "{key} ");
        write_f64(out, value);
        out.push('\n');
    }

    fn write_geom_mesh_diagnostics(out: &mut String, diag: &GeomMeshDiagnostics) {
        let _ = writeln!(out, "mesh_diag.vertex_count {}", diag.vertex_count);
        let _ = writeln!(out, "mesh_diag.triangle_count {}", diag.triangle_count);
        let _ = writeln!(out, "mesh_diag.welded_vertex_count {}", diag.welded_vertex_count);
        let _ = writeln!(out, "mesh_diag.degenerate_triangle_count {}", diag.degenerate_triangle_count);
        let _ = writeln!(out, "mesh_diag.axis_vertex_count {}", diag.axis_vertex_count);
        let _ = writeln!(out, "mesh_diag.open_edge_count {}", diag.open_edge_count);
        let _ = writeln!(out, "mesh_diag.non_manifold_edge_count {}", diag.non_manifold_edge_count);
        let _ = writeln!(out, "mesh_diag.warning_count {}", diag.warnings.len());
        for (idx, warning) in diag.warnings.iter().enumerate() {
            let _ = writeln!(out, "mesh_diag.warning.{idx} {warning}");
        }
    }

    fn write_profile(out: &mut String, profile: &[Point2]) {
        let _ = writeln!(out, "profile.points {}", profile.len());
        for p in profile {
            write_vec2_line(out, "q", p.to_array());
        }
    }

    fn write_mesh(out: &mut String, mesh: &GeomMesh) {
        let _ = writeln!(out, "mesh.vertex_count {}", mesh.vertex_count());
        let _ = writeln!(out, "mesh.triangle_count {}", mesh.triangle_count());
        let _ = writeln!(out, "mesh.has_normals {}", mesh.normals.is_some());

        if let Some(bounds) = mesh.bounds() {
            write_vec3_line(out, "mesh.bounds.min", bounds.min.to_array());
            write_vec3_line(out, "mesh.bounds.max", bounds.max.to_array());
        }

        let _ = writeln!(out, "mesh.positions {}", mesh.positions.len());
        for p in mesh.positions.iter().copied() {
            write_vec3_line(out, "p", p);
        }

        let _ = writeln!(out, "mesh.indices {}", mesh.indices.len());
        for [a, b, c] in mesh.triangles() {
            let _ = writeln!(out, "i {a} {b} {c}");
        }
    }

    fn write_trajectory(out: &mut String, control: &[Point3], trajectory: &Trajectory) {
        let _ = writeln!(out, "spiral.control_points {}", control.len());
        for p in control {
            write_vec3_line(out, "c", p.to_array());
        }
        let _ = writeln!(out, "trajectory.samples {}", trajectory.len());
        write_scalar_line(out, "trajectory.total_length", trajectory.total_length());
        write_scalar_line(out, "trajectory.max_altitude", trajectory.max_altitude());
        for p in trajectory.points() {
            write_vec3_line(out, "s", p.to_array());
        }
    }

    fn snapshot(op: &str, sections: impl FnOnce(&mut String)) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# sketch-engine golden v1");
        let _ = writeln!(out, "op {op}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        sections(&mut out);
        normalize_snapshot_text(&out)
    }

    /// Polyline OBJ: `v` lines followed by a single `l` element.
    fn polyline_to_obj(name: &str, points: &[Point3]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# sketch-engine sketch_cli");
        let _ = writeln!(out, "o {name}");
        for p in points {
            let _ = writeln!(out, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z);
        }
        if points.len() >= 2 {
            out.push('l');
            for i in 1..=points.len() {
                let _ = write!(out, " {i}");
            }
            out.push('\n');
        }
        out
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        BezierVase,
        BSplineVase,
        BezierWedgeX,
        SpiralFlight,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::BezierVase,
            Scenario::BSplineVase,
            Scenario::BezierWedgeX,
            Scenario::SpiralFlight,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::BezierVase => "bezier_vase",
                Scenario::BSplineVase => "bspline_vase",
                Scenario::BezierWedgeX => "bezier_wedge_x",
                Scenario::SpiralFlight => "spiral_flight",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Scenario::ALL.iter().copied().find(|scenario| scenario.name() == name)
        }
    }

    struct ScenarioOutput {
        name: &'static str,
        obj: String,
        summary: String,
        snapshot: String,
    }

    fn run_scenario(scenario: Scenario) -> Result<ScenarioOutput, String> {
        match scenario {
            Scenario::BezierVase => scenario_revolve(
                scenario.name(),
                &vase_polygon(),
                &ProfileOptions { bezier_steps: 24, ..ProfileOptions::bezier() },
                &RevolveOptions::new(RevolveAxis::Y, 360.0, 24),
            ),
            Scenario::BSplineVase => scenario_revolve(
                scenario.name(),
                &vase_polygon(),
                &ProfileOptions::bspline(),
                &RevolveOptions { weld_seam: true, ..RevolveOptions::new(RevolveAxis::Y, 360.0, 24) },
            ),
            Scenario::BezierWedgeX => scenario_revolve(
                scenario.name(),
                &[
                    ControlPoint::new(-1.0, 0.5),
                    ControlPoint::new(0.0, 2.0),
                    ControlPoint::new(1.0, 0.5),
                ],
                &ProfileOptions { bezier_steps: 8, ..ProfileOptions::bezier() },
                &RevolveOptions::new(RevolveAxis::X, 90.0, 6),
            ),
            Scenario::SpiralFlight => scenario_spiral_flight(scenario.name()),
        }
    }

    fn vase_polygon() -> [ControlPoint; 5] {
        [
            ControlPoint::new(0.6, -2.0),
            ControlPoint::new(2.2, -1.2),
            ControlPoint::new(0.4, 0.4),
            ControlPoint::new(1.4, 1.6),
            ControlPoint::new(0.9, 2.0),
        ]
    }

    fn scenario_revolve(
        name: &'static str,
        points: &[ControlPoint],
        profile_options: &ProfileOptions,
        revolve_options: &RevolveOptions,
    ) -> Result<ScenarioOutput, String> {
        let profile = generate_profile(points, profile_options);
        let (mesh, diag) = revolve_profile(&profile, revolve_options).map_err(|e| e.to_string())?;
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

        let snap = snapshot(name, |out| {
            let _ = writeln!(out, "revolve.axis {:?}", revolve_options.axis);
            write_scalar_line(out, "revolve.angle_degrees", revolve_options.angle_degrees);
            let _ = writeln!(out, "revolve.segments {}", revolve_options.segments);
            let _ = writeln!(out, "revolve.weld_seam {}", revolve_options.weld_seam);
            write_profile(out, &profile);
            write_geom_mesh_diagnostics(out, &diag);
            write_mesh(out, &mesh);
        });

        Ok(ScenarioOutput {
            name,
            obj: mesh_to_obj(&mesh),
            summary: format!(
                "vertices={} triangles={} | {}",
                mesh.vertex_count(),
                mesh.triangle_count(),
                diag.summary()
            ),
            snapshot: snap,
        })
    }

    fn scenario_spiral_flight(name: &'static str) -> Result<ScenarioOutput, String> {
        let spiral = SpiralOptions::new(12, FlightDirection::Right);
        let control = generate_spiral_control_points(&spiral);
        let trajectory = generate_trajectory(&spiral, &SmoothOptions::default()).map_err(|e| e.to_string())?;

        let obj = polyline_to_obj(name, trajectory.points());
        let total_length = trajectory.total_length();

        let mut player = FlightPlayer::new(trajectory.clone());
        player.start();
        let mut steps = 0usize;
        let mut peak_pitch = 0.0f64;
        while let Some(pose) = player.advance(FLIGHT_SPEED) {
            steps += 1;
            peak_pitch = peak_pitch.max(pose.pitch);
        }
        let status = player.status();
        if status.state != FlightState::Landed {
            return Err(format!("flight ended in state {:?}", status.state));
        }

        let snap = snapshot(name, |out| {
            write_trajectory(out, &control, &trajectory);
            write_scalar_line(out, "flight.speed", FLIGHT_SPEED);
            let _ = writeln!(out, "flight.steps {steps}");
            write_scalar_line(out, "flight.peak_pitch", peak_pitch);
            let _ = writeln!(out, "flight.state {:?}", status.state);
        });

        Ok(ScenarioOutput {
            name,
            obj,
            summary: format!("samples={} length={total_length:.3} flight_steps={steps}", trajectory.len()),
            snapshot: snap,
        })
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
