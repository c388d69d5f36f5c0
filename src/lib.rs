#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod export;
pub mod geom;

use std::fmt;

use geom::{
    BSplineSampling, CanvasFrame, ControlPoint, FlightOptions, FlightPlayer, GeomMesh, GeomMeshDiagnostics, Point2,
    PointSequence, ProfileCurve, ProfileOptions, RevolveOptions, SmoothOptions, SpiralOptions, Trajectory,
    clamped_uniform_knots, generate_bezier_curve, generate_bspline_curve, generate_profile,
    generate_spiral_control_points, generate_trajectory, revolve_profile, smooth_trajectory,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| std::thread::available_parallelism().map(|value| value.get()).ok())
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not initialise rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

// ─────────────────────────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────────────────────────

/// Input of [`revolve_surface`] and [`revolve_surface_obj`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RevolveRequest {
    pub points: Vec<ControlPoint>,
    pub profile: ProfileOptions,
    pub revolve: RevolveOptions,
    /// When set, `points` are canvas pixels and are mapped to world units
    /// after the profile curve is evaluated.
    pub canvas: Option<CanvasFrame>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevolveSurface {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub diagnostics: GeomMeshDiagnostics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryExport {
    pub control_points: Vec<[f64; 3]>,
    pub points: Vec<[f64; 3]>,
    pub arc_lengths: Vec<f64>,
    pub total_length: f64,
    pub max_altitude: f64,
}

fn point_sequence(points: Vec<ControlPoint>) -> Result<PointSequence, String> {
    PointSequence::try_from(points).map_err(|err| err.to_string())
}

/// Evaluates the profile and sweeps it.
///
/// # Errors
///
/// Invalid control points or revolve parameters, as text.
pub fn build_revolve_mesh(request: &RevolveRequest) -> Result<(GeomMesh, GeomMeshDiagnostics), String> {
    let points = point_sequence(request.points.clone())?;
    let mut profile = generate_profile(points.as_slice(), &request.profile);
    if let Some(frame) = request.canvas {
        profile = frame.map_to_world(&profile);
    }
    let result = revolve_profile(&profile, &request.revolve).map_err(|err| err.to_string())?;
    debug_log!("revolve_surface: {} profile samples -> {}", profile.len(), result.1.summary());
    Ok(result)
}

/// # Errors
///
/// See [`build_revolve_mesh`].
pub fn build_revolve_surface(request: &RevolveRequest) -> Result<RevolveSurface, String> {
    let (mesh, diagnostics) = build_revolve_mesh(request)?;
    Ok(RevolveSurface {
        vertices: mesh.vertices_flat(),
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        indices: mesh.indices,
        diagnostics,
    })
}

/// # Errors
///
/// Spiral options out of range, as text.
pub fn build_trajectory(spiral: &SpiralOptions, smooth: &SmoothOptions) -> Result<TrajectoryExport, String> {
    spiral.validate().map_err(|err| err.to_string())?;
    let control = generate_spiral_control_points(spiral);
    let trajectory = Trajectory::from_points(smooth_trajectory(&control, smooth));
    Ok(TrajectoryExport {
        control_points: control.iter().map(|p| p.to_array()).collect(),
        points: trajectory.points().iter().map(|p| p.to_array()).collect(),
        arc_lengths: trajectory.arc_lengths().to_vec(),
        total_length: trajectory.total_length(),
        max_altitude: trajectory.max_altitude(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// wasm entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Deserialises `value`, falling back to `T::default()` for `undefined`/`null`.
fn from_js_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsError::new(&err.to_string()).into())
}

fn points_from_js(points: JsValue) -> Result<PointSequence, JsValue> {
    let raw: Vec<ControlPoint> = serde_wasm_bindgen::from_value(points).map_err(to_js_error)?;
    point_sequence(raw).map_err(|err| js_error(&err))
}

/// Samples a rational Bézier curve. `points` is `[{x, y, weight?}]`.
#[wasm_bindgen]
pub fn bezier_curve(points: JsValue, steps: u32) -> Result<JsValue, JsValue> {
    let points = points_from_js(points)?;
    let curve: Vec<Point2> = generate_bezier_curve(points.as_slice(), steps as usize);
    to_js(&curve)
}

/// Samples a clamped uniform B-spline. `sampling` may be `undefined`.
#[wasm_bindgen]
pub fn bspline_curve(points: JsValue, degree: u32, sampling: JsValue) -> Result<JsValue, JsValue> {
    let points = points_from_js(points)?;
    let sampling: BSplineSampling = from_js_or_default(sampling)?;
    let curve = generate_bspline_curve(points.as_slice(), degree as usize, &sampling);
    to_js(&curve)
}

/// Clamped uniform knot vector; empty when `degree >= count`.
#[wasm_bindgen]
#[must_use]
pub fn bspline_knots(count: u32, degree: u32) -> Vec<f64> {
    clamped_uniform_knots(count as usize, degree as usize)
}

/// Revolves a sketched profile. Returns `{vertices, indices, vertexCount,
/// triangleCount, diagnostics}` with `vertices` as packed `f32` triples.
#[wasm_bindgen]
pub fn revolve_surface(request: JsValue) -> Result<JsValue, JsValue> {
    let request: RevolveRequest = from_js_or_default(request)?;
    let surface = build_revolve_surface(&request).map_err(|err| js_error(&err))?;
    to_js(&surface)
}

#[wasm_bindgen]
pub fn revolve_surface_obj(request: JsValue) -> Result<String, JsValue> {
    let request: RevolveRequest = from_js_or_default(request)?;
    let (mesh, _) = build_revolve_mesh(&request).map_err(|err| js_error(&err))?;
    Ok(export::mesh_to_obj(&mesh))
}

/// Spiral control points and the smoothed path.
#[wasm_bindgen]
pub fn spiral_trajectory(spiral: JsValue, smooth: JsValue) -> Result<JsValue, JsValue> {
    let spiral: SpiralOptions = from_js_or_default(spiral)?;
    let smooth: SmoothOptions = from_js_or_default(smooth)?;
    let export = build_trajectory(&spiral, &smooth).map_err(|err| js_error(&err))?;
    to_js(&export)
}

/// JSON curve document for `kind` (`"bezier"` or `"bspline"`).
#[wasm_bindgen]
pub fn export_curve_json(points: JsValue, kind: &str, degree: u32) -> Result<String, JsValue> {
    let points = points_from_js(points)?;
    let json = match kind {
        "bezier" => export::export_bezier_json(&points),
        "bspline" => export::export_bspline_json(&points, degree as usize, BSplineSampling::default().step()),
        other => return Err(js_error(&format!("unknown curve type '{other}'"))),
    };
    json.map_err(to_js_error)
}

#[derive(Debug, Serialize)]
struct ImportedCurveExport {
    curve: ProfileCurve,
    degree: usize,
    points: Vec<ControlPoint>,
}

#[wasm_bindgen]
pub fn import_curve_json(json: &str) -> Result<JsValue, JsValue> {
    let imported = export::import_curve_json(json).map_err(to_js_error)?;
    to_js(&ImportedCurveExport {
        curve: imported.curve,
        degree: imported.degree,
        points: imported.points.into(),
    })
}

/// Stateful flight playback over a generated spiral.
#[wasm_bindgen]
pub struct FlightSession {
    player: FlightPlayer,
}

#[wasm_bindgen]
impl FlightSession {
    #[wasm_bindgen(constructor)]
    pub fn new(spiral: JsValue, smooth: JsValue, options: JsValue) -> Result<FlightSession, JsValue> {
        let spiral: SpiralOptions = from_js_or_default(spiral)?;
        let smooth: SmoothOptions = from_js_or_default(smooth)?;
        let options: FlightOptions = from_js_or_default(options)?;
        let trajectory = generate_trajectory(&spiral, &smooth).map_err(to_js_error)?;
        Ok(Self::from_trajectory(trajectory, options))
    }

    pub fn start(&mut self) {
        self.player.start();
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    pub fn reset(&mut self) {
        self.player.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn flying(&self) -> bool {
        self.player.is_flying()
    }

    /// Advances by `speed`; returns the pose or `null` once landed.
    pub fn advance(&mut self, speed: f64) -> Result<JsValue, JsValue> {
        match self.player.advance(speed) {
            Some(pose) => to_js(&pose),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn status(&self) -> Result<JsValue, JsValue> {
        to_js(&self.player.status())
    }

    /// Path samples as packed `[x, y, z, ...]`.
    pub fn points(&self) -> Vec<f64> {
        self.player.trajectory().points().iter().flat_map(|p| p.to_array()).collect()
    }
}

impl FlightSession {
    #[must_use]
    pub fn from_trajectory(trajectory: Trajectory, options: FlightOptions) -> Self {
        Self { player: FlightPlayer::with_options(trajectory, options) }
    }

    #[must_use]
    pub fn player(&self) -> &FlightPlayer {
        &self.player
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
