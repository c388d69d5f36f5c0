//! Surface of revolution from a planar profile.
//!
//! The profile `(a, b)` is swept about one of the world axes. Ring `i` holds
//! the profile rotated by `i · angle / segments` and occupies vertex range
//! `[i·L, i·L + L)`. Each quad between ring `i` and ring `i + 1` becomes the
//! triangles `(a, b, c)` and `(b, d, c)` with `a = i·L + j`, `b = a + L`,
//! `c = a + 1`, `d = b + 1`. Nothing is culled or reordered.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::core::{Point2, Tolerance};
use super::diagnostics::GeomMeshDiagnostics;
use super::mesh::{GeomMesh, count_degenerate_triangles, count_edge_topology};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevolveAxis {
    X,
    #[default]
    Y,
    Z,
}

/// How the radial distance is taken from the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadiusMode {
    /// `r = |coordinate|`: profiles mirrored across the axis give the same surface.
    #[default]
    Folded,
    /// `r = coordinate`: points on the far side of the axis sweep the
    /// opposite half-turn.
    Signed,
}

impl RadiusMode {
    fn apply(self, coordinate: f64) -> f64 {
        match self {
            Self::Folded => coordinate.abs(),
            Self::Signed => coordinate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevolveOptions {
    pub axis: RevolveAxis,
    /// Sweep angle in degrees.
    pub angle_degrees: f64,
    /// Number of angular steps; the mesh has `segments + 1` rings.
    pub segments: usize,
    pub radius_mode: RadiusMode,
    /// For a full turn, reuse ring 0 instead of emitting a duplicate seam ring.
    pub weld_seam: bool,
}

impl RevolveOptions {
    #[must_use]
    pub const fn new(axis: RevolveAxis, angle_degrees: f64, segments: usize) -> Self {
        Self {
            axis,
            angle_degrees,
            segments,
            radius_mode: RadiusMode::Folded,
            weld_seam: false,
        }
    }

    #[must_use]
    pub fn is_full_turn(&self) -> bool {
        Tolerance::DEFAULT.approx_eq_f64(self.angle_degrees.abs(), 360.0)
    }
}

impl Default for RevolveOptions {
    fn default() -> Self {
        Self::new(RevolveAxis::Y, 360.0, 32)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RevolveError {
    #[error("revolve needs at least one segment")]
    ZeroSegments,
    #[error("revolve angle must be finite, got {angle}")]
    InvalidAngle { angle: f64 },
    #[error("profile point {index} is not finite")]
    NonFinitePoint { index: usize },
    #[error("revolved mesh would need {count} vertices, more than u32 indices can address")]
    TooManyVertices { count: usize },
}

/// Maps a profile point to 3D at the ring whose rotation is `(cos, sin)`.
fn place(axis: RevolveAxis, mode: RadiusMode, p: Point2, cos: f64, sin: f64) -> [f64; 3] {
    match axis {
        RevolveAxis::Y => {
            let r = mode.apply(p.x);
            [r * cos, p.y, r * sin]
        }
        RevolveAxis::X => {
            let r = mode.apply(p.y);
            [p.x, r * cos, r * sin]
        }
        RevolveAxis::Z => {
            let r = mode.apply(p.x);
            [r * cos, r * sin, p.y]
        }
    }
}

fn radial_coordinate(axis: RevolveAxis, p: Point2) -> f64 {
    match axis {
        RevolveAxis::X => p.y,
        RevolveAxis::Y | RevolveAxis::Z => p.x,
    }
}

#[cfg(feature = "parallel")]
fn fill_rings(positions: &mut [[f64; 3]], profile: &[Point2], options: &RevolveOptions, angle_step: f64) {
    positions
        .par_chunks_mut(profile.len())
        .enumerate()
        .for_each(|(ring, slots)| fill_ring(slots, profile, options, ring as f64 * angle_step));
}

#[cfg(not(feature = "parallel"))]
fn fill_rings(positions: &mut [[f64; 3]], profile: &[Point2], options: &RevolveOptions, angle_step: f64) {
    positions
        .chunks_mut(profile.len())
        .enumerate()
        .for_each(|(ring, slots)| fill_ring(slots, profile, options, ring as f64 * angle_step));
}

fn fill_ring(slots: &mut [[f64; 3]], profile: &[Point2], options: &RevolveOptions, theta: f64) {
    let (sin, cos) = theta.sin_cos();
    for (slot, &p) in slots.iter_mut().zip(profile) {
        *slot = place(options.axis, options.radius_mode, p, cos, sin);
    }
}

fn strip_indices(segments: usize, profile_len: usize, wrap_last: bool) -> Vec<u32> {
    let mut indices = Vec::with_capacity(segments * (profile_len - 1) * 6);
    for i in 0..segments {
        let next_ring = if wrap_last && i + 1 == segments { 0 } else { i + 1 };
        for j in 0..profile_len - 1 {
            let a = (i * profile_len + j) as u32;
            let b = (next_ring * profile_len + j) as u32;
            let c = a + 1;
            let d = b + 1;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    indices
}

/// Sweeps `profile` about `options.axis`.
///
/// Returns `(S + 1) · L` vertices and `2 · S · (L − 1)` triangles, or `S · L`
/// vertices when the seam is welded on a full turn. A profile with fewer than
/// two points yields an empty mesh and a warning.
///
/// # Errors
///
/// [`RevolveError`] for zero segments, a non-finite angle or profile point, or
/// a vertex count that overflows `u32` indices.
pub fn revolve_profile(
    profile: &[Point2],
    options: &RevolveOptions,
) -> Result<(GeomMesh, GeomMeshDiagnostics), RevolveError> {
    if options.segments == 0 {
        return Err(RevolveError::ZeroSegments);
    }
    if !options.angle_degrees.is_finite() {
        return Err(RevolveError::InvalidAngle { angle: options.angle_degrees });
    }
    if let Some(index) = profile.iter().position(|p| !p.is_finite()) {
        return Err(RevolveError::NonFinitePoint { index });
    }

    let mut diagnostics = GeomMeshDiagnostics::new();
    if profile.len() < 2 {
        log::warn!("revolve: profile has {} point(s), nothing to sweep", profile.len());
        diagnostics.add_warning(format!("profile has {} point(s); at least 2 are required", profile.len()));
        return Ok((GeomMesh::empty(), diagnostics));
    }

    let segments = options.segments;
    let profile_len = profile.len();
    let weld = options.weld_seam && options.is_full_turn();
    let ring_count = if weld { segments } else { segments + 1 };
    let vertex_count = ring_count
        .checked_mul(profile_len)
        .filter(|&n| u32::try_from(n).is_ok())
        .ok_or(RevolveError::TooManyVertices { count: ring_count.saturating_mul(profile_len) })?;

    let angle_step = options.angle_degrees.to_radians() / segments as f64;
    let mut positions = vec![[0.0; 3]; vertex_count];
    fill_rings(&mut positions, profile, options, angle_step);

    let indices = strip_indices(segments, profile_len, weld);
    let mesh = GeomMesh::new(positions, indices);

    diagnostics.vertex_count = mesh.vertex_count();
    diagnostics.triangle_count = mesh.triangle_count();
    if weld {
        diagnostics.welded_vertex_count = profile_len;
    }
    diagnostics.axis_vertex_count = profile
        .iter()
        .filter(|&&p| Tolerance::DEFAULT.approx_zero_f64(radial_coordinate(options.axis, p)))
        .count();
    diagnostics.degenerate_triangle_count =
        count_degenerate_triangles(&mesh.positions, &mesh.indices, Tolerance::ZERO_LENGTH);
    let (open, non_manifold) = count_edge_topology(&mesh.indices);
    diagnostics.open_edge_count = open;
    diagnostics.non_manifold_edge_count = non_manifold;

    if options.radius_mode == RadiusMode::Folded
        && profile.iter().any(|&p| radial_coordinate(options.axis, p) < 0.0)
        && profile.iter().any(|&p| radial_coordinate(options.axis, p) > 0.0)
    {
        diagnostics.add_warning("profile crosses the axis; radii were folded");
    }

    log::debug!("revolve: {:?} axis, {segments} segments -> {}", options.axis, diagnostics.summary());
    Ok((mesh, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_profile() -> Vec<Point2> {
        vec![Point2::new(1.0, 0.0), Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)]
    }

    #[test]
    fn strip_wraps_to_first_ring() {
        let indices = strip_indices(2, 2, true);
        assert_eq!(indices, vec![0, 2, 1, 2, 3, 1, 2, 0, 3, 0, 1, 3]);
    }

    #[test]
    fn radius_modes() {
        assert_eq!(RadiusMode::Folded.apply(-2.0), 2.0);
        assert_eq!(RadiusMode::Signed.apply(-2.0), -2.0);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: RevolveOptions = serde_json::from_str(r#"{"axis":"x","segments":8}"#).unwrap();
        assert_eq!(options.axis, RevolveAxis::X);
        assert_eq!(options.segments, 8);
        assert_eq!(options.angle_degrees, 360.0);
        assert_eq!(options.radius_mode, RadiusMode::Folded);
    }

    #[test]
    fn rejects_invalid_parameters() {
        let profile = line_profile();
        let zero = RevolveOptions { segments: 0, ..Default::default() };
        assert_eq!(revolve_profile(&profile, &zero).unwrap_err(), RevolveError::ZeroSegments);

        let nan = RevolveOptions { angle_degrees: f64::NAN, ..Default::default() };
        assert!(matches!(revolve_profile(&profile, &nan), Err(RevolveError::InvalidAngle { .. })));

        let bad = vec![Point2::new(0.0, 0.0), Point2::new(f64::INFINITY, 1.0)];
        assert_eq!(
            revolve_profile(&bad, &RevolveOptions::default()).unwrap_err(),
            RevolveError::NonFinitePoint { index: 1 }
        );
    }

    #[test]
    fn crossing_profile_is_reported() {
        let profile = vec![Point2::new(-1.0, 0.0), Point2::new(1.0, 1.0)];
        let (_, diag) = revolve_profile(&profile, &RevolveOptions::default()).unwrap();
        assert!(diag.warnings.iter().any(|w| w.contains("crosses the axis")));
    }
}
