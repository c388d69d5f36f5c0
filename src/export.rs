//! Text exports: Wavefront OBJ for revolved meshes and JSON curve documents.
//!
//! Curve documents use the camelCase field names of the sketching front end:
//!
//! ```json
//! { "type": "bezier", "degree": 2, "controlPoints": [{"x": 0, "y": 0}, ...],
//!   "weights": [1, 2, 1], "timestamp": "2024-05-01T12:00:00.000Z" }
//! ```

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::geom::{GeomMesh, Point2, PointSequence, PointSetError, ProfileCurve, clamped_uniform_knots};

pub const OBJ_HEADER: &str = "# Generated by Revolution Surface";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("invalid curve JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("invalid control points: {0}")]
    Points(#[from] PointSetError),
}

/// Renders `mesh` as OBJ text: one `v` line per vertex (six decimals) and one
/// 1-based `f` line per triangle.
#[must_use]
pub fn mesh_to_obj(mesh: &GeomMesh) -> String {
    let mut out = String::with_capacity(32 * mesh.vertex_count() + 24 * mesh.triangle_count() + 64);
    out.push_str(OBJ_HEADER);
    out.push_str("\n# Vertices\n");
    for &[x, y, z] in &mesh.positions {
        let (x, y, z) = (unsigned_zero(x), unsigned_zero(y), unsigned_zero(z));
        // Writing to a String cannot fail.
        let _ = writeln!(out, "v {x:.6} {y:.6} {z:.6}");
    }
    out.push_str("\n# Faces\n");
    for [a, b, c] in mesh.triangles() {
        let _ = writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1);
    }
    out
}

/// Maps `-0.0` to `0.0` so on-axis vertices print without a sign.
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// ISO 8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, ExportError> {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    Ok(at.to_offset(UtcOffset::UTC).format(&format)?)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BezierDocument {
    pub degree: usize,
    pub control_points: Vec<Point2>,
    /// Missing or empty means every weight is 1.0.
    #[serde(default)]
    pub weights: Vec<f64>,
    #[serde(default)]
    pub timestamp: String,
}

impl BezierDocument {
    pub fn from_points(points: &PointSequence, at: OffsetDateTime) -> Result<Self, ExportError> {
        Ok(Self {
            degree: points.len().saturating_sub(1),
            control_points: points.positions(),
            weights: points.weights(),
            timestamp: format_timestamp(at)?,
        })
    }

    pub fn to_point_sequence(&self) -> Result<PointSequence, ExportError> {
        let weights = (!self.weights.is_empty()).then_some(self.weights.as_slice());
        Ok(PointSequence::from_parts(&self.control_points, weights)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BSplineDocument {
    pub degree: usize,
    /// Parameter step between samples.
    #[serde(default = "default_step")]
    pub step: f64,
    pub control_points: Vec<Point2>,
    /// Informational; regenerated from the point count and degree on import.
    #[serde(default)]
    pub knot_vector: Vec<f64>,
    #[serde(default)]
    pub timestamp: String,
}

fn default_step() -> f64 {
    0.01
}

impl BSplineDocument {
    pub fn from_points(points: &PointSequence, degree: usize, step: f64, at: OffsetDateTime) -> Result<Self, ExportError> {
        Ok(Self {
            degree,
            step,
            control_points: points.positions(),
            knot_vector: clamped_uniform_knots(points.len(), degree),
            timestamp: format_timestamp(at)?,
        })
    }

    pub fn to_point_sequence(&self) -> Result<PointSequence, ExportError> {
        Ok(PointSequence::from_parts(&self.control_points, None)?)
    }
}

/// Either curve document, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CurveDocument {
    Bezier(BezierDocument),
    BSpline(BSplineDocument),
}

impl CurveDocument {
    #[must_use]
    pub const fn curve(&self) -> ProfileCurve {
        match self {
            Self::Bezier(_) => ProfileCurve::Bezier,
            Self::BSpline(_) => ProfileCurve::BSpline,
        }
    }

    #[must_use]
    pub const fn degree(&self) -> usize {
        match self {
            Self::Bezier(doc) => doc.degree,
            Self::BSpline(doc) => doc.degree,
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> &str {
        match self {
            Self::Bezier(doc) => &doc.timestamp,
            Self::BSpline(doc) => &doc.timestamp,
        }
    }

    /// The document timestamp, if present and valid RFC 3339.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(self.timestamp(), &Rfc3339).ok()
    }

    pub fn to_point_sequence(&self) -> Result<PointSequence, ExportError> {
        match self {
            Self::Bezier(doc) => doc.to_point_sequence(),
            Self::BSpline(doc) => doc.to_point_sequence(),
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Bézier curve document stamped with the current time.
pub fn export_bezier_json(points: &PointSequence) -> Result<String, ExportError> {
    let doc = BezierDocument::from_points(points, OffsetDateTime::now_utc())?;
    CurveDocument::Bezier(doc).to_json()
}

/// B-spline curve document stamped with the current time.
pub fn export_bspline_json(points: &PointSequence, degree: usize, step: f64) -> Result<String, ExportError> {
    let doc = BSplineDocument::from_points(points, degree, step, OffsetDateTime::now_utc())?;
    CurveDocument::BSpline(doc).to_json()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportedCurve {
    pub curve: ProfileCurve,
    pub degree: usize,
    pub points: PointSequence,
}

/// Parses a curve document back into control points.
pub fn import_curve_json(json: &str) -> Result<ImportedCurve, ExportError> {
    let document: CurveDocument = serde_json::from_str(json)?;
    let points = document.to_point_sequence()?;
    log::debug!("import: {:?} curve with {} control points", document.curve(), points.len());
    Ok(ImportedCurve { curve: document.curve(), degree: document.degree(), points })
}
