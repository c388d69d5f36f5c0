//! Open Catmull-Rom spline through a 3D polyline.
//!
//! The curve is parameterised over `[0, 1]` with equal parameter length per
//! segment. End tangents come from phantom points reflected through the first
//! and last control points (`p0 = 2·p1 − p2`).

use serde::{Deserialize, Serialize};

use super::core::{Point3, Vec3};
use super::curve::{Curve3, tessellate_curve3_uniform};

/// Knot spacing used to build segment tangents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatmullRomKind {
    /// Uniform cardinal spline; tangents scaled by `tension`.
    #[default]
    Cardinal,
    /// Non-uniform, knot spacing `|Δp|^0.5`.
    Centripetal,
    /// Non-uniform, knot spacing `|Δp|`.
    Chordal,
}

/// Spacing below this collapses to a neighbouring interval.
const MIN_KNOT_SPACING: f64 = 1e-4;

/// Cubic `c0 + c1·t + c2·t² + c3·t³` through `x0, x1` with end tangents `t0, t1`.
#[derive(Debug, Clone, Copy)]
struct CubicPoly {
    c0: f64,
    c1: f64,
    c2: f64,
    c3: f64,
}

impl CubicPoly {
    fn hermite(x0: f64, x1: f64, t0: f64, t1: f64) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn non_uniform(x0: f64, x1: f64, x2: f64, x3: f64, dt0: f64, dt1: f64, dt2: f64) -> Self {
        let t1 = ((x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1) * dt1;
        let t2 = ((x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2) * dt1;
        Self::hermite(x1, x2, t1, t2)
    }

    fn eval(self, t: f64) -> f64 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

/// Cardinal spline point between `p1` and `p2` at local parameter `t`.
///
/// `tension = 0.5` is the standard Catmull-Rom spline.
#[must_use]
pub fn catmull_rom_point(p0: Point3, p1: Point3, p2: Point3, p3: Point3, t: f64, tension: f64) -> Point3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let tau = tension;

    let b0 = -tau * t3 + 2.0 * tau * t2 - tau * t;
    let b1 = (2.0 - tau) * t3 + (tau - 3.0) * t2 + 1.0;
    let b2 = (tau - 2.0) * t3 + (3.0 - 2.0 * tau) * t2 + tau * t;
    let b3 = tau * t3 - tau * t2;

    Point3::new(
        b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
        b0 * p0.z + b1 * p1.z + b2 * p2.z + b3 * p3.z,
    )
}

fn non_uniform_point(p0: Point3, p1: Point3, p2: Point3, p3: Point3, t: f64, exponent: f64) -> Point3 {
    let spacing = |a: Point3, b: Point3| a.sub_point(b).length_squared().powf(exponent);
    let mut dt1 = spacing(p1, p2);
    if dt1 < MIN_KNOT_SPACING {
        dt1 = 1.0;
    }
    let mut dt0 = spacing(p0, p1);
    if dt0 < MIN_KNOT_SPACING {
        dt0 = dt1;
    }
    let mut dt2 = spacing(p2, p3);
    if dt2 < MIN_KNOT_SPACING {
        dt2 = dt1;
    }

    Point3::new(
        CubicPoly::non_uniform(p0.x, p1.x, p2.x, p3.x, dt0, dt1, dt2).eval(t),
        CubicPoly::non_uniform(p0.y, p1.y, p2.y, p3.y, dt0, dt1, dt2).eval(t),
        CubicPoly::non_uniform(p0.z, p1.z, p2.z, p3.z, dt0, dt1, dt2).eval(t),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatmullRomCurve3 {
    points: Vec<Point3>,
    kind: CatmullRomKind,
    tension: f64,
}

impl CatmullRomCurve3 {
    /// Cardinal spline with tension 0.5.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self::with_kind(points, CatmullRomKind::Cardinal, 0.5)
    }

    #[must_use]
    pub fn with_kind(points: Vec<Point3>, kind: CatmullRomKind, tension: f64) -> Self {
        Self { points, kind, tension }
    }

    #[must_use]
    pub fn control_points(&self) -> &[Point3] {
        &self.points
    }

    fn reflect(anchor: Point3, other: Point3) -> Point3 {
        anchor.add_vec(anchor.sub_point(other))
    }

    /// `divisions + 1` points evenly spaced in parameter.
    #[must_use]
    pub fn sample(&self, divisions: usize) -> Vec<Point3> {
        tessellate_curve3_uniform(self, divisions)
    }
}

impl Curve3 for CatmullRomCurve3 {
    fn point_at(&self, t: f64) -> Point3 {
        let pts = &self.points;
        let l = pts.len();
        match l {
            0 => return Point3::ORIGIN,
            1 => return pts[0],
            _ => {}
        }

        let p = (l - 1) as f64 * t.clamp(0.0, 1.0);
        let mut seg = p.floor() as usize;
        let mut weight = p - seg as f64;
        if seg >= l - 1 {
            seg = l - 2;
            weight = 1.0;
        }

        let p1 = pts[seg];
        let p2 = pts[seg + 1];
        let p0 = if seg > 0 { pts[seg - 1] } else { Self::reflect(pts[0], pts[1]) };
        let p3 = if seg + 2 < l { pts[seg + 2] } else { Self::reflect(pts[l - 1], pts[l - 2]) };

        match self.kind {
            CatmullRomKind::Cardinal => catmull_rom_point(p0, p1, p2, p3, weight, self.tension),
            CatmullRomKind::Centripetal => non_uniform_point(p0, p1, p2, p3, weight, 0.25),
            CatmullRomKind::Chordal => non_uniform_point(p0, p1, p2, p3, weight, 0.5),
        }
    }
}

/// Unit tangent of the polyline segment `a → b`, if it has length.
#[must_use]
pub fn segment_direction(a: Point3, b: Point3) -> Option<Vec3> {
    b.sub_point(a).normalized()
}
