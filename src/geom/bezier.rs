//! Rational Bézier evaluation.
//!
//! Points are lifted to homogeneous coordinates `(x·w, y·w, w)` and collapsed
//! with de Casteljau's algorithm on all three channels, then projected back.

use super::core::Point2;
use super::curve::{Curve2, tessellate_curve2_uniform};
use super::points::ControlPoint;

/// Homogeneous planar point `(x·w, y·w, w)`.
#[derive(Debug, Clone, Copy)]
struct HPoint3 {
    x: f64,
    y: f64,
    w: f64,
}

impl HPoint3 {
    fn from_control(p: ControlPoint) -> Self {
        Self { x: p.x * p.weight, y: p.y * p.weight, w: p.weight }
    }

    fn lerp(self, rhs: Self, t: f64) -> Self {
        let s = 1.0 - t;
        Self {
            x: self.x * s + rhs.x * t,
            y: self.y * s + rhs.y * t,
            w: self.w * s + rhs.w * t,
        }
    }

    fn to_point2(self) -> Option<Point2> {
        if !self.w.is_finite() || self.w == 0.0 {
            return None;
        }
        let p = Point2::new(self.x / self.w, self.y / self.w);
        p.is_finite().then_some(p)
    }
}

/// Evaluates the rational Bézier curve defined by `points` at `t`.
///
/// A single control point is returned verbatim regardless of its weight.
/// Returns `None` for an empty slice, when the collapsed weight is zero, or
/// when the result is not finite.
#[must_use]
pub fn rational_bezier_point(points: &[ControlPoint], t: f64) -> Option<Point2> {
    match points {
        [] => None,
        [only] => Some(only.position()).filter(|p| p.is_finite()),
        _ => {
            let mut work: Vec<HPoint3> = points.iter().copied().map(HPoint3::from_control).collect();
            for level in (1..work.len()).rev() {
                for k in 0..level {
                    work[k] = work[k].lerp(work[k + 1], t);
                }
            }
            work[0].to_point2()
        }
    }
}

/// Samples the curve at `t = i / steps` for `i = 0..=steps`.
///
/// `steps` is clamped to at least 1. Parameters whose evaluation degenerates
/// are skipped, so the result may be shorter than `steps + 1`.
#[must_use]
pub fn generate_bezier_curve(points: &[ControlPoint], steps: usize) -> Vec<Point2> {
    if points.is_empty() {
        return Vec::new();
    }
    let curve = RationalBezier::new(points);
    let sampled = tessellate_curve2_uniform(&curve, steps);
    if sampled.len() < steps.max(1) + 1 {
        log::debug!(
            "bezier: {} of {} samples degenerated (zero homogeneous weight)",
            steps.max(1) + 1 - sampled.len(),
            steps.max(1) + 1
        );
    }
    sampled
}

/// Borrowed view of a control polygon evaluated as a rational Bézier curve.
#[derive(Debug, Clone, Copy)]
pub struct RationalBezier<'a> {
    points: &'a [ControlPoint],
}

impl<'a> RationalBezier<'a> {
    #[must_use]
    pub const fn new(points: &'a [ControlPoint]) -> Self {
        Self { points }
    }

    #[must_use]
    pub const fn degree(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    #[must_use]
    pub const fn control_points(&self) -> &'a [ControlPoint] {
        self.points
    }
}

impl Curve2 for RationalBezier<'_> {
    fn point_at(&self, t: f64) -> Option<Point2> {
        rational_bezier_point(self.points, t)
    }
}
