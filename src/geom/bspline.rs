//! Clamped uniform B-spline evaluation.
//!
//! The knot vector is rebuilt from `(point count, degree)` on every call and
//! the basis is evaluated with a triangular table ([`BasisTable`]). The
//! recursive Cox-de Boor form ([`basis_function`]) is kept as the reference.
//!
//! Control point weights are ignored: the curve is non-rational.

use serde::{Deserialize, Serialize};

use super::core::{Point2, Tolerance};
use super::curve::Curve2;
use super::points::ControlPoint;

// ─────────────────────────────────────────────────────────────────────────────
// Knot vector
// ─────────────────────────────────────────────────────────────────────────────

/// Non-decreasing knot sequence of length `n + p + 1`, clamped at both ends.
/// Serialises as the bare knot list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KnotVector {
    knots: Vec<f64>,
    #[serde(skip)]
    degree: usize,
}

impl KnotVector {
    /// Clamped uniform knots for `count` control points of degree `degree`.
    ///
    /// Knot `i` is `0` for `i <= p`, `n - p` for `i > n`, and `i - p` otherwise.
    /// Returns `None` when `degree >= count` (no valid domain).
    #[must_use]
    pub fn clamped_uniform(count: usize, degree: usize) -> Option<Self> {
        if degree >= count {
            return None;
        }
        let top = (count - degree) as f64;
        let knots = (0..count + degree + 1)
            .map(|i| {
                if i <= degree {
                    0.0
                } else if i > count {
                    top
                } else {
                    (i - degree) as f64
                }
            })
            .collect();
        Some(Self { knots, degree })
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.knots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.knots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    #[must_use]
    pub const fn degree(&self) -> usize {
        self.degree
    }

    /// Number of control points the knots were built for.
    #[must_use]
    pub fn control_count(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// Parameter domain `[knot[p], knot[n]]`.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.control_count()])
    }
}

/// Convenience wrapper returning the raw knot values (empty when invalid).
#[must_use]
pub fn clamped_uniform_knots(count: usize, degree: usize) -> Vec<f64> {
    KnotVector::clamped_uniform(count, degree).map_or_else(Vec::new, |k| k.knots)
}

// ─────────────────────────────────────────────────────────────────────────────
// Basis functions
// ─────────────────────────────────────────────────────────────────────────────

fn knot_ratio(num: f64, denom: f64) -> Option<f64> {
    (denom.abs() > Tolerance::BASIS_DENOMINATOR.eps).then(|| num / denom)
}

/// Recursive Cox-de Boor basis `N_{i,p}(u)` with half-open degree-0 spans.
///
/// Terms whose knot denominator is within [`Tolerance::BASIS_DENOMINATOR`]
/// of zero contribute nothing.
#[must_use]
pub fn basis_function(i: usize, p: usize, u: f64, knots: &[f64]) -> f64 {
    if i + p + 1 >= knots.len() {
        return 0.0;
    }
    if p == 0 {
        return if knots[i] <= u && u < knots[i + 1] { 1.0 } else { 0.0 };
    }

    let left = knot_ratio(u - knots[i], knots[i + p] - knots[i])
        .map_or(0.0, |r| r * basis_function(i, p - 1, u, knots));
    let right = knot_ratio(knots[i + p + 1] - u, knots[i + p + 1] - knots[i + 1])
        .map_or(0.0, |r| r * basis_function(i + 1, p - 1, u, knots));
    left + right
}

/// Tabulated basis values `N_{0..n, p}(u)` for one parameter.
///
/// Degree-0 values are seeded for every knot span and raised one degree at a
/// time in place, so each `N_{i,k}` is computed once. The buffer is reused
/// between calls to [`BasisTable::fill`].
#[derive(Debug, Clone, Default)]
pub struct BasisTable {
    values: Vec<f64>,
    count: usize,
}

impl BasisTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates the basis once, allocating a fresh table.
    #[must_use]
    pub fn evaluate(knots: &[f64], degree: usize, count: usize, u: f64) -> Self {
        let mut table = Self::new();
        table.fill(knots, degree, count, u);
        table
    }

    pub fn fill(&mut self, knots: &[f64], degree: usize, count: usize, u: f64) {
        let spans = knots.len().saturating_sub(1);
        self.values.clear();
        self.values
            .extend((0..spans).map(|i| if knots[i] <= u && u < knots[i + 1] { 1.0 } else { 0.0 }));

        for k in 1..=degree {
            for i in 0..spans.saturating_sub(k) {
                let left = knot_ratio(u - knots[i], knots[i + k] - knots[i])
                    .map_or(0.0, |r| r * self.values[i]);
                let right = knot_ratio(knots[i + k + 1] - u, knots[i + k + 1] - knots[i + 1])
                    .map_or(0.0, |r| r * self.values[i + 1]);
                self.values[i] = left + right;
            }
        }
        self.count = count.min(self.values.len());
    }

    /// `N_{i,p}(u)` for `i < count`.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values[..self.count]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Evaluation
// ─────────────────────────────────────────────────────────────────────────────

/// Sample density for [`generate_bspline_curve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BSplineSampling {
    pub min_samples: usize,
    pub samples_per_span: usize,
}

impl BSplineSampling {
    #[must_use]
    pub const fn new(min_samples: usize, samples_per_span: usize) -> Self {
        Self { min_samples, samples_per_span }
    }

    /// Number of samples for a curve with `span_count` non-empty knot spans.
    #[must_use]
    pub fn sample_count(&self, span_count: usize) -> usize {
        self.min_samples.max(self.samples_per_span.saturating_mul(span_count)).max(2)
    }

    /// Parameter step equivalent to this density (`1 / samples_per_span`).
    #[must_use]
    pub fn step(&self) -> f64 {
        1.0 / self.samples_per_span.max(1) as f64
    }
}

impl Default for BSplineSampling {
    fn default() -> Self {
        Self::new(200, 100)
    }
}

fn has_domain(count: usize, degree: usize) -> bool {
    count >= degree + 2
}

fn combine(points: &[ControlPoint], basis: &[f64]) -> Option<Point2> {
    let mut x = 0.0;
    let mut y = 0.0;
    let mut total = 0.0;
    for (p, &b) in points.iter().zip(basis) {
        if !b.is_finite() {
            return None;
        }
        x += b * p.x;
        y += b * p.y;
        total += b;
    }
    // Outside the half-open domain every basis value is zero.
    if total.abs() <= Tolerance::BASIS_DENOMINATOR.eps {
        return None;
    }
    let point = Point2::new(x, y);
    point.is_finite().then_some(point)
}

/// Evaluates the clamped uniform B-spline of `degree` at parameter `u`.
///
/// Returns `None` when there are fewer than `degree + 2` points, when `u`
/// falls outside `[0, n - p)`, or when the result is not finite.
#[must_use]
pub fn bspline_point(points: &[ControlPoint], degree: usize, u: f64) -> Option<Point2> {
    ClampedBSpline::new(points, degree)?.point_at(u)
}

/// Samples the curve across its whole domain.
///
/// The last sample is taken at `max - DOMAIN_NUDGE` so the half-open basis
/// still covers it. Too few points for `degree` yield an empty curve.
#[must_use]
pub fn generate_bspline_curve(points: &[ControlPoint], degree: usize, sampling: &BSplineSampling) -> Vec<Point2> {
    let Some(curve) = ClampedBSpline::new(points, degree) else {
        log::debug!(
            "bspline: {} control points insufficient for degree {degree}, need {}",
            points.len(),
            degree + 2
        );
        return Vec::new();
    };
    curve.sample(sampling)
}

/// Borrowed control polygon evaluated as a clamped uniform B-spline.
#[derive(Debug, Clone)]
pub struct ClampedBSpline<'a> {
    points: &'a [ControlPoint],
    degree: usize,
    knots: KnotVector,
}

impl<'a> ClampedBSpline<'a> {
    /// Returns `None` unless `points.len() >= degree + 2`.
    #[must_use]
    pub fn new(points: &'a [ControlPoint], degree: usize) -> Option<Self> {
        if !has_domain(points.len(), degree) {
            return None;
        }
        let knots = KnotVector::clamped_uniform(points.len(), degree)?;
        Some(Self { points, degree, knots })
    }

    #[must_use]
    pub const fn degree(&self) -> usize {
        self.degree
    }

    #[must_use]
    pub const fn knots(&self) -> &KnotVector {
        &self.knots
    }

    #[must_use]
    pub const fn span_count(&self) -> usize {
        self.points.len() - self.degree
    }

    /// Evaluates with a caller-provided table to avoid reallocating per sample.
    fn point_with(&self, table: &mut BasisTable, u: f64) -> Option<Point2> {
        table.fill(self.knots.as_slice(), self.degree, self.points.len(), u);
        combine(self.points, table.values())
    }

    #[must_use]
    pub fn sample(&self, sampling: &BSplineSampling) -> Vec<Point2> {
        let (min, max) = Curve2::domain(self);
        let count = sampling.sample_count(self.span_count());
        let last = count - 1;
        let mut table = BasisTable::new();

        let points: Vec<Point2> = (0..count)
            .filter_map(|i| {
                let u = if i == last {
                    max - Tolerance::DOMAIN_NUDGE.eps
                } else {
                    min + (max - min) * (i as f64 / last as f64)
                };
                self.point_with(&mut table, u)
            })
            .collect();

        log::debug!("bspline: degree {} sampled {} of {count} parameters", self.degree, points.len());
        points
    }
}

impl Curve2 for ClampedBSpline<'_> {
    fn point_at(&self, t: f64) -> Option<Point2> {
        let mut table = BasisTable::new();
        self.point_with(&mut table, t)
    }

    fn domain(&self) -> (f64, f64) {
        self.knots.domain()
    }
}
