use super::core::{Point2, Point3};

/// A planar parametric curve.
///
/// Evaluation is fallible: degenerate inputs (empty control sets, zero
/// homogeneous weights, non-finite basis values) yield `None` instead of
/// propagating NaN to the caller.
pub trait Curve2 {
    fn point_at(&self, t: f64) -> Option<Point2>;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

/// A spatial parametric curve.
pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

/// Samples `steps + 1` parameters evenly across the curve domain, both ends
/// included. Parameters that fail to evaluate are skipped.
#[must_use]
pub fn tessellate_curve2_uniform(curve: &impl Curve2, steps: usize) -> Vec<Point2> {
    let steps = steps.max(1);
    let (a, b) = curve.domain();
    let span = b - a;
    (0..=steps)
        .filter_map(|i| {
            let t = if i == steps { b } else { a + span * (i as f64 / steps as f64) };
            curve.point_at(t)
        })
        .collect()
}

/// Samples `divisions + 1` points evenly across the curve domain.
#[must_use]
pub fn tessellate_curve3_uniform(curve: &impl Curve3, divisions: usize) -> Vec<Point3> {
    let divisions = divisions.max(1);
    let (a, b) = curve.domain();
    let span = b - a;
    (0..=divisions)
        .map(|i| curve.point_at(a + span * (i as f64 / divisions as f64)))
        .collect()
}
