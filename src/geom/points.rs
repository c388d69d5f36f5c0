//! Control point data model shared by the curve evaluators.
//!
//! A [`PointSequence`] is an owned, ordered list of weighted control points.
//! Its order defines the control polygon. Evaluators never hold on to it:
//! they borrow a snapshot (`&[ControlPoint]`) for the duration of one call.

use serde::{Deserialize, Serialize};

use super::core::Point2;

/// Smallest weight produced by [`ControlPoint::with_clamped_weight`].
pub const MIN_WEIGHT: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

const fn default_weight() -> f64 {
    1.0
}

impl ControlPoint {
    /// Unweighted control point (weight 1.0).
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, weight: 1.0 }
    }

    #[must_use]
    pub const fn weighted(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight }
    }

    /// Builds a control point, clamping a non-positive or non-finite weight
    /// to [`MIN_WEIGHT`].
    #[must_use]
    pub fn with_clamped_weight(x: f64, y: f64, weight: f64) -> Self {
        let weight = if weight.is_finite() { weight.max(MIN_WEIGHT) } else { MIN_WEIGHT };
        Self { x, y, weight }
    }

    #[must_use]
    pub const fn position(self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.weight.is_finite()
    }
}

impl From<Point2> for ControlPoint {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PointSetError {
    #[error("control point weight must be finite and > 0, got {weight}")]
    InvalidWeight { weight: f64 },
    #[error("control point coordinates must be finite")]
    NonFinitePoint,
    #[error("control point index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("weight count {weights} does not match point count {points}")]
    WeightCountMismatch { points: usize, weights: usize },
}

/// Ordered, owned list of control points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ControlPoint>", into = "Vec<ControlPoint>")]
pub struct PointSequence {
    points: Vec<ControlPoint>,
}

impl PointSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sequence from positions and optional weights (1.0 when absent).
    pub fn from_parts(positions: &[Point2], weights: Option<&[f64]>) -> Result<Self, PointSetError> {
        if let Some(weights) = weights {
            if weights.len() != positions.len() {
                return Err(PointSetError::WeightCountMismatch {
                    points: positions.len(),
                    weights: weights.len(),
                });
            }
        }

        let mut sequence = Self { points: Vec::with_capacity(positions.len()) };
        for (i, p) in positions.iter().enumerate() {
            let weight = weights.map_or(1.0, |w| w[i]);
            sequence.push(ControlPoint::weighted(p.x, p.y, weight))?;
        }
        Ok(sequence)
    }

    /// Builds a sequence from already-weighted points, validating each one.
    pub fn from_points(points: impl IntoIterator<Item = ControlPoint>) -> Result<Self, PointSetError> {
        let mut sequence = Self::new();
        for point in points {
            sequence.push(point)?;
        }
        Ok(sequence)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ControlPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<ControlPoint> {
        self.points.get(index).copied()
    }

    pub fn push(&mut self, point: ControlPoint) -> Result<(), PointSetError> {
        validate(point)?;
        self.points.push(point);
        Ok(())
    }

    pub fn insert(&mut self, index: usize, point: ControlPoint) -> Result<(), PointSetError> {
        if index > self.points.len() {
            return Err(PointSetError::IndexOutOfRange { index, len: self.points.len() });
        }
        validate(point)?;
        self.points.insert(index, point);
        Ok(())
    }

    /// Repositions a point, keeping its weight.
    pub fn move_point(&mut self, index: usize, position: Point2) -> Result<(), PointSetError> {
        if !position.is_finite() {
            return Err(PointSetError::NonFinitePoint);
        }
        let len = self.points.len();
        let point = self
            .points
            .get_mut(index)
            .ok_or(PointSetError::IndexOutOfRange { index, len })?;
        point.x = position.x;
        point.y = position.y;
        Ok(())
    }

    pub fn set_weight(&mut self, index: usize, weight: f64) -> Result<(), PointSetError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(PointSetError::InvalidWeight { weight });
        }
        let len = self.points.len();
        let point = self
            .points
            .get_mut(index)
            .ok_or(PointSetError::IndexOutOfRange { index, len })?;
        point.weight = weight;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<ControlPoint, PointSetError> {
        if index >= self.points.len() {
            return Err(PointSetError::IndexOutOfRange { index, len: self.points.len() });
        }
        Ok(self.points.remove(index))
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[must_use]
    pub fn positions(&self) -> Vec<Point2> {
        self.points.iter().map(|p| p.position()).collect()
    }

    #[must_use]
    pub fn weights(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.weight).collect()
    }

    /// Copy of the sequence with every weight reset to 1.0.
    #[must_use]
    pub fn unweighted(&self) -> Self {
        Self {
            points: self.points.iter().map(|p| ControlPoint::new(p.x, p.y)).collect(),
        }
    }
}

impl TryFrom<Vec<ControlPoint>> for PointSequence {
    type Error = PointSetError;

    fn try_from(points: Vec<ControlPoint>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<PointSequence> for Vec<ControlPoint> {
    fn from(sequence: PointSequence) -> Self {
        sequence.points
    }
}

impl AsRef<[ControlPoint]> for PointSequence {
    fn as_ref(&self) -> &[ControlPoint] {
        &self.points
    }
}

fn validate(point: ControlPoint) -> Result<(), PointSetError> {
    if !point.x.is_finite() || !point.y.is_finite() {
        return Err(PointSetError::NonFinitePoint);
    }
    if !point.weight.is_finite() || point.weight <= 0.0 {
        return Err(PointSetError::InvalidWeight { weight: point.weight });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_rejects_non_positive_weight() {
        let mut seq = PointSequence::new();
        assert_eq!(
            seq.push(ControlPoint::weighted(0.0, 0.0, 0.0)),
            Err(PointSetError::InvalidWeight { weight: 0.0 })
        );
        assert!(seq.push(ControlPoint::weighted(0.0, 0.0, -2.0)).is_err());
        assert!(seq.is_empty());
    }

    #[test]
    fn clamped_weight_is_positive() {
        assert_eq!(ControlPoint::with_clamped_weight(1.0, 1.0, -3.0).weight, MIN_WEIGHT);
        assert_eq!(ControlPoint::with_clamped_weight(1.0, 1.0, f64::NAN).weight, MIN_WEIGHT);
        assert_eq!(ControlPoint::with_clamped_weight(1.0, 1.0, 2.5).weight, 2.5);
    }

    #[test]
    fn move_keeps_weight_and_order() {
        let mut seq = PointSequence::from_points([
            ControlPoint::new(0.0, 0.0),
            ControlPoint::weighted(1.0, 1.0, 3.0),
            ControlPoint::new(2.0, 0.0),
        ])
        .unwrap();

        seq.move_point(1, Point2::new(5.0, 6.0)).unwrap();
        assert_eq!(seq.get(1), Some(ControlPoint::weighted(5.0, 6.0, 3.0)));
        assert_eq!(seq.positions()[2], Point2::new(2.0, 0.0));
    }

    #[test]
    fn remove_and_insert_respect_bounds() {
        let mut seq = PointSequence::from_parts(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)], None).unwrap();
        assert!(matches!(seq.remove(5), Err(PointSetError::IndexOutOfRange { index: 5, len: 2 })));
        assert_eq!(seq.remove(0).unwrap(), ControlPoint::new(0.0, 0.0));
        seq.insert(0, ControlPoint::new(-1.0, 0.0)).unwrap();
        assert_eq!(seq.positions(), vec![Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(seq.insert(9, ControlPoint::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn from_parts_checks_weight_count() {
        let positions = [Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];
        assert_eq!(
            PointSequence::from_parts(&positions, Some(&[1.0])),
            Err(PointSetError::WeightCountMismatch { points: 2, weights: 1 })
        );
        let seq = PointSequence::from_parts(&positions, Some(&[1.0, 4.0])).unwrap();
        assert_eq!(seq.weights(), vec![1.0, 4.0]);
        assert_eq!(seq.unweighted().weights(), vec![1.0, 1.0]);
    }

    #[test]
    fn weight_defaults_to_one_when_deserialized() {
        let seq: PointSequence = serde_json::from_str(r#"[{"x":1.0,"y":2.0},{"x":3.0,"y":4.0,"weight":2.0}]"#).unwrap();
        assert_eq!(seq.weights(), vec![1.0, 2.0]);

        let rejected: Result<PointSequence, _> = serde_json::from_str(r#"[{"x":1.0,"y":2.0,"weight":0.0}]"#);
        assert!(rejected.is_err());
    }
}
