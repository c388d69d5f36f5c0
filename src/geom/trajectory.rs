//! Golden-angle spiral flight path.
//!
//! Control points follow a Fibonacci-radius spiral that climbs for the first
//! half of the cycles and descends (never below ground) for the rest. The
//! polyline is then smoothed with a Catmull-Rom spline.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::catmull_rom::{CatmullRomCurve3, CatmullRomKind};
use super::core::Point3;

/// Golden ratio φ.
pub const PHI: f64 = 1.618_033_988_749_895;

/// `2π / φ²`, about 137.5°.
pub const GOLDEN_ANGLE: f64 = TAU / (PHI * PHI);

/// Above this the Fibonacci terms overflow `f64`.
pub const MAX_CYCLES: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightDirection {
    /// Counter-clockwise seen from above.
    #[default]
    Left,
    Right,
}

impl FlightDirection {
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SpiralError {
    #[error("cycle count {cycles} exceeds the maximum of {max}")]
    TooManyCycles { cycles: usize, max: usize },
    #[error("{name} must be finite and >= 0, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralOptions {
    pub cycles: usize,
    pub direction: FlightDirection,
    /// Altitude gained per climb step.
    pub climb_rate: f64,
    /// Altitude lost per descent step.
    pub descent_rate: f64,
    /// Radius of the outermost step (`K`).
    pub radius_scale: f64,
    /// Exponent applied to the normalised Fibonacci term.
    pub radius_exponent: f64,
}

impl SpiralOptions {
    #[must_use]
    pub const fn new(cycles: usize, direction: FlightDirection) -> Self {
        Self {
            cycles,
            direction,
            climb_rate: 0.5,
            descent_rate: 0.5,
            radius_scale: 20.0,
            radius_exponent: 0.5,
        }
    }

    #[must_use]
    pub const fn climb_steps(&self) -> usize {
        self.cycles / 2
    }

    pub fn validate(&self) -> Result<(), SpiralError> {
        if self.cycles > MAX_CYCLES {
            return Err(SpiralError::TooManyCycles { cycles: self.cycles, max: MAX_CYCLES });
        }
        for (name, value) in [
            ("climb_rate", self.climb_rate),
            ("descent_rate", self.descent_rate),
            ("radius_scale", self.radius_scale),
            ("radius_exponent", self.radius_exponent),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SpiralError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

impl Default for SpiralOptions {
    fn default() -> Self {
        Self::new(50, FlightDirection::Left)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothOptions {
    pub kind: CatmullRomKind,
    pub tension: f64,
    /// Output divisions per control point.
    pub samples_per_point: usize,
}

impl SmoothOptions {
    #[must_use]
    pub const fn new(samples_per_point: usize) -> Self {
        Self { kind: CatmullRomKind::Cardinal, tension: 0.5, samples_per_point }
    }
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self::new(20)
    }
}

/// `len` Fibonacci terms seeded `0, 1`.
fn fibonacci(len: usize) -> Vec<f64> {
    let mut seq = Vec::with_capacity(len);
    for i in 0..len {
        let next = match i {
            0 => 0.0,
            1 => 1.0,
            _ => seq[i - 1] + seq[i - 2],
        };
        seq.push(next);
    }
    seq
}

/// Spiral radii for steps `1..=cycles`.
#[must_use]
pub fn fibonacci_radii(options: &SpiralOptions) -> Vec<f64> {
    let fib = fibonacci(options.cycles + 1);
    let Some(&last) = fib.last().filter(|&&f| f > 0.0) else {
        return Vec::new();
    };
    fib[1..]
        .iter()
        .map(|&f| (f / last).powf(options.radius_exponent) * options.radius_scale)
        .collect()
}

/// One control point per cycle: `(r_k cos θ_k, altitude_k, r_k sin θ_k)`.
///
/// Invalid options (see [`SpiralOptions::validate`]) produce no points.
#[must_use]
pub fn generate_spiral_control_points(options: &SpiralOptions) -> Vec<Point3> {
    if let Err(err) = options.validate() {
        log::warn!("spiral: {err}");
        return Vec::new();
    }

    let climb_steps = options.climb_steps();
    let step_angle = options.direction.sign() * GOLDEN_ANGLE;
    let mut angle = 0.0;
    let mut altitude: f64 = 0.0;

    fibonacci_radii(options)
        .into_iter()
        .enumerate()
        .map(|(i, radius)| {
            angle += step_angle;
            if i < climb_steps {
                altitude += options.climb_rate;
            } else {
                altitude = (altitude - options.descent_rate).max(0.0);
            }
            let (sin, cos) = angle.sin_cos();
            Point3::new(radius * cos, altitude, radius * sin)
        })
        .collect()
}

/// Resamples `points` along a Catmull-Rom spline.
///
/// Returns `samples_per_point · n + 1` points, or the input unchanged when it
/// has fewer than four points.
#[must_use]
pub fn smooth_trajectory(points: &[Point3], options: &SmoothOptions) -> Vec<Point3> {
    if points.len() < 4 {
        return points.to_vec();
    }
    let divisions = points.len() * options.samples_per_point;
    CatmullRomCurve3::with_kind(points.to_vec(), options.kind, options.tension).sample(divisions)
}

/// Sampled flight path with cumulative arc length.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Trajectory {
    points: Vec<Point3>,
    arc_lengths: Vec<f64>,
}

impl Trajectory {
    #[must_use]
    pub fn from_points(points: Vec<Point3>) -> Self {
        let mut arc_lengths = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += p.distance_to(points[i - 1]);
            }
            arc_lengths.push(total);
        }
        Self { points, arc_lengths }
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Distance travelled from the first sample to each sample.
    #[must_use]
    pub fn arc_lengths(&self) -> &[f64] {
        &self.arc_lengths
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
    pub fn total_length(&self) -> f64 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn max_altitude(&self) -> f64 {
        self.points.iter().map(|p| p.y).fold(0.0, f64::max)
    }

    /// Point at arc length `distance`, clamped to the path. `None` for an
    /// empty path or a NaN distance.
    #[must_use]
    pub fn point_at_distance(&self, distance: f64) -> Option<Point3> {
        if distance.is_nan() {
            return None;
        }
        let first = *self.points.first()?;
        if distance <= 0.0 || self.points.len() == 1 {
            return Some(first);
        }
        let upper = self.arc_lengths.partition_point(|&s| s < distance);
        if upper >= self.points.len() {
            return self.points.last().copied();
        }
        let (s0, s1) = (self.arc_lengths[upper - 1], self.arc_lengths[upper]);
        let t = if s1 > s0 { (distance - s0) / (s1 - s0) } else { 0.0 };
        Some(self.points[upper - 1].lerp(self.points[upper], t))
    }
}

/// Spiral control points followed by smoothing.
///
/// # Errors
///
/// [`SpiralError`] when the spiral options are out of range.
pub fn generate_trajectory(spiral: &SpiralOptions, smooth: &SmoothOptions) -> Result<Trajectory, SpiralError> {
    spiral.validate()?;
    let control = generate_spiral_control_points(spiral);
    let smoothed = smooth_trajectory(&control, smooth);
    log::debug!(
        "trajectory: {} cycles ({:?}) -> {} control points, {} samples",
        spiral.cycles,
        spiral.direction,
        control.len(),
        smoothed.len()
    );
    Ok(Trajectory::from_points(smoothed))
}
