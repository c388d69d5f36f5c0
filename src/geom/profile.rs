//! Builds the 2D revolve profile from a control polygon.

use serde::{Deserialize, Serialize};

use super::bezier::generate_bezier_curve;
use super::bspline::{BSplineSampling, generate_bspline_curve};
use super::core::Point2;
use super::points::ControlPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileCurve {
    #[default]
    Bezier,
    #[serde(alias = "b-spline")]
    BSpline,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOptions {
    pub curve: ProfileCurve,
    pub bezier_steps: usize,
    pub bspline_degree: usize,
    pub bspline_sampling: BSplineSampling,
    /// Use the Bézier profile when the control polygon is too short for the
    /// requested B-spline degree.
    pub fallback_to_bezier: bool,
}

impl ProfileOptions {
    #[must_use]
    pub const fn bezier() -> Self {
        Self {
            curve: ProfileCurve::Bezier,
            bezier_steps: 100,
            bspline_degree: 3,
            bspline_sampling: BSplineSampling::new(200, 100),
            fallback_to_bezier: false,
        }
    }

    #[must_use]
    pub const fn bspline() -> Self {
        Self { curve: ProfileCurve::BSpline, ..Self::bezier() }
    }
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self::bezier()
    }
}

/// Maps sketch canvas pixels to revolve units: origin at the canvas centre,
/// y pointing up, `pixels_per_unit` pixels per unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasFrame {
    pub width: f64,
    pub height: f64,
    pub pixels_per_unit: f64,
}

impl CanvasFrame {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height, pixels_per_unit: 50.0 }
    }

    #[must_use]
    pub fn to_world(&self, p: Point2) -> Point2 {
        Point2::new(
            (p.x - self.width / 2.0) / self.pixels_per_unit,
            -(p.y - self.height / 2.0) / self.pixels_per_unit,
        )
    }

    #[must_use]
    pub fn to_canvas(&self, p: Point2) -> Point2 {
        Point2::new(
            p.x * self.pixels_per_unit + self.width / 2.0,
            -p.y * self.pixels_per_unit + self.height / 2.0,
        )
    }

    #[must_use]
    pub fn map_to_world(&self, points: &[Point2]) -> Vec<Point2> {
        points.iter().map(|&p| self.to_world(p)).collect()
    }
}

impl Default for CanvasFrame {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Evaluates the profile curve for a revolve.
///
/// Fewer than two control points give an empty profile. The Bézier profile
/// treats every weight as 1.0.
#[must_use]
pub fn generate_profile(points: &[ControlPoint], options: &ProfileOptions) -> Vec<Point2> {
    if points.len() < 2 {
        return Vec::new();
    }

    let bezier = || {
        let unweighted: Vec<ControlPoint> = points.iter().map(|p| ControlPoint::new(p.x, p.y)).collect();
        generate_bezier_curve(&unweighted, options.bezier_steps)
    };

    match options.curve {
        ProfileCurve::Bezier => bezier(),
        ProfileCurve::BSpline => {
            let profile = generate_bspline_curve(points, options.bspline_degree, &options.bspline_sampling);
            if profile.is_empty() && options.fallback_to_bezier {
                log::debug!(
                    "profile: b-spline of degree {} empty for {} points, using bezier",
                    options.bspline_degree,
                    points.len()
                );
                bezier()
            } else {
                profile
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_polygon_gives_empty_profile() {
        let pts = [ControlPoint::new(1.0, 1.0)];
        assert!(generate_profile(&pts, &ProfileOptions::bezier()).is_empty());
        assert!(generate_profile(&pts, &ProfileOptions::bspline()).is_empty());
    }

    #[test]
    fn bezier_profile_ignores_weights() {
        let weighted = [
            ControlPoint::new(0.0, 0.0),
            ControlPoint::weighted(2.0, 3.0, 8.0),
            ControlPoint::new(4.0, 0.0),
        ];
        let plain = [ControlPoint::new(0.0, 0.0), ControlPoint::new(2.0, 3.0), ControlPoint::new(4.0, 0.0)];
        let options = ProfileOptions::bezier();
        let profile = generate_profile(&weighted, &options);
        assert_eq!(profile.len(), 101);
        assert_eq!(profile, generate_profile(&plain, &options));
    }

    #[test]
    fn bspline_fallback_is_opt_in() {
        let pts = [ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 2.0), ControlPoint::new(2.0, 0.0)];
        assert!(generate_profile(&pts, &ProfileOptions::bspline()).is_empty());

        let options = ProfileOptions { fallback_to_bezier: true, ..ProfileOptions::bspline() };
        assert_eq!(generate_profile(&pts, &options).len(), 101);
    }

    #[test]
    fn canvas_frame_centres_and_flips() {
        let frame = CanvasFrame::new(400.0, 300.0);
        assert_eq!(frame.to_world(Point2::new(200.0, 150.0)), Point2::new(0.0, 0.0));
        assert_eq!(frame.to_world(Point2::new(250.0, 50.0)), Point2::new(1.0, 2.0));
        assert_eq!(frame.to_canvas(Point2::new(1.0, 2.0)), Point2::new(250.0, 50.0));
    }

    #[test]
    fn options_deserialize_from_partial_object() {
        let options: ProfileOptions = serde_json::from_str(r#"{"curve":"bspline","bspline_degree":2}"#).unwrap();
        assert_eq!(options.curve, ProfileCurve::BSpline);
        assert_eq!(options.bspline_degree, 2);
        assert_eq!(options.bezier_steps, 100);
    }
}
