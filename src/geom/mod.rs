mod bezier;
mod bspline;
mod catmull_rom;
mod core;
mod curve;
mod diagnostics;
mod flight;
mod mesh;
mod points;
mod profile;
mod revolve;
mod trajectory;

pub use bezier::{RationalBezier, generate_bezier_curve, rational_bezier_point};
pub use bspline::{
    BSplineSampling, BasisTable, ClampedBSpline, KnotVector, basis_function, bspline_point,
    clamped_uniform_knots, generate_bspline_curve,
};
pub use catmull_rom::{CatmullRomCurve3, CatmullRomKind, catmull_rom_point, segment_direction};
pub use core::{BBox, Point2, Point3, Tolerance, Vec3};
pub use curve::{Curve2, Curve3, tessellate_curve2_uniform, tessellate_curve3_uniform};
pub use diagnostics::GeomMeshDiagnostics;
pub use flight::{FlightOptions, FlightPlayer, FlightPose, FlightState, FlightStatus};
pub use mesh::GeomMesh;
pub use points::{ControlPoint, MIN_WEIGHT, PointSequence, PointSetError};
pub use profile::{CanvasFrame, ProfileCurve, ProfileOptions, generate_profile};
pub use revolve::{RadiusMode, RevolveAxis, RevolveError, RevolveOptions, revolve_profile};
pub use trajectory::{
    FlightDirection, GOLDEN_ANGLE, MAX_CYCLES, PHI, SmoothOptions, SpiralError, SpiralOptions, Trajectory,
    fibonacci_radii, generate_spiral_control_points, generate_trajectory, smooth_trajectory,
};

#[cfg(test)]
mod tests;
