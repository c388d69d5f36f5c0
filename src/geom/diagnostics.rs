//! Diagnostics reported alongside every generated mesh.
//!
//! The revolve builder never repairs its output: degenerate strips along the
//! axis and the open boundary of a partial sweep are counted here instead of
//! being culled, so the vertex and face layout stays predictable.
//!
//! # Example
//!
//! ```ignore
//! use sketch_engine::geom::{revolve_profile, RevolveOptions};
//!
//! let (mesh, diagnostics) = revolve_profile(&profile, &RevolveOptions::default())?;
//! if !diagnostics.is_watertight() {
//!     eprintln!("{} boundary edges", diagnostics.open_edge_count);
//! }
//! ```

use std::fmt;

use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct GeomMeshDiagnostics {
    pub vertex_count: usize,
    pub triangle_count: usize,

    /// Duplicate seam vertices dropped by `weld_seam` (one ring).
    pub welded_vertex_count: usize,

    /// Triangles with (near) zero area, typically where the profile touches
    /// the axis and a ring collapses to a point. They are kept in the mesh.
    pub degenerate_triangle_count: usize,

    /// Profile samples lying on the axis of revolution.
    pub axis_vertex_count: usize,

    /// Edges used by exactly one triangle. A partial sweep or an open profile
    /// always has some.
    pub open_edge_count: usize,

    /// Edges shared by more than two triangles.
    pub non_manifold_edge_count: usize,

    pub warnings: Vec<String>,
}

impl GeomMeshDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// No degenerate triangles, no non-manifold edges and no warnings.
    /// Open edges are expected for swept profiles and do not count.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.non_manifold_edge_count == 0 && self.degenerate_triangle_count == 0 && self.warnings.is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0 && self.triangle_count == 0
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Short one-line form for logs: `"V:{vertices} T:{triangles} [issues...]"`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} T:{}", self.vertex_count, self.triangle_count)];

        if self.welded_vertex_count > 0 {
            parts.push(format!("welded:{}", self.welded_vertex_count));
        }
        if self.degenerate_triangle_count > 0 {
            parts.push(format!("degenerate:{}", self.degenerate_triangle_count));
        }
        if self.axis_vertex_count > 0 {
            parts.push(format!("on-axis:{}", self.axis_vertex_count));
        }
        if self.open_edge_count > 0 {
            parts.push(format!("open:{}", self.open_edge_count));
        }
        if self.non_manifold_edge_count > 0 {
            parts.push(format!("non-manifold:{}", self.non_manifold_edge_count));
        }
        if !self.warnings.is_empty() {
            parts.push(format!("warnings:{}", self.warnings.len()));
        }

        parts.join(" ")
    }
}

impl fmt::Display for GeomMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;

        if self.welded_vertex_count > 0 {
            writeln!(f, "  Seam welded: {} vertices", self.welded_vertex_count)?;
        }
        if self.degenerate_triangle_count > 0 || self.axis_vertex_count > 0 {
            writeln!(f, "  Degeneracies:")?;
            if self.axis_vertex_count > 0 {
                writeln!(f, "    - Profile samples on axis: {}", self.axis_vertex_count)?;
            }
            if self.degenerate_triangle_count > 0 {
                writeln!(f, "    - Zero-area triangles: {}", self.degenerate_triangle_count)?;
            }
        }
        if self.open_edge_count > 0 || self.non_manifold_edge_count > 0 {
            writeln!(f, "  Topology:")?;
            if self.open_edge_count > 0 {
                writeln!(f, "    - Open edges: {}", self.open_edge_count)?;
            }
            if self.non_manifold_edge_count > 0 {
                writeln!(f, "    - Non-manifold edges: {}", self.non_manifold_edge_count)?;
            }
        }
        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        let status = if self.is_empty() {
            "EMPTY"
        } else if self.is_clean() {
            "CLEAN"
        } else {
            "DEGENERATE"
        };
        writeln!(f, "  Status: {status}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_clean_and_empty() {
        let diag = GeomMeshDiagnostics::default();
        assert!(diag.is_clean());
        assert!(diag.is_empty());
        assert!(diag.is_watertight());
        assert!(!diag.has_warnings());
    }

    #[test]
    fn test_open_edges_do_not_make_unclean() {
        let diag = GeomMeshDiagnostics { vertex_count: 4, triangle_count: 2, open_edge_count: 4, ..Default::default() };
        assert!(!diag.is_watertight());
        assert!(diag.is_clean());
    }

    #[test]
    fn test_summary_lists_only_present_issues() {
        let diag = GeomMeshDiagnostics {
            vertex_count: 99,
            triangle_count: 128,
            axis_vertex_count: 2,
            open_edge_count: 16,
            ..Default::default()
        };
        assert_eq!(diag.summary(), "V:99 T:128 on-axis:2 open:16");
    }

    #[test]
    fn test_display_status() {
        let mut diag = GeomMeshDiagnostics { vertex_count: 3, triangle_count: 1, ..Default::default() };
        assert!(diag.to_string().contains("Status: CLEAN"));
        diag.add_warning("profile touches axis");
        let text = diag.to_string();
        assert!(text.contains("profile touches axis"));
        assert!(text.contains("Status: DEGENERATE"));
        assert!(GeomMeshDiagnostics::new().to_string().contains("Status: EMPTY"));
    }
}
