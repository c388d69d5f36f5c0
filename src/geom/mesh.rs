use std::collections::HashMap;

use serde::Serialize;

use super::{BBox, Point3, Tolerance, Vec3};

/// Indexed triangle mesh.
///
/// `positions` are stored ring-major by the revolve builder; `indices` is a
/// flat list of triangles (three entries each).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    /// Per-vertex normals, only present after [`GeomMesh::compute_vertex_normals`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<[f64; 3]>>,
}

impl GeomMesh {
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self { positions, indices, normals: None }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.indices.is_empty()
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions.iter().any(|p| p.iter().any(|c| !c.is_finite()))
    }

    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    #[must_use]
    pub fn has_triangle_indices(&self) -> bool {
        self.indices.len() % 3 == 0
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.has_triangle_indices() {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if self.normals.as_ref().is_some_and(|n| n.len() != self.positions.len()) {
            return Err("mesh normal buffer does not match vertex count".to_string());
        }
        Ok(())
    }

    /// Position buffer as a flat slice: `[x0, y0, z0, x1, y1, z1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        self.positions.as_flattened()
    }

    /// Positions narrowed to `f32`, the layout GPU vertex buffers expect.
    #[must_use]
    pub fn vertices_flat(&self) -> Vec<f32> {
        self.positions_flat().iter().map(|&c| c as f32).collect()
    }

    #[must_use]
    pub fn normals_flat(&self) -> Option<&[f64]> {
        self.normals.as_deref().map(<[[f64; 3]]>::as_flattened)
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Option<Point3> {
        self.positions.get(index).copied().map(Point3::from_array)
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    #[must_use]
    pub fn bounds(&self) -> Option<BBox> {
        let points: Vec<Point3> = self.positions.iter().copied().map(Point3::from_array).collect();
        BBox::from_points(&points)
    }

    /// Fills `normals` with area-weighted vertex normals.
    ///
    /// Vertices that only touch zero-area triangles get `[0, 0, 1]`.
    pub fn compute_vertex_normals(&mut self) {
        self.normals = Some(compute_smooth_normals(&self.positions, &self.indices));
    }
}

fn triangle_cross(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Vec3 {
    let ab = Vec3::new(b[0] - a[0], b[1] - a[1], b[2] - a[2]);
    let ac = Vec3::new(c[0] - a[0], c[1] - a[1], c[2] - a[2]);
    ab.cross(ac)
}

fn compute_smooth_normals(positions: &[[f64; 3]], indices: &[u32]) -> Vec<[f64; 3]> {
    let mut sums = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (Some(&a), Some(&b), Some(&c)) = (positions.get(i0), positions.get(i1), positions.get(i2)) else {
            continue;
        };
        let n = triangle_cross(a, b, c);
        sums[i0] = sums[i0] + n;
        sums[i1] = sums[i1] + n;
        sums[i2] = sums[i2] + n;
    }

    sums.into_iter()
        .map(|n| n.normalized().map_or([0.0, 0.0, 1.0], |u| [u.x, u.y, u.z]))
        .collect()
}

/// Counts triangles whose doubled area is within `tol` of zero, including
/// triangles that repeat an index.
pub(crate) fn count_degenerate_triangles(positions: &[[f64; 3]], indices: &[u32], tol: Tolerance) -> usize {
    indices
        .chunks_exact(3)
        .filter(|tri| {
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return true;
            }
            match (
                positions.get(tri[0] as usize),
                positions.get(tri[1] as usize),
                positions.get(tri[2] as usize),
            ) {
                (Some(&a), Some(&b), Some(&c)) => tol.approx_zero_f64(triangle_cross(a, b, c).length()),
                _ => true,
            }
        })
        .count()
}

/// Returns `(open_edges, non_manifold_edges)`. Triangles that repeat an index
/// are skipped.
pub(crate) fn count_edge_topology(indices: &[u32]) -> (usize, usize) {
    let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
        if i0 == i1 || i1 == i2 || i0 == i2 {
            continue;
        }
        for (ea, eb) in [(i0, i1), (i1, i2), (i2, i0)] {
            let key = if ea <= eb { (ea, eb) } else { (eb, ea) };
            *edge_counts.entry(key).or_insert(0) += 1;
        }
    }

    edge_counts.values().fold((0, 0), |(open, non_manifold), &count| match count {
        1 => (open + 1, non_manifold),
        c if c > 2 => (open, non_manifold + 1),
        _ => (open, non_manifold),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> GeomMesh {
        GeomMesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
            vec![0, 1, 2, 1, 3, 2],
        )
    }

    #[test]
    fn flat_views_preserve_order() {
        let mesh = quad();
        assert_eq!(mesh.positions_flat().len(), 12);
        assert_eq!(&mesh.positions_flat()[3..6], &[1.0, 0.0, 0.0]);
        assert_eq!(&mesh.vertices_flat()[9..], &[1.0f32, 1.0, 0.0]);
        assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn validate_catches_bad_indices() {
        assert!(quad().validate().is_ok());
        let mut mesh = quad();
        mesh.indices.push(9);
        assert!(mesh.validate().is_err());
        mesh.indices.extend([9, 9]);
        assert!(mesh.validate().unwrap_err().contains("out-of-bounds"));
    }

    #[test]
    fn normals_face_positive_z_for_ccw_quad() {
        let mut mesh = quad();
        mesh.compute_vertex_normals();
        let normals = mesh.normals.as_ref().unwrap();
        assert_eq!(normals.len(), 4);
        for n in normals {
            assert!((n[2] - 1.0).abs() < 1e-12);
        }
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.normals_flat().unwrap().len(), 12);
    }

    #[test]
    fn edge_topology_of_open_quad() {
        let (open, non_manifold) = count_edge_topology(&quad().indices);
        assert_eq!(open, 4);
        assert_eq!(non_manifold, 0);
    }

    #[test]
    fn degenerate_triangles_are_counted() {
        let positions = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let indices = vec![0, 1, 2, 0, 2, 3, 2, 2, 3];
        assert_eq!(count_degenerate_triangles(&positions, &indices, Tolerance::ZERO_LENGTH), 3);
    }

    #[test]
    fn bounds_of_empty_mesh_is_none() {
        assert!(GeomMesh::empty().bounds().is_none());
        let b = quad().bounds().unwrap();
        assert_eq!(b.max, Point3::new(1.0, 1.0, 0.0));
    }
}
