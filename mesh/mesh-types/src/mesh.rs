//! Triangle soup mesh.

use crate::{Aabb, EdgeReport, MeshBounds, Triangle};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered sequence of triangles.
///
/// This is the mesh representation exchanged between the relief synthesizer
/// and the STL writer. No vertex sharing is stored; adjacency is recovered
/// on demand by [`TriangleMesh::edge_report`]. Order is significant and is
/// preserved by serialization.
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, TriangleMesh};
///
/// let mesh = TriangleMesh::from_triangles(vec![Triangle::from_arrays(
///     [0.0, 0.0, 0.0],
///     [1.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0],
/// )]);
/// assert_eq!(mesh.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleMesh {
    /// Triangles in emission order.
    pub triangles: Vec<Triangle>,
}

impl TriangleMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    /// Create a mesh with room for `triangle_count` triangles.
    #[inline]
    #[must_use]
    pub fn with_capacity(triangle_count: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Wrap an existing triangle list.
    #[inline]
    #[must_use]
    pub const fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Append a triangle.
    #[inline]
    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the mesh has no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Iterate over triangles in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Positive for outward-facing normals, negative for inside-out meshes.
    ///
    /// # Note
    ///
    /// This calculation assumes the mesh is closed (watertight). For open
    /// meshes, the result is not meaningful as a volume measurement.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles.iter().map(Triangle::signed_volume).sum()
    }

    /// Compute the total surface area of the mesh.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Analyze edge sharing across all triangles.
    #[must_use]
    pub fn edge_report(&self) -> EdgeReport {
        EdgeReport::from_triangles(&self.triangles)
    }

    /// Check that every edge is shared by exactly two oppositely wound triangles.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.edge_report().is_watertight()
    }
}

impl MeshBounds for TriangleMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.triangles.iter().flat_map(|t| [&t.v0, &t.v1, &t.v2]))
    }
}

impl<'a> IntoIterator for &'a TriangleMesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

impl FromIterator<Triangle> for TriangleMesh {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self::from_triangles(iter.into_iter().collect())
    }
}
