//! Triangle type for geometric calculations.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// Winding is **counter-clockwise (CCW) when viewed from the front**
/// (normal points toward viewer).
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// // Area of a right triangle with legs 1 and 1
/// assert!((tri.area() - 0.5).abs() < 1e-10);
///
/// // Normal points in +Z direction
/// assert!((tri.facet_normal().z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Create a triangle from coordinate arrays.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Triangle;
    ///
    /// let tri = Triangle::from_arrays(
    ///     [0.0, 0.0, 0.0],
    ///     [1.0, 0.0, 0.0],
    ///     [0.0, 1.0, 0.0],
    /// );
    /// assert!((tri.area() - 0.5).abs() < 1e-12);
    /// ```
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_arrays(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> Self {
        Self {
            v0: Point3::new(v0[0], v0[1], v0[2]),
            v1: Point3::new(v1[0], v1[1], v1[2]),
            v2: Point3::new(v2[0], v2[1], v2[2]),
        }
    }

    /// Compute the (unnormalized) face normal via cross product.
    ///
    /// The direction follows the right-hand rule with CCW winding.
    /// The magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the unit face normal.
    ///
    /// Returns `None` for degenerate triangles (zero area).
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// // Degenerate triangle (collinear points)
    /// let degen = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    /// );
    /// assert!(degen.normal().is_none());
    /// ```
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal_unnormalized();
        let len = n.norm();
        if len > 0.0 { Some(n / len) } else { None }
    }

    /// Unit normal written alongside the triangle in STL records.
    ///
    /// Degenerate triangles get the vertical unit normal (+Z) instead of NaN.
    #[inline]
    #[must_use]
    pub fn facet_normal(&self) -> Vector3<f64> {
        self.normal().unwrap_or_else(Vector3::z)
    }

    /// Compute the area of the triangle.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Signed volume of the tetrahedron spanned by the origin and this triangle.
    ///
    /// Summed over a closed, outward-wound surface this yields the enclosed
    /// volume (divergence theorem).
    #[inline]
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let (v0, v1, v2) = (&self.v0, &self.v1, &self.v2);
        let cross = Vector3::new(
            v1.y.mul_add(v2.z, -(v1.z * v2.y)),
            v1.z.mul_add(v2.x, -(v1.x * v2.z)),
            v1.x.mul_add(v2.y, -(v1.y * v2.x)),
        );
        v0.z.mul_add(cross.z, v0.x.mul_add(cross.x, v0.y * cross.y)) / 6.0
    }

    /// Get the three vertices as an array, in winding order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Get the three directed edges in winding order.
    #[inline]
    #[must_use]
    pub const fn edges(&self) -> [(Point3<f64>, Point3<f64>); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Create a new triangle with the vertex order reversed (flipped normal).
    ///
    /// `(a, b, c)` becomes `(c, b, a)`.
    #[inline]
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self {
            v0: self.v2,
            v1: self.v1,
            v2: self.v0,
        }
    }
}
