//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (AABB).
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(10.0, 10.0, 10.0),
/// );
///
/// assert!(aabb.contains(&Point3::new(5.0, 5.0, 5.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new AABB from minimum and maximum corners.
    ///
    /// The corners are automatically corrected if min > max for any axis.
    #[must_use]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// Create an empty AABB (inverted infinite bounds).
    ///
    /// Expanding an empty box by a point yields a zero-volume box at that point.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create an AABB enclosing all points of an iterator.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.expand_to_include(p);
        }
        aabb
    }

    /// Check whether the box contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the box to include a point.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min = Point3::new(
            self.min.x.min(point.x),
            self.min.y.min(point.y),
            self.min.z.min(point.z),
        );
        self.max = Point3::new(
            self.max.x.max(point.x),
            self.max.y.max(point.y),
            self.max.z.max(point.z),
        );
    }

    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Check if a point lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_corrects_inverted_corners() {
        let aabb = Aabb::new(Point3::new(2.0, 0.0, 5.0), Point3::new(0.0, 3.0, 1.0));
        assert_relative_eq!(aabb.min.x, 0.0);
        assert_relative_eq!(aabb.max.x, 2.0);
        assert_relative_eq!(aabb.min.z, 1.0);
        assert_relative_eq!(aabb.max.z, 5.0);
    }

    #[test]
    fn empty_box_expands_to_point() {
        let mut aabb = Aabb::empty();
        assert!(aabb.is_empty());
        aabb.expand_to_include(&Point3::new(1.0, 2.0, 3.0));
        assert!(!aabb.is_empty());
        assert_relative_eq!(aabb.size().norm(), 0.0);
    }

    #[test]
    fn from_points_encloses_all() {
        let points = [
            Point3::new(0.0, 0.0, 0.8),
            Point3::new(120.0, 0.0, 3.2),
            Point3::new(60.0, 80.0, 1.0),
        ];
        let aabb = Aabb::from_points(points.iter());
        assert!(points.iter().all(|p| aabb.contains(p)));
        assert_relative_eq!(aabb.size().x, 120.0);
        assert_relative_eq!(aabb.center().y, 40.0);
    }
}
