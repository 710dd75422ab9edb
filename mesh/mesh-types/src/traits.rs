//! Traits for mesh types.

use crate::Aabb;
use nalgebra::Point3;

/// Trait for types that can compute a bounding box.
pub trait MeshBounds {
    /// Compute the axis-aligned bounding box.
    ///
    /// Returns an empty AABB if there is no geometry.
    fn bounds(&self) -> Aabb;

    /// Compute the bounding box, returning `None` if empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }

    /// Get the center of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}
