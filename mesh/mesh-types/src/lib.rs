//! Core mesh types for relief generation.
//!
//! This crate provides the foundational geometry for the relief pipeline:
//!
//! - [`Triangle`] - A concrete triangle with vertex positions and a facet normal
//! - [`TriangleMesh`] - An ordered triangle soup, as written to binary STL
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`EdgeReport`] - Edge incidence summary used to check watertightness
//!
//! # Units
//!
//! All coordinates are `f64` millimeters. Serialization narrows to `f32`.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**:
//! - X: image columns (width)
//! - Y: image rows (depth)
//! - Z: printed thickness (up)
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Point3, Triangle, TriangleMesh};
//!
//! let mut mesh = TriangleMesh::new();
//! mesh.push(Triangle::new(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ));
//!
//! assert_eq!(mesh.len(), 1);
//! assert!(!mesh.is_watertight());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod edges;
mod mesh;
mod traits;
mod triangle;

pub use bounds::Aabb;
pub use edges::EdgeReport;
pub use mesh::TriangleMesh;
pub use traits::MeshBounds;
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
