//! Relief mesh synthesis.
//!
//! Turns a thickness field (millimeters) into a closed solid: the relief
//! surface on top, a flat floor underneath and four vertical walls joining
//! them. The result is a watertight [`TriangleMesh`] with outward normals,
//! ready for binary STL export.
//!
//! # Layout
//!
//! Sample `(0, 0)` sits at the origin and sample `(W-1, H-1)` at
//! `(width_mm, height_mm)`. Each grid quad is split along the
//! `(x, y) -> (x+1, y+1)` diagonal.
//!
//! # Example
//!
//! ```
//! use relief_heightmap::HeightField;
//! use relief_mesh::{build_relief_mesh, expected_triangle_count};
//!
//! let field = HeightField::from_fn(5, 4, |x, y| 1.0 + 0.1 * (x + y) as f64).unwrap();
//! let mesh = build_relief_mesh(&field, 50.0, 40.0, 0.5).unwrap();
//!
//! assert_eq!(mesh.len(), expected_triangle_count(5, 4));
//! assert!(mesh.is_watertight());
//! ```
//!
//! [`TriangleMesh`]: mesh_types::TriangleMesh

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::cast_precision_loss)]

mod error;
mod relief;

pub use error::{ReliefMeshError, ReliefMeshResult};
pub use relief::{build_relief_mesh, expected_triangle_count};
