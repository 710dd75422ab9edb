//! Mesh file I/O for relief meshes.
//!
//! Relief meshes leave the pipeline as **binary STL**, the interchange
//! format every slicer reads. The writer is bit-exact:
//!
//! ```text
//! UINT8[80]    – Header (ASCII, space padded)
//! UINT32       – Number of triangles (little-endian)
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (always 0)
//! end
//! ```
//!
//! A matching reader is provided so exported files can be verified.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{load_stl, save_stl};
//! use mesh_types::{Triangle, TriangleMesh};
//!
//! let mesh = TriangleMesh::from_triangles(vec![Triangle::from_arrays(
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//! )]);
//! save_stl(&mesh, "relief.stl").unwrap();
//! let loaded = load_stl("relief.stl").unwrap();
//! assert_eq!(loaded.mesh.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod stl;

pub use error::{IoError, IoResult};
pub use stl::{
    HEADER_SIZE, LoadedStl, STL_HEADER_TEXT, TRIANGLE_SIZE, load_stl, read_stl, save_stl,
    stl_file_size, write_stl,
};
