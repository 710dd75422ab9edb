//! Edge incidence analysis for triangle soups.
//!
//! Vertices are matched by exact bit pattern. Meshes produced from a sample
//! grid reuse the same coordinates for shared corners, so no welding
//! tolerance is needed.

use hashbrown::HashMap;
use nalgebra::Point3;

use crate::Triangle;

type VertexKey = [u64; 3];

fn key(p: &Point3<f64>) -> VertexKey {
    // -0.0 and 0.0 must hash the same
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

/// Summary of how triangle edges are shared.
///
/// A closed, consistently oriented manifold has every undirected edge used by
/// exactly two triangles, traversed once in each direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeReport {
    /// Number of distinct undirected edges.
    pub edge_count: usize,
    /// Edges used by exactly one triangle (holes).
    pub boundary_edges: usize,
    /// Edges used by more than two triangles.
    pub non_manifold_edges: usize,
    /// Edges used twice but in the same direction (flipped neighbor).
    pub inconsistent_edges: usize,
}

impl EdgeReport {
    /// Build the report for a sequence of triangles.
    #[must_use]
    pub fn from_triangles<'a>(triangles: impl IntoIterator<Item = &'a Triangle>) -> Self {
        // (uses, forward - backward)
        let mut edges: HashMap<(VertexKey, VertexKey), (usize, i64)> = HashMap::new();

        for tri in triangles {
            for (a, b) in tri.edges() {
                let (ka, kb) = (key(&a), key(&b));
                let (canonical, dir) = if ka <= kb { ((ka, kb), 1) } else { ((kb, ka), -1) };
                let entry = edges.entry(canonical).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += dir;
            }
        }

        let mut report = Self {
            edge_count: edges.len(),
            ..Self::default()
        };
        for &(uses, balance) in edges.values() {
            match uses {
                1 => report.boundary_edges += 1,
                2 if balance != 0 => report.inconsistent_edges += 1,
                2 => {}
                _ => report.non_manifold_edges += 1,
            }
        }
        report
    }

    /// True when every edge is shared by exactly two oppositely wound triangles.
    #[must_use]
    pub const fn is_watertight(&self) -> bool {
        self.edge_count > 0
            && self.boundary_edges == 0
            && self.non_manifold_edges == 0
            && self.inconsistent_edges == 0
    }
}
