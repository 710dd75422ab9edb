//! Grid tessellation of the relief solid.

use mesh_types::{Point3, Triangle, TriangleMesh};
use relief_heightmap::HeightField;
use tracing::{debug, info, warn};

use crate::error::{ReliefMeshError, ReliefMeshResult};

/// Number of triangles produced for a `width x height` sample grid.
///
/// `4(W-1)(H-1)` for top and bottom plus `4(W-1) + 4(H-1)` for the walls.
#[must_use]
pub const fn expected_triangle_count(width: usize, height: usize) -> usize {
    let (w, h) = (width.saturating_sub(1), height.saturating_sub(1));
    4 * w * h + 4 * w + 4 * h
}

/// Evenly spaced coordinates from 0 to `extent` inclusive.
fn linspace(extent: f64, count: usize) -> Vec<f64> {
    let last = (count - 1) as f64;
    (0..count).map(|i| extent * i as f64 / last).collect()
}

fn check_dimension(name: &'static str, value: f64) -> ReliefMeshResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ReliefMeshError::InvalidDimension { name, value })
    }
}

/// Build a closed relief solid from a thickness field.
///
/// `thickness_mm` gives the top surface height of each sample; the floor
/// sits at `floor_mm`. Top triangles face +Z, floor triangles -Z and each
/// wall faces away from the interior. Shared vertices are bit-identical so
/// every edge is used by exactly two triangles with opposite direction.
///
/// # Errors
///
/// Returns an error if `width_mm`/`height_mm` are not positive or the floor
/// is negative or not finite.
pub fn build_relief_mesh(
    thickness_mm: &HeightField,
    width_mm: f64,
    height_mm: f64,
    floor_mm: f64,
) -> ReliefMeshResult<TriangleMesh> {
    check_dimension("width_mm", width_mm)?;
    check_dimension("height_mm", height_mm)?;
    if !(floor_mm.is_finite() && floor_mm >= 0.0) {
        return Err(ReliefMeshError::InvalidFloor(floor_mm));
    }
    if floor_mm > thickness_mm.min() {
        warn!(
            floor_mm,
            min_thickness = thickness_mm.min(),
            "Floor is above part of the relief surface"
        );
    }

    let (w, h) = (thickness_mm.width(), thickness_mm.height());
    let xs = linspace(width_mm, w);
    let ys = linspace(height_mm, h);
    let z = thickness_mm.values();
    let top = |x: usize, y: usize| Point3::new(xs[x], ys[y], z[y * w + x]);
    let bottom = |x: usize, y: usize| Point3::new(xs[x], ys[y], floor_mm);

    let mut mesh = TriangleMesh::with_capacity(expected_triangle_count(w, h));

    // Top surface, then the floor with reversed winding.
    for y in 0..h - 1 {
        for x in 0..w - 1 {
            let (p00, p10, p11, p01) = (top(x, y), top(x + 1, y), top(x + 1, y + 1), top(x, y + 1));
            mesh.push(Triangle::new(p00, p10, p11));
            mesh.push(Triangle::new(p00, p11, p01));
        }
    }
    for y in 0..h - 1 {
        for x in 0..w - 1 {
            let (q00, q10, q11, q01) = (
                bottom(x, y),
                bottom(x + 1, y),
                bottom(x + 1, y + 1),
                bottom(x, y + 1),
            );
            mesh.push(Triangle::new(q00, q10, q11).reversed());
            mesh.push(Triangle::new(q00, q11, q01).reversed());
        }
    }

    // Front (y = 0) and back (y = H-1) walls.
    for x in 0..w - 1 {
        let (t0, t1, b0, b1) = (top(x, 0), top(x + 1, 0), bottom(x, 0), bottom(x + 1, 0));
        mesh.push(Triangle::new(b0, t1, t0));
        mesh.push(Triangle::new(b0, b1, t1));

        let y = h - 1;
        let (t0, t1, b0, b1) = (top(x, y), top(x + 1, y), bottom(x, y), bottom(x + 1, y));
        mesh.push(Triangle::new(b0, t0, t1));
        mesh.push(Triangle::new(b0, t1, b1));
    }

    // Left (x = 0) and right (x = W-1) walls.
    for y in 0..h - 1 {
        let (t0, t1, b0, b1) = (top(0, y), top(0, y + 1), bottom(0, y), bottom(0, y + 1));
        mesh.push(Triangle::new(b0, t0, t1));
        mesh.push(Triangle::new(b0, t1, b1));

        let x = w - 1;
        let (t0, t1, b0, b1) = (top(x, y), top(x, y + 1), bottom(x, y), bottom(x, y + 1));
        mesh.push(Triangle::new(b0, t1, t0));
        mesh.push(Triangle::new(b0, b1, t1));
    }

    debug!(samples_x = w, samples_y = h, width_mm, height_mm, floor_mm, "Tessellated relief");
    info!(triangles = mesh.len(), "Built relief mesh");
    Ok(mesh)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::MeshBounds;

    fn ramp(w: usize, h: usize) -> HeightField {
        HeightField::from_fn(w, h, |x, y| 0.8 + 0.3 * x as f64 + 0.1 * (y % 3) as f64).unwrap()
    }

    /// Volume between the floor and the piecewise-linear top surface.
    fn prism_volume(field: &HeightField, width_mm: f64, height_mm: f64, floor: f64) -> f64 {
        let (w, h) = (field.width(), field.height());
        let cell = (width_mm / (w - 1) as f64) * (height_mm / (h - 1) as f64);
        let z = |x, y| field.get(x, y).unwrap() - floor;
        let mut total = 0.0;
        for y in 0..h - 1 {
            for x in 0..w - 1 {
                let (a, b, c, d) = (z(x, y), z(x + 1, y), z(x + 1, y + 1), z(x, y + 1));
                total += 0.5 * cell * (a + b + c) / 3.0;
                total += 0.5 * cell * (a + c + d) / 3.0;
            }
        }
        total
    }

    #[test]
    fn triangle_count_formula() {
        for (w, h) in [(2, 2), (3, 2), (7, 5), (16, 9)] {
            let mesh = build_relief_mesh(&ramp(w, h), 10.0, 10.0, 0.5).unwrap();
            assert_eq!(mesh.len(), expected_triangle_count(w, h));
            assert_eq!(
                mesh.len(),
                4 * (w - 1) * (h - 1) + 4 * (w - 1) + 4 * (h - 1)
            );
        }
        assert_eq!(expected_triangle_count(2, 2), 12);
    }

    #[test]
    fn mesh_is_watertight() {
        let mesh = build_relief_mesh(&ramp(9, 6), 40.0, 25.0, 0.5).unwrap();
        let report = mesh.edge_report();
        assert_eq!(report.boundary_edges, 0);
        assert_eq!(report.non_manifold_edges, 0);
        assert_eq!(report.inconsistent_edges, 0);
        assert!(mesh.is_watertight());
    }

    #[test]
    fn signed_volume_matches_enclosed_solid() {
        let field = ramp(8, 5);
        let mesh = build_relief_mesh(&field, 30.0, 20.0, 0.5).unwrap();
        let expected = prism_volume(&field, 30.0, 20.0, 0.5);
        assert!(expected > 0.0);
        assert_relative_eq!(mesh.signed_volume(), expected, max_relative = 1e-9);
    }

    #[test]
    fn flat_block_volume() {
        let field = HeightField::constant(4, 3, 2.0).unwrap();
        let mesh = build_relief_mesh(&field, 6.0, 4.0, 0.5).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 6.0 * 4.0 * 1.5, max_relative = 1e-12);
    }

    #[test]
    fn normals_face_outward() {
        let field = ramp(4, 4);
        let mesh = build_relief_mesh(&field, 12.0, 12.0, 0.5).unwrap();
        let n = 3 * 3;
        for tri in &mesh.triangles[..] {
            assert!(tri.normal().is_some());
        }
        // All top triangles first, then the whole floor.
        let (upper, rest) = mesh.triangles.split_at(2 * n);
        assert!(upper.iter().all(|t| t.facet_normal().z > 0.0));
        for t in &rest[..2 * n] {
            assert_relative_eq!(t.facet_normal().z, -1.0);
        }

        // Walls follow the 4 * 9 surface triangles.
        let walls = &mesh.triangles[4 * n..];
        assert_relative_eq!(walls[0].facet_normal().y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(walls[2].facet_normal().y, 1.0, epsilon = 1e-12);
        let side = &walls[4 * 3..];
        assert_relative_eq!(side[0].facet_normal().x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(side[2].facet_normal().x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn emits_top_then_floor_then_walls() {
        let field = ramp(3, 2);
        let mesh = build_relief_mesh(&field, 4.0, 2.0, 0.25).unwrap();
        let z = |x, y| field.get(x, y).unwrap();
        let quads = 2;
        let top = &mesh.triangles[..2 * quads];
        assert_eq!(
            top[0],
            Triangle::from_arrays([0.0, 0.0, z(0, 0)], [2.0, 0.0, z(1, 0)], [2.0, 2.0, z(1, 1)])
        );
        assert_eq!(top[2].v0, Point3::new(2.0, 0.0, z(1, 0)));

        let floor = &mesh.triangles[2 * quads..4 * quads];
        assert_eq!(
            floor[0],
            Triangle::from_arrays([2.0, 2.0, 0.25], [2.0, 0.0, 0.25], [0.0, 0.0, 0.25])
        );
        assert!(floor.iter().all(|t| t.vertices().iter().all(|p| (p.z - 0.25).abs() < 1e-12)));

        // Front wall of the first column comes right after the floor.
        let first_wall = mesh.triangles[4 * quads];
        assert_eq!(first_wall.v0, Point3::new(0.0, 0.0, 0.25));
        assert_eq!(first_wall.v1, Point3::new(2.0, 0.0, z(1, 0)));
    }

    #[test]
    fn spans_physical_rectangle() {
        let mesh = build_relief_mesh(&ramp(5, 5), 80.0, 60.0, 0.5).unwrap();
        let b = mesh.bounds();
        assert_relative_eq!(b.min.x, 0.0);
        assert_relative_eq!(b.min.y, 0.0);
        assert_relative_eq!(b.min.z, 0.5);
        assert_relative_eq!(b.max.x, 80.0);
        assert_relative_eq!(b.max.y, 60.0);
    }

    #[test]
    fn floor_at_surface_still_closes() {
        // Floor equal to the thinnest sample leaves degenerate wall pieces.
        let field = HeightField::constant(3, 3, 0.8).unwrap();
        let mesh = build_relief_mesh(&field, 5.0, 5.0, 0.8).unwrap();
        assert_eq!(mesh.len(), expected_triangle_count(3, 3));
        assert!(mesh.iter().all(|t| t.facet_normal().iter().all(|c| c.is_finite())));
    }

    #[test]
    fn invalid_dimensions_rejected() {
        let field = ramp(3, 3);
        assert!(matches!(
            build_relief_mesh(&field, 0.0, 10.0, 0.5),
            Err(ReliefMeshError::InvalidDimension { name: "width_mm", .. })
        ));
        assert!(build_relief_mesh(&field, 10.0, f64::NAN, 0.5).is_err());
        assert!(matches!(
            build_relief_mesh(&field, 10.0, 10.0, -1.0),
            Err(ReliefMeshError::InvalidFloor(_))
        ));
    }
}
