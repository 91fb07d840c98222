//! Higher-level primitive builders on top of truck's sweep API.
//!
//! truck has no built-in box/cylinder/sphere — everything is successive sweeps.

use std::f64::consts::PI;
use truck_modeling::builder;
use truck_modeling::topology::{Edge, Solid, Wire};
use truck_modeling::{EuclideanSpace, Point3, Rad, Vector3};

use crate::types::KernelError;

/// Create a box solid via successive translational sweeps.
/// Origin at (0,0,0), extends to (w,h,d).
pub fn make_box(w: f64, h: f64, d: f64) -> Solid {
    let v = builder::vertex(Point3::new(0.0, 0.0, 0.0));
    let edge = builder::tsweep(&v, Vector3::new(w, 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, h, 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, d))
}

/// Create a cylinder solid: circle wire → face → translational sweep.
/// Base centered at origin in XY plane, extending along +Z.
pub fn make_cylinder(radius: f64, height: f64) -> Result<Solid, KernelError> {
    let v = builder::vertex(Point3::new(radius, 0.0, 0.0));
    let wire = builder::rsweep(&v, Point3::origin(), Vector3::unit_z(), Rad(2.0 * PI));
    let face = builder::try_attach_plane(&[wire]).map_err(|e| KernelError::PrimitiveFailed {
        operation: "create_cylinder",
        reason: format!("failed to create circular face: {}", e),
    })?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, height)))
}

/// Create a sphere solid: semicircle face → rotational sweep 2π.
/// Centered at origin.
pub fn make_sphere(radius: f64) -> Result<Solid, KernelError> {
    // Semicircle arc in XZ plane from (r,0,0) through (0,0,r) to (-r,0,0)
    let v_right = builder::vertex(Point3::new(radius, 0.0, 0.0));
    let arc_wire = builder::rsweep(&v_right, Point3::origin(), Vector3::unit_y(), Rad(PI));

    let v_left = builder::vertex(Point3::new(-radius, 0.0, 0.0));
    let line_edge: Edge = builder::tsweep(&v_left, Vector3::new(2.0 * radius, 0.0, 0.0));

    let mut edges: Vec<Edge> = arc_wire.edge_iter().cloned().collect();
    edges.push(line_edge);
    let closed_wire = Wire::from_iter(edges);

    let face =
        builder::try_attach_plane(&[closed_wire]).map_err(|e| KernelError::PrimitiveFailed {
            operation: "create_sphere",
            reason: format!("failed to create semicircle face: {}", e),
        })?;

    Ok(builder::rsweep(
        &face,
        Point3::origin(),
        Vector3::unit_z(),
        Rad(2.0 * PI),
    ))
}

/// Axis-aligned bounds of a solid's vertices.
pub fn vertex_bounds(solid: &Solid) -> ([f64; 3], [f64; 3]) {
    let mut min = [f64::MAX; 3];
    let mut max = [f64::MIN; 3];
    for shell in solid.boundaries() {
        for v in shell.vertex_iter() {
            let p = v.point();
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_box_topology() {
        let solid = make_box(12.7, 203.2, 12.7);

        let boundaries = solid.boundaries();
        assert_eq!(boundaries.len(), 1, "Box should have 1 shell");

        let shell = &boundaries[0];
        let faces: Vec<_> = shell.face_iter().collect();

        let mut edge_ids = std::collections::HashSet::new();
        for edge in shell.edge_iter() {
            edge_ids.insert(edge.id());
        }
        let mut vert_ids = std::collections::HashSet::new();
        for v in shell.vertex_iter() {
            vert_ids.insert(v.id());
        }

        assert_eq!(faces.len(), 6, "Box should have 6 faces");
        assert_eq!(edge_ids.len(), 12, "Box should have 12 edges");
        assert_eq!(vert_ids.len(), 8, "Box should have 8 vertices");
    }

    #[test]
    fn test_make_box_dimensions() {
        let solid = make_box(2.0, 3.0, 4.0);
        let (min, max) = vertex_bounds(&solid);

        let eps = 1e-10;
        assert!((max[0] - min[0] - 2.0).abs() < eps, "Width should be 2");
        assert!((max[1] - min[1] - 3.0).abs() < eps, "Length should be 3");
        assert!((max[2] - min[2] - 4.0).abs() < eps, "Height should be 4");
    }

    #[test]
    fn test_make_cylinder_topology() {
        let solid = make_cylinder(1.0, 2.0).unwrap();
        let boundaries = solid.boundaries();
        assert_eq!(boundaries.len(), 1, "Cylinder should have 1 shell");
        // At minimum: top + bottom + side(s).
        assert!(boundaries[0].face_iter().count() >= 3);
    }
}
