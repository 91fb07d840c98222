//! Tessellation wrapper with face-range metadata.
//!
//! Wraps truck-meshalgo to produce RenderMesh with FaceRange entries
//! that map triangle index ranges to the faces of the solid.

use crate::types::*;
use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::MeshableShape;

type TruckSolid = truck_modeling::Solid;

/// Tessellate a truck Solid into a RenderMesh with per-face tracking.
pub fn tessellate_solid(
    solid: &TruckSolid,
    tolerance: f64,
) -> std::result::Result<RenderMesh, KernelError> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(KernelError::TessellationFailed {
            reason: format!("tolerance must be positive, got {}", tolerance),
        });
    }

    let meshed_solid = solid.triangulation(tolerance);

    let mut mesh = RenderMesh::default();
    let mut face_index = 0u32;

    for shell in meshed_solid.boundaries().iter() {
        for face in shell.face_iter() {
            let maybe_mesh: Option<PolygonMesh> = face.surface();
            let Some(mut face_mesh) = maybe_mesh else {
                face_index += 1;
                continue;
            };

            // Inverted faces carry inverted meshes
            if !face.orientation() {
                face_mesh.invert();
            }

            let start_index = mesh.indices.len() as u32;
            let base_vertex = (mesh.vertices.len() / 3) as u32;

            let positions = face_mesh.positions();
            let normals = face_mesh.normals();

            for pos in positions {
                mesh.vertices
                    .extend_from_slice(&[pos[0] as f32, pos[1] as f32, pos[2] as f32]);
            }

            if normals.len() == positions.len() {
                for norm in normals {
                    mesh.normals
                        .extend_from_slice(&[norm[0] as f32, norm[1] as f32, norm[2] as f32]);
                }
            } else {
                for _ in 0..positions.len() {
                    mesh.normals.extend_from_slice(&[0.0, 0.0, 1.0]);
                }
            }

            for tri in face_mesh.tri_faces() {
                for v in tri.iter() {
                    mesh.indices.push(v.pos as u32 + base_vertex);
                }
            }

            let end_index = mesh.indices.len() as u32;
            if end_index > start_index {
                mesh.face_ranges.push(FaceRange {
                    face_index,
                    start_index,
                    end_index,
                });
            }
            face_index += 1;
        }
    }

    if mesh.indices.is_empty() {
        return Err(KernelError::TessellationFailed {
            reason: "solid produced no triangles".to_string(),
        });
    }

    Ok(mesh)
}
