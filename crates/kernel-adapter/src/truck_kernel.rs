//! TruckKernel — real geometry kernel wrapping truck's API.

use crate::primitives;
use crate::tessellation;
use crate::traits::{check_dimensions, Kernel};
use crate::types::*;
use std::collections::HashMap;

// Import truck types selectively to avoid shadowing std::result::Result
use truck_modeling::builder;
use truck_modeling::topology::Solid;
use truck_modeling::Vector3;
use truck_stepio::out;

/// Default tolerance handed to truck's boolean operations.
pub const DEFAULT_BOOLEAN_TOLERANCE: f64 = 0.05;

/// Real geometry kernel backed by the truck BREP library.
pub struct TruckKernel {
    next_handle: u64,
    solids: HashMap<u64, Solid>,
    tolerance: f64,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_BOOLEAN_TOLERANCE)
    }

    /// Kernel whose boolean operations use the given tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            tolerance,
        }
    }

    fn store_solid(&mut self, solid: Solid) -> KernelSolidHandle {
        let handle = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        self.solids.insert(handle.id(), solid);
        handle
    }

    /// Borrow the truck solid behind a handle.
    pub fn get_solid(&self, handle: &KernelSolidHandle) -> Option<&Solid> {
        self.solids.get(&handle.id())
    }

    fn solid(
        &self,
        operation: &'static str,
        handle: &KernelSolidHandle,
    ) -> Result<&Solid, KernelError> {
        self.get_solid(handle)
            .ok_or_else(|| KernelError::not_found(operation, handle))
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for TruckKernel {
    fn create_box(&mut self, dims: [f64; 3]) -> Result<KernelSolidHandle, KernelError> {
        check_dimensions("create_box", &dims)?;
        tracing::debug!(?dims, "creating box primitive");
        let solid = primitives::make_box(dims[0], dims[1], dims[2]);
        Ok(self.store_solid(solid))
    }

    fn create_cylinder(
        &mut self,
        radius: f64,
        height: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        check_dimensions("create_cylinder", &[radius, height])?;
        let solid = primitives::make_cylinder(radius, height)?;
        Ok(self.store_solid(solid))
    }

    fn create_sphere(&mut self, radius: f64) -> Result<KernelSolidHandle, KernelError> {
        check_dimensions("create_sphere", &[radius])?;
        let solid = primitives::make_sphere(radius)?;
        Ok(self.store_solid(solid))
    }

    fn translate(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        if offset.iter().any(|c| !c.is_finite()) {
            return Err(KernelError::TransformFailed {
                reason: format!("non-finite offset {:?}", offset),
            });
        }
        let source = self.solid("translate", solid)?;
        let moved = builder::translated(source, Vector3::new(offset[0], offset[1], offset[2]));
        Ok(self.store_solid(moved))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = self.solid("boolean_subtract", a)?;
        let mut solid_b = self.solid("boolean_subtract", b)?.clone();

        // Subtraction = A ∩ ¬B. not() mutates in place.
        solid_b.not();
        let result = truck_shapeops::and(solid_a, &solid_b, self.tolerance).ok_or_else(|| {
            KernelError::BooleanFailed {
                reason: "truck and() returned None for subtraction".to_string(),
            }
        })?;
        Ok(self.store_solid(result))
    }

    fn export_step(&mut self, solid: &KernelSolidHandle) -> Result<Vec<u8>, KernelError> {
        let compressed = self.solid("export_step", solid)?.compress();
        let step_string = out::CompleteStepDisplay::new(
            out::StepModel::from(&compressed),
            out::StepHeaderDescriptor {
                organization_system: "notch-bar".to_owned(),
                ..Default::default()
            },
        )
        .to_string();

        if step_string.is_empty() {
            return Err(KernelError::ExportFailed {
                reason: "writer produced no output".to_string(),
            });
        }
        Ok(step_string.into_bytes())
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        let truck_solid = self.solid("tessellate", solid)?;
        tessellation::tessellate_solid(truck_solid, tolerance)
    }

    fn release(&mut self, solid: KernelSolidHandle) {
        if self.solids.remove(&solid.id()).is_none() {
            tracing::warn!(handle = solid.id(), "released unknown solid handle");
        }
    }

    fn live_handles(&self) -> usize {
        self.solids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_box_and_release() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.create_box([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(kernel.live_handles(), 1);

        let (min, max) = primitives::vertex_bounds(kernel.get_solid(&handle).unwrap());
        assert!((max[1] - min[1] - 2.0).abs() < 1e-10);

        kernel.release(handle);
        assert_eq!(kernel.live_handles(), 0);
    }

    #[test]
    fn test_create_box_rejects_zero_dimension() {
        let mut kernel = TruckKernel::new();
        let err = kernel.create_box([1.0, 0.0, 1.0]).unwrap_err();
        assert_eq!(err.operation(), "create_box");
        assert_eq!(kernel.live_handles(), 0);
    }

    #[test]
    fn test_translate_moves_bounds() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.create_box([1.0, 1.0, 1.0]).unwrap();
        let moved = kernel.translate(&handle, [0.0, 21.844, 0.0]).unwrap();

        let (min, max) = primitives::vertex_bounds(kernel.get_solid(&moved).unwrap());
        assert!((min[1] - 21.844).abs() < 1e-9);
        assert!((max[1] - 22.844).abs() < 1e-9);

        // The source is untouched
        let (min, _) = primitives::vertex_bounds(kernel.get_solid(&handle).unwrap());
        assert!(min[1].abs() < 1e-12);
        assert_eq!(kernel.live_handles(), 2);
    }

    #[test]
    fn test_operations_on_released_handle_fail() {
        let mut kernel = TruckKernel::new();
        let a = kernel.create_box([1.0, 1.0, 1.0]).unwrap();
        let b = kernel.create_box([1.0, 1.0, 1.0]).unwrap();
        let stale = KernelSolidHandle(b.id());
        kernel.release(b);

        let err = kernel.boolean_subtract(&a, &stale).unwrap_err();
        assert!(matches!(err, KernelError::SolidNotFound { .. }));
    }

    #[test]
    fn test_store_and_tessellate_box() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.create_box([1.0, 1.0, 1.0]).unwrap();

        let mesh = kernel.tessellate(&handle, 0.1).unwrap();

        assert!(!mesh.vertices.is_empty(), "Mesh should have vertices");
        assert!(!mesh.indices.is_empty(), "Mesh should have indices");
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        assert_eq!(mesh.face_ranges.len(), 6, "Box should have 6 face ranges");

        let covered: u32 = mesh
            .face_ranges
            .iter()
            .map(|r| r.end_index - r.start_index)
            .sum();
        assert_eq!(covered, mesh.indices.len() as u32);
    }

    #[test]
    fn test_export_step_header() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.create_box([12.7, 203.2, 12.7]).unwrap();
        let bytes = kernel.export_step(&handle).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("ISO-10303-21;"));
        assert!(text.contains("END-ISO-10303-21;"));
    }
}
