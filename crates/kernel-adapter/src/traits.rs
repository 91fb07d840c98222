use crate::types::*;

/// Core geometry kernel trait: primitive construction, rigid placement,
/// boolean subtraction, STEP export and resource release.
/// Implemented by TruckKernel (wraps real truck) and MockKernel (deterministic test double).
///
/// Every method that returns a handle hands out a new, exclusively owned solid.
/// Inputs are borrowed and stay valid; callers release them when done.
pub trait Kernel {
    /// Axis-aligned box with one corner at the origin, extending to `dims`.
    fn create_box(&mut self, dims: [f64; 3]) -> Result<KernelSolidHandle, KernelError>;

    /// Cylinder with its base centered at the origin, extending along +Z.
    fn create_cylinder(
        &mut self,
        radius: f64,
        height: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Sphere centered at the origin.
    fn create_sphere(&mut self, radius: f64) -> Result<KernelSolidHandle, KernelError>;

    /// Copy of `solid` translated by `offset`.
    fn translate(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean subtraction: a minus b.
    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Serialize a solid as an ISO-10303-21 (STEP) byte stream.
    fn export_step(&mut self, solid: &KernelSolidHandle) -> Result<Vec<u8>, KernelError>;

    /// Tessellate a solid to a triangle mesh.
    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError>;

    /// Free the kernel-side resources behind a handle.
    fn release(&mut self, solid: KernelSolidHandle);

    /// Number of solids currently held by the kernel.
    fn live_handles(&self) -> usize;
}

/// Reject non-finite or non-positive primitive dimensions.
pub fn check_dimensions(operation: &'static str, dims: &[f64]) -> Result<(), KernelError> {
    if dims.iter().all(|d| d.is_finite() && *d > 0.0) {
        Ok(())
    } else {
        Err(KernelError::InvalidDimensions {
            operation,
            dims: dims.to_vec(),
        })
    }
}
