use serde::{Deserialize, Serialize};

/// Opaque handle to a solid in the geometry kernel.
///
/// Move-only: a handle has exactly one owner, and [`crate::Kernel::release`]
/// consumes it. Valid only for the kernel session that issued it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct KernelSolidHandle(pub(crate) u64);

impl KernelSolidHandle {
    /// Raw session-local id, for logging and diagnostics.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("{operation} failed: {reason}")]
    PrimitiveFailed {
        operation: &'static str,
        reason: String,
    },

    #[error("invalid dimensions for {operation}: {dims:?}")]
    InvalidDimensions {
        operation: &'static str,
        dims: Vec<f64>,
    },

    #[error("translate failed: {reason}")]
    TransformFailed { reason: String },

    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("STEP export failed: {reason}")]
    ExportFailed { reason: String },

    #[error("tessellation failed: {reason}")]
    TessellationFailed { reason: String },

    #[error("{operation}: solid handle {handle} not found")]
    SolidNotFound { operation: &'static str, handle: u64 },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: &'static str },
}

impl KernelError {
    /// Name of the kernel operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            KernelError::PrimitiveFailed { operation, .. }
            | KernelError::InvalidDimensions { operation, .. }
            | KernelError::SolidNotFound { operation, .. }
            | KernelError::NotSupported { operation } => operation,
            KernelError::TransformFailed { .. } => "translate",
            KernelError::BooleanFailed { .. } => "boolean_subtract",
            KernelError::ExportFailed { .. } => "export_step",
            KernelError::TessellationFailed { .. } => "tessellate",
        }
    }

    pub(crate) fn not_found(operation: &'static str, handle: &KernelSolidHandle) -> Self {
        KernelError::SolidNotFound {
            operation,
            handle: handle.id(),
        }
    }
}

/// Tessellated triangle mesh for the viewer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderMesh {
    /// Flat array of vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Flat array of vertex normals, same layout as `vertices`.
    pub normals: Vec<f32>,
    /// Triangle indices into the vertex array.
    pub indices: Vec<u32>,
    /// Mapping from triangle ranges to B-rep faces.
    pub face_ranges: Vec<FaceRange>,
}

impl RenderMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds of the mesh, or `None` when empty.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for chunk in self.vertices.chunks_exact(3) {
            for i in 0..3 {
                min[i] = min[i].min(chunk[i]);
                max[i] = max[i].max(chunk[i]);
            }
        }
        Some((min, max))
    }
}

/// Maps a contiguous range of triangle indices to one face of the solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRange {
    /// Face ordinal within the tessellated solid.
    pub face_index: u32,
    /// Start index in the indices array (inclusive).
    pub start_index: u32,
    /// End index in the indices array (exclusive).
    pub end_index: u32,
}
