use kernel_adapter::KernelError;

/// Errors during STEP export.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("STEP export failed: {0}")]
    Kernel(#[from] KernelError),

    #[error("kernel produced invalid STEP data: {reason}")]
    InvalidStep { reason: String },

    #[error("geometry data is required")]
    MissingGeometry,

    #[error("failed to parse request: {0}")]
    InvalidRequest(String),
}
