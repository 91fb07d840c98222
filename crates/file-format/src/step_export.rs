use kernel_adapter::{Kernel, KernelSolidHandle};
use tracing::info;

use crate::errors::ExportError;

/// Download name used when the caller does not pick one.
pub const DEFAULT_FILENAME: &str = "token_model.step";
pub const STEP_MIME_TYPE: &str = "application/step";

const STEP_MAGIC: &[u8] = b"ISO-10303-21";

/// An exported STEP document ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFile {
    pub filename: String,
    pub contents: Vec<u8>,
}

impl StepFile {
    pub fn mime_type(&self) -> &'static str {
        STEP_MIME_TYPE
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// `Content-Disposition` value for serving the file as a download.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }
}

/// Export a kernel solid to STEP AP203.
///
/// The solid is borrowed, not released. Output that does not begin with the
/// ISO-10303-21 header is rejected.
pub fn export_step(
    kernel: &mut dyn Kernel,
    solid: &KernelSolidHandle,
) -> Result<StepFile, ExportError> {
    let contents = kernel.export_step(solid)?;
    if !contents.starts_with(STEP_MAGIC) {
        return Err(ExportError::InvalidStep {
            reason: "missing ISO-10303-21 header".to_string(),
        });
    }

    info!(solid = solid.id(), bytes = contents.len(), "exported STEP");
    Ok(StepFile {
        filename: DEFAULT_FILENAME.to_string(),
        contents,
    })
}
