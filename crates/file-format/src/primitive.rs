//! Single-primitive STEP generation for the `generate-step` request shape.

use kernel_adapter::Kernel;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ExportError;
use crate::step_export::{export_step, StepFile};

pub const DEFAULT_REQUEST_FILENAME: &str = "model.step";

/// One primitive, in millimetres.
///
/// Wire form: `{"type": "box", "dimensions": {"width": .., "height": .., "depth": ..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "dimensions", rename_all = "lowercase")]
pub enum GeometryRequest {
    Box { width: f64, height: f64, depth: f64 },
    Cylinder { radius: f64, height: f64 },
    Sphere { radius: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRequest {
    #[serde(default)]
    pub geometry_data: Option<GeometryRequest>,
    #[serde(default = "default_request_filename")]
    pub filename: String,
}

fn default_request_filename() -> String {
    DEFAULT_REQUEST_FILENAME.to_string()
}

impl StepRequest {
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        serde_json::from_str(json).map_err(|e| ExportError::InvalidRequest(e.to_string()))
    }
}

/// Build the requested primitive, export it and release it.
pub fn generate_step(
    kernel: &mut dyn Kernel,
    request: &StepRequest,
) -> Result<StepFile, ExportError> {
    let geometry = request
        .geometry_data
        .as_ref()
        .ok_or(ExportError::MissingGeometry)?;

    let solid = match *geometry {
        GeometryRequest::Box {
            width,
            height,
            depth,
        } => kernel.create_box([width, height, depth])?,
        GeometryRequest::Cylinder { radius, height } => kernel.create_cylinder(radius, height)?,
        GeometryRequest::Sphere { radius } => kernel.create_sphere(radius)?,
    };

    let exported = export_step(kernel, &solid);
    kernel.release(solid);

    let file = exported?.with_filename(request.filename.clone());
    info!(?geometry, filename = %file.filename, "generated primitive STEP");
    Ok(file)
}
