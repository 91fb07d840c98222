pub mod errors;
pub mod primitive;
pub mod step_export;

pub use errors::ExportError;
pub use primitive::{generate_step, GeometryRequest, StepRequest, DEFAULT_REQUEST_FILENAME};
pub use step_export::{export_step, StepFile, DEFAULT_FILENAME, STEP_MIME_TYPE};
