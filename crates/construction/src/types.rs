use kernel_adapter::{KernelError, KernelSolidHandle};
use serde::{Deserialize, Serialize};

/// Outcome of replaying a construction plan.
#[derive(Debug)]
pub struct BuildOutput {
    /// The finished solid. The caller owns it and must release it.
    pub solid: KernelSolidHandle,
    /// Which notches were cut and which were skipped.
    pub report: BuildReport,
}

/// Per-notch results of a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Indices of notches whose cut was applied, in plan order.
    pub applied: Vec<usize>,
    /// Notches whose boolean subtraction failed and were left out.
    pub skipped: Vec<SkippedNotch>,
}

impl BuildReport {
    /// True when every notch in the plan was cut.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// A notch left out of the solid because its cut failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedNotch {
    pub index: usize,
    pub name: String,
    pub reason: String,
}

/// Errors that abort a build. Per-notch boolean failures are not errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("plan is malformed: {reason}")]
    MalformedPlan { reason: String },

    #[error("failed to build {what}: {source}")]
    Primitive {
        what: String,
        #[source]
        source: KernelError,
    },
}
