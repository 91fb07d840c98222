use kernel_adapter::{Kernel, KernelSolidHandle};
use tracing::{info, instrument, warn};

use crate::plan::{ConstructionPlan, PlanStep};
use crate::scope::StepScope;
use crate::types::{BuildError, BuildOutput, BuildReport, SkippedNotch};

/// Replay a construction plan against a kernel.
///
/// Subtractions fold over the running solid: each cut applies to the result
/// of the previous one. A failed subtraction leaves the running solid as it
/// was and is recorded in the report. A failed box creation or translation
/// aborts the build; nothing created by this call outlives an error.
#[instrument(skip_all, fields(steps = plan.len()))]
pub fn execute_plan(
    kernel: &mut dyn Kernel,
    plan: &ConstructionPlan,
) -> Result<BuildOutput, BuildError> {
    let mut steps = plan.steps.iter();
    let mut body = match steps.next() {
        Some(PlanStep::CreateBox { dims, origin }) => create_base(kernel, *dims, *origin)?,
        Some(PlanStep::SubtractBox { .. }) => {
            return Err(BuildError::MalformedPlan {
                reason: "first step must create the base box".to_string(),
            })
        }
        None => {
            return Err(BuildError::MalformedPlan {
                reason: "plan has no steps".to_string(),
            })
        }
    };

    let mut report = BuildReport::default();

    for step in steps {
        let (notch_index, notch_name, dims, translation) = match step {
            PlanStep::SubtractBox {
                notch_index,
                notch_name,
                dims,
                translation,
            } => (*notch_index, notch_name, *dims, *translation),
            PlanStep::CreateBox { .. } => {
                kernel.release(body);
                return Err(BuildError::MalformedPlan {
                    reason: "base box must be the only CreateBox step".to_string(),
                });
            }
        };

        let mut scope = StepScope::new(&mut *kernel);
        let tool = match scope
            .create_box(dims)
            .and_then(|raw| scope.translate(raw, translation))
        {
            Ok(tool) => tool,
            Err(source) => {
                drop(scope);
                kernel.release(body);
                return Err(BuildError::Primitive {
                    what: format!("cut tool for {}", notch_name),
                    source,
                });
            }
        };

        match scope.subtract_from(&body, tool) {
            Ok(cut) => {
                drop(scope);
                kernel.release(std::mem::replace(&mut body, cut));
                report.applied.push(notch_index);
            }
            Err(e) => {
                warn!(notch = %notch_name, error = %e, "notch cut failed, skipping");
                report.skipped.push(SkippedNotch {
                    index: notch_index,
                    name: notch_name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        applied = report.applied.len(),
        skipped = report.skipped.len(),
        "construction plan executed"
    );
    Ok(BuildOutput {
        solid: body,
        report,
    })
}

fn create_base(
    kernel: &mut dyn Kernel,
    dims: [f64; 3],
    origin: [f64; 3],
) -> Result<KernelSolidHandle, BuildError> {
    let primitive = |source| BuildError::Primitive {
        what: "bar".to_string(),
        source,
    };

    if origin == [0.0; 3] {
        return kernel.create_box(dims).map_err(primitive);
    }

    let mut scope = StepScope::new(kernel);
    let raw = scope.create_box(dims).map_err(primitive)?;
    let placed = scope.translate(raw, origin).map_err(primitive)?;
    scope.keep(placed).map_err(primitive)
}
