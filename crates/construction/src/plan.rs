//! Backend-agnostic description of how to build the notched bar.

use notch_types::{BuildConfig, Notch};
use serde::{Deserialize, Serialize};

/// One step of a construction plan. All lengths in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlanStep {
    /// Create the base box, corner at `origin`, extending by `dims`.
    CreateBox { dims: [f64; 3], origin: [f64; 3] },
    /// Create a tool box of `dims` at the origin, move it by `translation`
    /// and subtract it from the running solid.
    SubtractBox {
        notch_index: usize,
        notch_name: String,
        dims: [f64; 3],
        translation: [f64; 3],
    },
}

/// Ordered primitive and boolean steps. Purely descriptive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructionPlan {
    pub steps: Vec<PlanStep>,
}

impl ConstructionPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The subtraction steps, in order.
    pub fn cuts(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps
            .iter()
            .filter(|s| matches!(s, PlanStep::SubtractBox { .. }))
    }

    /// Copy of this plan without the cut for the given notch.
    pub fn without_notch(&self, notch_index: usize) -> ConstructionPlan {
        ConstructionPlan {
            steps: self
                .steps
                .iter()
                .filter(|s| {
                    !matches!(s, PlanStep::SubtractBox { notch_index: i, .. } if *i == notch_index)
                })
                .cloned()
                .collect(),
        }
    }
}

/// Plan the bar and one cut per notch, in list order.
///
/// Each cut box has the configured cross-section and is moved along the long
/// axis to the notch's `end`, overshooting the bar's sides and bottom. The
/// notch's `start` does not affect geometry.
pub fn plan_construction(config: &BuildConfig, notches: &[Notch]) -> ConstructionPlan {
    let mut steps = Vec::with_capacity(notches.len() + 1);
    steps.push(PlanStep::CreateBox {
        dims: config.bar.dims_mm(),
        origin: [0.0; 3],
    });

    let tool_dims = config.cut.dims_mm(&config.bar);
    for (notch_index, notch) in notches.iter().enumerate() {
        steps.push(PlanStep::SubtractBox {
            notch_index,
            notch_name: notch.name.clone(),
            dims: tool_dims,
            translation: config.cut.placement_mm(notch.end),
        });
    }

    ConstructionPlan { steps }
}
