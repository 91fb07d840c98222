pub mod execute;
pub mod pipeline;
pub mod plan;
pub mod scope;
pub mod types;

pub use execute::execute_plan;
pub use pipeline::{Pipeline, Published};
pub use plan::{plan_construction, ConstructionPlan, PlanStep};
pub use types::*;
