pub mod plan;
pub mod planner;
pub mod step;
pub mod store;

pub use plan::{Plan, Progress};
pub use planner::Planner;
pub use step::{PlanStep, StepStatus};
pub use store::PlanStore;
