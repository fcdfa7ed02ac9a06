pub mod event;
pub mod log;
pub mod render;

pub use event::{Event, EventKind, EventPayload, MessageRole, PlanStepStatusLabel};
pub use log::EventLog;
