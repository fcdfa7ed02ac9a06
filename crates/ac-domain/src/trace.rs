//! Structured lifecycle events for the agent loop, emitted via `tracing`.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    RunStarted { run_id: String },
    PlanCreated { run_id: String, plan_id: String, step_count: usize },
    StepStarted { run_id: String, step: usize },
    ToolDispatched { run_id: String, tool_name: String, tool_call_id: String },
    ToolFailed { run_id: String, tool_name: String, error: String },
    Replanned { run_id: String, reason: String, new_plan_id: String },
    RunFinished { run_id: String, steps_used: usize, truncated: bool },
    RunErrored { run_id: String, error_kind: String, message: String },
}

impl TraceEvent {
    /// Serialize to JSON and emit at `info` (or `warn` for failure variants).
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        match self {
            TraceEvent::ToolFailed { .. } | TraceEvent::RunErrored { .. } => {
                tracing::warn!(trace_event = %json, "agent trace event");
            }
            _ => {
                tracing::info!(trace_event = %json, "agent trace event");
            }
        }
    }
}
