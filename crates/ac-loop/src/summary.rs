//! The run's aggregate, user-visible result.

use ac_plan::Progress;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub tool_call_id: String,
    pub tool_name: String,
    pub output: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub final_message: Option<String>,
    pub tool_results: Vec<ToolCallResult>,
    pub plan_progress: Option<Progress>,
    pub steps_used: usize,
    pub truncated: bool,
}
