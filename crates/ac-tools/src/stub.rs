//! In-memory `Tool` test doubles, for tests and the CLI's stub mode.

use ac_domain::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::traits::{Tool, ToolOutput};

/// Always returns the same output, regardless of params.
pub struct FixedTool {
    name: String,
    description: String,
    output: Mutex<ToolOutput>,
}

impl FixedTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            output: Mutex::new(ToolOutput::ok("ok")),
        }
    }

    pub fn with_output(mut self, output: ToolOutput) -> Self {
        self.output = Mutex::new(output);
        self
    }
}

#[async_trait]
impl Tool for FixedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolOutput> {
        Ok(self.output.lock().clone())
    }
}

/// Returns queued outputs in order, repeating the last once exhausted —
/// useful for scripting a tool that fails once then succeeds.
pub struct ScriptedTool {
    name: String,
    description: String,
    outputs: Mutex<std::collections::VecDeque<ToolOutput>>,
    last: Mutex<Option<ToolOutput>>,
}

impl ScriptedTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, outputs: Vec<ToolOutput>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            outputs: Mutex::new(outputs.into()),
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Tool for ScriptedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolOutput> {
        let mut queue = self.outputs.lock();
        let next = queue.pop_front();
        match next {
            Some(output) => {
                *self.last.lock() = Some(output.clone());
                Ok(output)
            }
            None => Ok(self.last.lock().clone().unwrap_or_else(|| ToolOutput::ok(""))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_tool_returns_configured_output() {
        let tool = FixedTool::new("terminate", "ends the run").with_output(ToolOutput::ok("done"));
        let out = tool.execute(serde_json::json!({})).await.unwrap();
        assert_eq!(out.output, "done");
        assert!(out.is_success());
    }

    #[tokio::test]
    async fn scripted_tool_fails_then_succeeds() {
        let tool = ScriptedTool::new(
            "flaky",
            "fails once",
            vec![ToolOutput::failed("network unreachable"), ToolOutput::ok("recovered")],
        );
        let first = tool.execute(serde_json::json!({})).await.unwrap();
        assert!(!first.is_success());
        let second = tool.execute(serde_json::json!({})).await.unwrap();
        assert!(second.is_success());
        assert_eq!(second.output, "recovered");
    }
}
