//! The tool interface: external collaborators this core dispatches to.

use ac_domain::Result;
use async_trait::async_trait;

/// A tool's result. A non-empty `error`, or an `output` prefixed with
/// `"Error:"`, marks failure (interpreted by the Agent Loop, not here).
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub output: String,
    pub error: Option<String>,
    pub image: Option<Vec<u8>>,
    pub system: Option<String>,
}

impl ToolOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// A tool succeeded if it reported no error and its output doesn't
    /// start with `Error:`.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && !self.output.starts_with("Error:")
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable, non-empty, safe identifier.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON-Schema-style parameter spec.
    fn parameters(&self) -> serde_json::Value;

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput>;
}
