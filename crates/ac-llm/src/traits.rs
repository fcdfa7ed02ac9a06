//! The LLM transport interface.
//!
//! The core depends on this trait only; the concrete HTTP-backed transport is
//! an external collaborator, out of scope for this crate.

use ac_domain::message::{AskToolReply, Message, ToolDefinition};
use ac_domain::Result;
use async_trait::async_trait;

/// How the transport should steer tool-call selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolChoice {
    Auto,
    Required,
    None,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Plain-content reply, no tool calls possible.
    async fn ask(
        &self,
        messages: &[Message],
        system_messages: &[Message],
        temperature: Option<f32>,
    ) -> Result<String>;

    /// Reply that may carry tool calls instead of (or alongside) content.
    async fn ask_tool(
        &self,
        messages: &[Message],
        system_messages: &[Message],
        tools: &[ToolDefinition],
        tool_choice: ToolChoice,
        temperature: Option<f32>,
    ) -> Result<AskToolReply>;
}
