//! In-memory scripted `LlmProvider`, for tests and the CLI's stub mode.

use std::collections::VecDeque;

use ac_domain::message::{AskToolReply, Message, ToolCall, ToolDefinition};
use ac_domain::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::traits::{LlmProvider, ToolChoice};

/// A single scripted reply: either plain content or a batch of tool calls.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Content(String),
    ToolCalls(Vec<ToolCall>),
    /// Simulates a fatal transport error (auth, token-limit); never retried.
    Fatal(String),
}

impl ScriptedReply {
    pub fn content(text: impl Into<String>) -> Self {
        Self::Content(text.into())
    }

    pub fn tool_call(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self::ToolCalls(vec![ToolCall {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }])
    }
}

/// Replies are consumed in FIFO order; once exhausted, `ask`/`ask_tool`
/// return the last reply repeated (or an empty content reply if none were
/// ever queued), so a scripted conversation never panics mid-loop.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<ScriptedReply>>,
    last: Mutex<Option<ScriptedReply>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn next_reply(&self) -> ScriptedReply {
        let mut queue = self.replies.lock();
        let reply = queue.pop_front();
        match reply {
            Some(r) => {
                *self.last.lock() = Some(r.clone());
                r
            }
            None => self
                .last
                .lock()
                .clone()
                .unwrap_or_else(|| ScriptedReply::Content(String::new())),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn ask(
        &self,
        _messages: &[Message],
        _system_messages: &[Message],
        _temperature: Option<f32>,
    ) -> Result<String> {
        match self.next_reply() {
            ScriptedReply::Content(text) => Ok(text),
            ScriptedReply::ToolCalls(_) => Ok(String::new()),
            ScriptedReply::Fatal(message) => Err(Error::LlmFatal(message)),
        }
    }

    async fn ask_tool(
        &self,
        _messages: &[Message],
        _system_messages: &[Message],
        _tools: &[ToolDefinition],
        _tool_choice: ToolChoice,
        _temperature: Option<f32>,
    ) -> Result<AskToolReply> {
        match self.next_reply() {
            ScriptedReply::Content(text) => Ok(AskToolReply {
                content: Some(text),
                tool_calls: Vec::new(),
            }),
            ScriptedReply::ToolCalls(calls) => Ok(AskToolReply {
                content: None,
                tool_calls: calls,
            }),
            ScriptedReply::Fatal(message) => Err(Error::LlmFatal(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn consumes_replies_in_order() {
        let llm = ScriptedLlm::new(vec![
            ScriptedReply::content("first"),
            ScriptedReply::content("second"),
        ]);
        assert_eq!(llm.ask(&[], &[], None).await.unwrap(), "first");
        assert_eq!(llm.ask(&[], &[], None).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn repeats_last_reply_after_exhaustion() {
        let llm = ScriptedLlm::new(vec![ScriptedReply::content("only")]);
        llm.ask(&[], &[], None).await.unwrap();
        assert_eq!(llm.ask(&[], &[], None).await.unwrap(), "only");
    }

    #[tokio::test]
    async fn fatal_reply_propagates_as_error() {
        let llm = ScriptedLlm::new(vec![ScriptedReply::Fatal("bad key".into())]);
        let err = llm.ask(&[], &[], None).await.unwrap_err();
        assert!(matches!(err, Error::LlmFatal(_)));
    }
}
