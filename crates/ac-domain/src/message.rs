//! Transport-facing message and tool types.
//!
//! These are the shapes the LLM transport consumes and the Event Log
//! projects into — not the Event Log's own kind-specific payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single message in the transport's role/content convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            tool_call_id: None,
            name: None,
            image: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_call_id: None,
            name: None,
            image: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_call_id: None,
            name: None,
            image: None,
        }
    }

    pub fn tool(tool_call_id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
            image: None,
        }
    }
}

/// A tool call requested by the LLM: `{id, name, arguments-as-string}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    /// Parse `arguments` as structured JSON; falls back to an empty object
    /// on malformed input rather than failing the whole reply.
    pub fn parsed_arguments(&self) -> serde_json::Value {
        serde_json::from_str(&self.arguments).unwrap_or(serde_json::Value::Object(Default::default()))
    }
}

/// The LLM's reply to `ask_tool`: either plain content or a list of tool calls.
#[derive(Debug, Clone, Default)]
pub struct AskToolReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

/// A tool's advertised shape, as presented to the LLM transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON-Schema-style parameter spec.
    pub parameters: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_message_carries_call_id_and_name() {
        let m = Message::tool("c1", "list_files", "a.txt\nb.txt");
        assert_eq!(m.tool_call_id.as_deref(), Some("c1"));
        assert_eq!(m.name.as_deref(), Some("list_files"));
    }

    #[test]
    fn parsed_arguments_falls_back_on_malformed_json() {
        let call = ToolCall {
            id: "c1".into(),
            name: "x".into(),
            arguments: "not json".into(),
        };
        assert_eq!(call.parsed_arguments(), serde_json::json!({}));
    }

    #[test]
    fn parsed_arguments_roundtrips_valid_json() {
        let call = ToolCall {
            id: "c1".into(),
            name: "x".into(),
            arguments: r#"{"path":"/tmp"}"#.into(),
        };
        assert_eq!(call.parsed_arguments(), serde_json::json!({"path": "/tmp"}));
    }
}
