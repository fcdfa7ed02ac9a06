//! Immutable, content-addressed events.
//!
//! Events are constructed exclusively through [`Event::new`], which computes
//! the content-addressed id and returns a fully-built, read-only record —
//! there are no setters.

use ac_domain::ids::{content_digest, sorted_json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Message,
    Action,
    Observation,
    Plan,
    Knowledge,
    Datasource,
    System,
}

impl EventKind {
    fn as_str(self) -> &'static str {
        match self {
            EventKind::Message => "Message",
            EventKind::Action => "Action",
            EventKind::Observation => "Observation",
            EventKind::Plan => "Plan",
            EventKind::Knowledge => "Knowledge",
            EventKind::Datasource => "Datasource",
            EventKind::System => "System",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Step status as carried in a `Plan` event payload. Kept independent of
/// `ac-plan`'s own state machine so the Event Log (a leaf component) never
/// depends on the Plan Store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStepStatusLabel {
    Pending,
    InProgress,
    Completed,
    Blocked,
    Skipped,
}

impl PlanStepStatusLabel {
    fn as_str(self) -> &'static str {
        match self {
            PlanStepStatusLabel::Pending => "pending",
            PlanStepStatusLabel::InProgress => "in_progress",
            PlanStepStatusLabel::Completed => "completed",
            PlanStepStatusLabel::Blocked => "blocked",
            PlanStepStatusLabel::Skipped => "skipped",
        }
    }
}

/// The seven kind-specific payloads, as a tagged sum type rather than an
/// inheritance hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EventPayload {
    Message {
        role: MessageRole,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<Vec<u8>>,
    },
    Action {
        tool_name: String,
        tool_call_id: String,
        input: serde_json::Value,
    },
    Observation {
        tool_name: String,
        tool_call_id: String,
        output: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<Vec<u8>>,
    },
    Plan {
        plan_id: String,
        title: String,
        step_descriptions: Vec<String>,
        step_statuses: Vec<PlanStepStatusLabel>,
        current_index: usize,
        complete: bool,
    },
    Knowledge {
        scope: String,
        category: String,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        conditions: Option<String>,
        priority: u8,
    },
    Datasource {
        source_id: String,
        name: String,
        endpoint: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        auth_scheme: Option<String>,
        documentation: String,
        priority: u8,
    },
    System {
        event_name: String,
        data: serde_json::Value,
    },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Message { .. } => EventKind::Message,
            EventPayload::Action { .. } => EventKind::Action,
            EventPayload::Observation { .. } => EventKind::Observation,
            EventPayload::Plan { .. } => EventKind::Plan,
            EventPayload::Knowledge { .. } => EventKind::Knowledge,
            EventPayload::Datasource { .. } => EventKind::Datasource,
            EventPayload::System { .. } => EventKind::System,
        }
    }

    /// Kind-specific payload hash input fed into the content-addressed id:
    /// `"Action payload hash = tool_name || sorted-json(input)"` and
    /// analogous formulas for the remaining kinds.
    fn hash_input(&self) -> String {
        match self {
            EventPayload::Message { role, content, .. } => {
                format!("{}|{}", role.as_str_for_hash(), content)
            }
            EventPayload::Action {
                tool_name, input, ..
            } => format!("{}|{}", tool_name, sorted_json(input)),
            EventPayload::Observation {
                tool_name,
                tool_call_id,
                output,
                error,
                ..
            } => format!(
                "{}|{}|{}|{}",
                tool_name,
                tool_call_id,
                output,
                error.as_deref().unwrap_or("")
            ),
            EventPayload::Plan {
                plan_id,
                title,
                current_index,
                ..
            } => format!("{}|{}|{}", plan_id, title, current_index),
            EventPayload::Knowledge {
                scope,
                category,
                content,
                ..
            } => format!("{}|{}|{}", scope, category, content),
            EventPayload::Datasource {
                source_id,
                name,
                endpoint,
                ..
            } => format!("{}|{}|{}", source_id, name, endpoint),
            EventPayload::System { event_name, data } => {
                format!("{}|{}", event_name, sorted_json(data))
            }
        }
    }
}

impl MessageRole {
    fn as_str_for_hash(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// An immutable, content-addressed log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl Event {
    /// The only constructor: computes the id from `kind || timestamp ||
    /// payload-hash` and returns a fully-built, read-only record.
    pub fn new(payload: EventPayload, timestamp: DateTime<Utc>) -> Self {
        let kind = payload.kind();
        let id = content_digest(&[kind.as_str(), &timestamp.to_rfc3339(), &payload.hash_input()]);
        Self {
            id,
            kind,
            timestamp,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn identical_kind_timestamp_payload_share_id() {
        let a = Event::new(
            EventPayload::Action {
                tool_name: "list_files".into(),
                tool_call_id: "c1".into(),
                input: serde_json::json!({}),
            },
            ts(),
        );
        let b = Event::new(
            EventPayload::Action {
                tool_name: "list_files".into(),
                tool_call_id: "c1".into(),
                input: serde_json::json!({}),
            },
            ts(),
        );
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn different_payload_yields_different_id() {
        let a = Event::new(
            EventPayload::Message {
                role: MessageRole::User,
                content: "hi".into(),
                image: None,
            },
            ts(),
        );
        let b = Event::new(
            EventPayload::Message {
                role: MessageRole::User,
                content: "bye".into(),
                image: None,
            },
            ts(),
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn id_is_16_hex_chars() {
        let e = Event::new(
            EventPayload::System {
                event_name: "boot".into(),
                data: serde_json::json!({}),
            },
            ts(),
        );
        assert_eq!(e.id.len(), 16);
        assert!(e.id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
