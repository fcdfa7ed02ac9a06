//! The append-only event log.

use ac_domain::ids::sorted_json;
use ac_domain::message::{Message, Role};

use crate::event::{Event, EventKind, EventPayload};

#[derive(Debug)]
pub struct EventLog {
    events: Vec<Event>,
    max_events: usize,
}

impl EventLog {
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Appends `event`, evicting the oldest non-Plan, non-System event first
    /// if the log is already at capacity.
    pub fn append(&mut self, event: Event) -> String {
        if self.max_events > 0 && self.events.len() >= self.max_events {
            self.evict_one();
        }
        let id = event.id.clone();
        self.events.push(event);
        id
    }

    fn evict_one(&mut self) {
        if let Some(idx) = self
            .events
            .iter()
            .position(|e| !matches!(e.kind, EventKind::Plan | EventKind::System))
        {
            self.events.remove(idx);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn by_kind(&self, kind: EventKind) -> Vec<&Event> {
        self.events.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn latest_plan(&self) -> Option<&Event> {
        self.events.iter().rev().find(|e| e.kind == EventKind::Plan)
    }

    /// The most recent `n` Observation events carrying an error, oldest-first.
    pub fn recent_errors(&self, n: usize) -> Vec<&Event> {
        let mut errors: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| matches!(&e.payload, EventPayload::Observation { error: Some(_), .. }))
            .collect();
        if errors.len() > n {
            errors = errors.split_off(errors.len() - n);
        }
        errors
    }

    /// Knowledge events, sorted by descending priority.
    pub fn knowledge(&self) -> Vec<&Event> {
        let mut items: Vec<&Event> = self.by_kind(EventKind::Knowledge);
        items.sort_by(|a, b| priority_of(b).cmp(&priority_of(a)));
        items
    }

    /// Datasource events, sorted by descending priority.
    pub fn datasources(&self) -> Vec<&Event> {
        let mut items: Vec<&Event> = self.by_kind(EventKind::Datasource);
        items.sort_by(|a, b| priority_of(b).cmp(&priority_of(a)));
        items
    }

    /// Canonical encoding: sorted keys, minimal separators. Byte-identical
    /// for byte-identical append histories.
    pub fn serialize(&self) -> Vec<u8> {
        let value = serde_json::to_value(&self.events).unwrap_or(serde_json::Value::Null);
        sorted_json(&value).into_bytes()
    }

    /// Projects the log into LLM-transport messages.
    pub fn to_messages(&self) -> Vec<Message> {
        self.events.iter().filter_map(event_to_message).collect()
    }

    /// Only the Agent Loop ever calls this (e.g. on process-level resets in
    /// tests); not part of the normal run lifecycle.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

fn priority_of(event: &Event) -> u8 {
    match &event.payload {
        EventPayload::Knowledge { priority, .. } => *priority,
        EventPayload::Datasource { priority, .. } => *priority,
        _ => 0,
    }
}

fn event_to_message(event: &Event) -> Option<Message> {
    match &event.payload {
        EventPayload::Message { role, content, image } => {
            let transport_role = match role {
                crate::event::MessageRole::User => Role::User,
                crate::event::MessageRole::Assistant => Role::Assistant,
            };
            Some(Message {
                role: transport_role,
                content: content.clone(),
                tool_call_id: None,
                name: None,
                image: image.clone(),
            })
        }
        EventPayload::Action { .. } => None,
        EventPayload::Observation {
            tool_name,
            tool_call_id,
            output,
            error,
            ..
        } => {
            let content = match error {
                Some(e) => format!("Error: {e}"),
                None => output.clone(),
            };
            Some(Message::tool(tool_call_id.clone(), tool_name.clone(), content))
        }
        EventPayload::Plan {
            title,
            step_descriptions,
            step_statuses,
            current_index,
            ..
        } => {
            let rendered = crate::render::plan_block(title, step_descriptions, step_statuses, *current_index);
            Some(Message::system(rendered))
        }
        EventPayload::Knowledge {
            scope,
            category,
            content,
            priority,
            ..
        } => Some(Message::system(format!(
            "[KNOWLEDGE:{scope}/{category} p{priority}] {content}"
        ))),
        EventPayload::Datasource { documentation, .. } => Some(Message::system(documentation.clone())),
        EventPayload::System { .. } => None,
    }
}
