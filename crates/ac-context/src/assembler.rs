//! The Context Assembler: composes `(prefix, dynamic_events)`.

use ac_datasource::Datasource;
use ac_domain::ids::content_digest;
use ac_domain::message::{Message, Role};
use ac_knowledge::KnowledgeItem;
use ac_plan::Plan;

use crate::errors::ErrorRetention;
use crate::masks::ToolMasks;
use crate::todo::TodoRecitation;
use crate::variation::SerializationVariation;

pub struct ContextAssembler {
    stable_prefix: Option<String>,
    stable_prefix_digest: Option<String>,
    pub tool_masks: ToolMasks,
    pub todo: TodoRecitation,
    pub error_ring: ErrorRetention,
    pub variation: SerializationVariation,
    step_counter: usize,
}

impl ContextAssembler {
    pub fn new(recitation_update_frequency: usize, error_ring_cap: usize, summary_threshold: usize, vary_serialization: bool) -> Self {
        Self {
            stable_prefix: None,
            stable_prefix_digest: None,
            tool_masks: ToolMasks::new(),
            todo: TodoRecitation::new(recitation_update_frequency),
            error_ring: ErrorRetention::new(error_ring_cap, summary_threshold),
            variation: SerializationVariation::new(vary_serialization),
            step_counter: 0,
        }
    }

    /// Set once at agent initialization. Re-calling with a different prefix
    /// is allowed by the type but callers should treat the prefix as
    /// write-once; `check_prefix_stability` is the precondition to rely on.
    pub fn set_stable_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        let digest = content_digest(&[&prefix]);
        self.stable_prefix = Some(prefix);
        self.stable_prefix_digest = Some(digest);
    }

    /// True iff `new`'s digest equals the stored one.
    pub fn check_prefix_stability(&self, new: &str) -> bool {
        match &self.stable_prefix_digest {
            Some(digest) => *digest == content_digest(&[new]),
            None => false,
        }
    }

    pub fn increment_step(&mut self) {
        self.step_counter += 1;
    }

    pub fn step_counter(&self) -> usize {
        self.step_counter
    }

    /// Builds `(prefix, dynamic_events)` per the assembly order the system
    /// prompt expects. Increments the step counter as part of construction.
    pub fn build_context(
        &mut self,
        knowledge: &[KnowledgeItem],
        datasources: &[Datasource],
        plan: Option<&Plan>,
        recent_events: &[Message],
    ) -> (String, Vec<Message>) {
        self.increment_step();
        let prefix = self.stable_prefix.clone().unwrap_or_default();
        let mut dynamic = Vec::new();

        // (2) masked-tools block
        if let Some(block) = self.tool_masks.render_block() {
            dynamic.push(Message::system(block));
        }

        // (3) knowledge block
        if !knowledge.is_empty() {
            let mut lines = vec!["[KNOWLEDGE]".to_string()];
            for item in knowledge {
                lines.push(format!("- ({}/{}, p{}) {}", item.scope.as_str(), item.category.as_str(), item.priority, item.content));
            }
            dynamic.push(Message::system(lines.join("\n")));
        }

        // (4) datasource block
        if !datasources.is_empty() {
            let mut lines = vec!["[DATASOURCES]".to_string()];
            for source in datasources {
                lines.push(source.to_documentation());
            }
            dynamic.push(Message::system(lines.join("\n\n")));
        }

        // (5) plan pseudocode
        if let Some(plan) = plan {
            dynamic.push(Message::system(plan.to_pseudocode()));
        }

        // (6) todo recitation, gated on cadence
        if self.todo.should_recite(self.step_counter) {
            dynamic.push(Message::system(self.todo.to_recitation_string()));
        }

        // (7) error retention
        if let Some(block) = self.error_ring.to_context_string() {
            dynamic.push(Message::system(block));
        }

        // (8) chronological subset of Message/Action/Observation events,
        // with serialization variation applied to tool (Observation) output.
        for event in recent_events {
            if event.role == Role::Tool {
                let varied = self.variation.render(event.name.as_deref().unwrap_or(""), &event.content);
                let mut message = event.clone();
                message.content = varied;
                dynamic.push(message);
            } else {
                dynamic.push(event.clone());
            }
        }

        (prefix, dynamic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masking_does_not_change_the_stable_prefix_digest() {
        let mut assembler = ContextAssembler::new(3, 10, 5, true);
        assembler.set_stable_prefix("system prompt text");
        let digest_before = assembler.stable_prefix_digest.clone();
        assembler.tool_masks.mask("browser_use", "no GUI", None);
        assert_eq!(assembler.stable_prefix_digest, digest_before);
        assert!(assembler.check_prefix_stability("system prompt text"));
    }

    #[test]
    fn empty_knowledge_and_datasource_emit_no_blocks() {
        let mut assembler = ContextAssembler::new(3, 10, 5, true);
        assembler.set_stable_prefix("p");
        let (_, dynamic) = assembler.build_context(&[], &[], None, &[]);
        assert!(dynamic.iter().all(|m| !m.content.contains("[KNOWLEDGE]") && !m.content.contains("[DATASOURCES]")));
    }

    #[test]
    fn recitation_appears_only_on_cadence_steps() {
        let mut assembler = ContextAssembler::new(3, 10, 5, true);
        assembler.set_stable_prefix("p");
        assembler.todo.update(vec!["a".into()], vec![], "2024-01-01T00:00:00Z".parse().unwrap());
        let mut saw_recitation_on_step_3 = false;
        for step in 1..=3 {
            let (_, dynamic) = assembler.build_context(&[], &[], None, &[]);
            let has_recitation = dynamic.iter().any(|m| m.content.contains("[CURRENT PROGRESS]"));
            if step == 3 {
                saw_recitation_on_step_3 = has_recitation;
            } else {
                assert!(!has_recitation);
            }
        }
        assert!(saw_recitation_on_step_3);
    }
}
