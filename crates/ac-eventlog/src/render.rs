//! Rendering helpers for projecting `Plan` events into system messages.
//!
//! Mirrors the status-icon convention the Plan Store itself uses for
//! pseudocode rendering — duplicated here rather than depending on
//! `ac-plan`, since the Event Log is a leaf component.

use crate::event::PlanStepStatusLabel;

fn status_icon(status: PlanStepStatusLabel) -> &'static str {
    match status {
        PlanStepStatusLabel::Pending => "[ ]",
        PlanStepStatusLabel::InProgress => "[→]",
        PlanStepStatusLabel::Completed => "[✓]",
        PlanStepStatusLabel::Blocked => "[!]",
        PlanStepStatusLabel::Skipped => "[-]",
    }
}

pub fn plan_block(
    title: &str,
    step_descriptions: &[String],
    step_statuses: &[PlanStepStatusLabel],
    current_index: usize,
) -> String {
    let mut lines = vec![format!("[PLAN: {title}]")];
    for (i, desc) in step_descriptions.iter().enumerate() {
        let status = step_statuses.get(i).copied().unwrap_or(PlanStepStatusLabel::Pending);
        let marker = if i == current_index { "→ " } else { "" };
        lines.push(format!("{}{}. {} {}", marker, i + 1, status_icon(status), desc));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_current_step_with_arrow_prefix() {
        let block = plan_block(
            "Demo",
            &["first".into(), "second".into()],
            &[PlanStepStatusLabel::Completed, PlanStepStatusLabel::InProgress],
            1,
        );
        assert!(block.contains("→ 2. [→] second"));
        assert!(block.contains("1. [✓] first"));
    }
}
